//! # Addressing Modes
//!
//! This machine implements a deliberate subset of the 6502 addressing
//! modes, plus one mode of its own for the SYS instruction whose operand
//! size is not known until the X register is inspected at decode time.

/// How an instruction interprets its operand bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand; the instruction operates on registers alone.
    Implied,

    /// One operand byte used directly as the value.
    Immediate,

    /// Two operand bytes forming a little-endian 16-bit address.
    Absolute,

    /// One operand byte treated as a signed 8-bit branch offset.
    Relative,

    /// SYS only: operand size depends on the X register at decode time
    /// (two bytes when X = 3, none otherwise).
    DispatchOnX,
}

impl AddressingMode {
    /// Number of operand bytes this mode consumes after the opcode.
    ///
    /// For [`AddressingMode::DispatchOnX`] this returns the base size of
    /// zero; the Decode stage adjusts it once it has seen X.
    pub fn operand_bytes(&self) -> u8 {
        match self {
            AddressingMode::Implied => 0,
            AddressingMode::Immediate => 1,
            AddressingMode::Absolute => 2,
            AddressingMode::Relative => 1,
            AddressingMode::DispatchOnX => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_byte_counts() {
        assert_eq!(AddressingMode::Implied.operand_bytes(), 0);
        assert_eq!(AddressingMode::Immediate.operand_bytes(), 1);
        assert_eq!(AddressingMode::Absolute.operand_bytes(), 2);
        assert_eq!(AddressingMode::Relative.operand_bytes(), 1);
        assert_eq!(AddressingMode::DispatchOnX.operand_bytes(), 0);
    }
}
