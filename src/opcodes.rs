//! # Decode Table
//!
//! This module is the single source of truth for the instruction set: one
//! entry per implemented opcode, mapping the opcode byte to its mnemonic,
//! instruction tag, addressing mode, and operand size.
//!
//! The machine implements 18 opcodes covering 15 instructions. Opcodes
//! absent from the table are faults: the Decode stage reports
//! `UnknownOpcode` and the pipeline abandons the instruction.

use crate::addressing::AddressingMode;

/// Instruction tags for the implemented subset.
///
/// The tag doubles as the micro-op handle: the Execute stage dispatches on
/// it to the per-instruction functions in `instructions/`. Per-instruction
/// execution state (the streaming print cursor, the deferred write slots)
/// lives in the CPU's pipeline registers, so the tag itself stays `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Load accumulator.
    Lda,
    /// Load X register.
    Ldx,
    /// Load Y register.
    Ldy,
    /// Store accumulator to memory.
    Sta,
    /// Transfer X to accumulator.
    Txa,
    /// Transfer Y to accumulator.
    Tya,
    /// Transfer accumulator to X.
    Tax,
    /// Transfer accumulator to Y.
    Tay,
    /// Add memory to accumulator (carry-in is configuration-gated).
    Adc,
    /// Compare X with memory, setting Z and C.
    Cpx,
    /// Branch on Z clear.
    Bne,
    /// Increment a memory cell through the Writeback stage.
    Inc,
    /// No operation.
    Nop,
    /// Stop the system.
    Brk,
    /// Host syscall dispatching on X (1: print Y as decimal, 2: print
    /// zero-page string at Y, 3: print string at 16-bit operand).
    Sys,
}

/// Metadata for a single opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Instruction mnemonic (e.g. "LDA").
    pub mnemonic: &'static str,

    /// Instruction tag used for Execute-stage dispatch.
    pub instruction: Instruction,

    /// Addressing mode for this opcode.
    pub addressing_mode: AddressingMode,

    /// Operand bytes to fetch after the opcode. For `DispatchOnX` entries
    /// this is the base size; the Decode stage substitutes the real size
    /// after inspecting X.
    pub operand_bytes: u8,
}

/// The complete decode table, ordered by opcode byte.
///
/// Operand byte order for 16-bit addresses is little-endian: the first
/// operand byte is the low half, the second is the high half.
pub const DECODE_TABLE: &[(u8, OpcodeMetadata)] = &[
    (
        0x00,
        OpcodeMetadata {
            mnemonic: "BRK",
            instruction: Instruction::Brk,
            addressing_mode: AddressingMode::Implied,
            operand_bytes: 0,
        },
    ),
    (
        0x6D,
        OpcodeMetadata {
            mnemonic: "ADC",
            instruction: Instruction::Adc,
            addressing_mode: AddressingMode::Absolute,
            operand_bytes: 2,
        },
    ),
    (
        0x8A,
        OpcodeMetadata {
            mnemonic: "TXA",
            instruction: Instruction::Txa,
            addressing_mode: AddressingMode::Implied,
            operand_bytes: 0,
        },
    ),
    (
        0x8D,
        OpcodeMetadata {
            mnemonic: "STA",
            instruction: Instruction::Sta,
            addressing_mode: AddressingMode::Absolute,
            operand_bytes: 2,
        },
    ),
    (
        0x98,
        OpcodeMetadata {
            mnemonic: "TYA",
            instruction: Instruction::Tya,
            addressing_mode: AddressingMode::Implied,
            operand_bytes: 0,
        },
    ),
    (
        0xA0,
        OpcodeMetadata {
            mnemonic: "LDY",
            instruction: Instruction::Ldy,
            addressing_mode: AddressingMode::Immediate,
            operand_bytes: 1,
        },
    ),
    (
        0xA2,
        OpcodeMetadata {
            mnemonic: "LDX",
            instruction: Instruction::Ldx,
            addressing_mode: AddressingMode::Immediate,
            operand_bytes: 1,
        },
    ),
    (
        0xA8,
        OpcodeMetadata {
            mnemonic: "TAY",
            instruction: Instruction::Tay,
            addressing_mode: AddressingMode::Implied,
            operand_bytes: 0,
        },
    ),
    (
        0xA9,
        OpcodeMetadata {
            mnemonic: "LDA",
            instruction: Instruction::Lda,
            addressing_mode: AddressingMode::Immediate,
            operand_bytes: 1,
        },
    ),
    (
        0xAA,
        OpcodeMetadata {
            mnemonic: "TAX",
            instruction: Instruction::Tax,
            addressing_mode: AddressingMode::Implied,
            operand_bytes: 0,
        },
    ),
    (
        0xAC,
        OpcodeMetadata {
            mnemonic: "LDY",
            instruction: Instruction::Ldy,
            addressing_mode: AddressingMode::Absolute,
            operand_bytes: 2,
        },
    ),
    (
        0xAD,
        OpcodeMetadata {
            mnemonic: "LDA",
            instruction: Instruction::Lda,
            addressing_mode: AddressingMode::Absolute,
            operand_bytes: 2,
        },
    ),
    (
        0xAE,
        OpcodeMetadata {
            mnemonic: "LDX",
            instruction: Instruction::Ldx,
            addressing_mode: AddressingMode::Absolute,
            operand_bytes: 2,
        },
    ),
    (
        0xD0,
        OpcodeMetadata {
            mnemonic: "BNE",
            instruction: Instruction::Bne,
            addressing_mode: AddressingMode::Relative,
            operand_bytes: 1,
        },
    ),
    (
        0xEA,
        OpcodeMetadata {
            mnemonic: "NOP",
            instruction: Instruction::Nop,
            addressing_mode: AddressingMode::Implied,
            operand_bytes: 0,
        },
    ),
    (
        0xEC,
        OpcodeMetadata {
            mnemonic: "CPX",
            instruction: Instruction::Cpx,
            addressing_mode: AddressingMode::Absolute,
            operand_bytes: 2,
        },
    ),
    (
        0xEE,
        OpcodeMetadata {
            mnemonic: "INC",
            instruction: Instruction::Inc,
            addressing_mode: AddressingMode::Absolute,
            operand_bytes: 2,
        },
    ),
    (
        0xFF,
        OpcodeMetadata {
            mnemonic: "SYS",
            instruction: Instruction::Sys,
            addressing_mode: AddressingMode::DispatchOnX,
            operand_bytes: 0,
        },
    ),
];

/// Looks up the metadata for an opcode byte.
///
/// Returns `None` for opcodes outside the implemented subset; the Decode
/// stage turns that into an `UnknownOpcode` fault.
///
/// # Examples
///
/// ```
/// use pulse6502::{decode, AddressingMode};
///
/// let lda = decode(0xA9).unwrap();
/// assert_eq!(lda.mnemonic, "LDA");
/// assert_eq!(lda.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda.operand_bytes, 1);
///
/// assert!(decode(0x02).is_none());
/// ```
pub fn decode(opcode: u8) -> Option<&'static OpcodeMetadata> {
    DECODE_TABLE
        .iter()
        .find(|(byte, _)| *byte == opcode)
        .map(|(_, metadata)| metadata)
}
