//! # SYS Micro-ops
//!
//! SYS (0xFF) dispatches on the X register:
//!
//! - X = 1: append the decimal rendering of Y to the program output
//! - X = 2: print the null-terminated string starting at zero-page
//!   address Y (high byte forced to 0x00, so the start is always in the
//!   first 256 bytes)
//! - X = 3: print the null-terminated string starting at the 16-bit
//!   operand address (the only SYS form that carries operand bytes)
//!
//! String printing streams through memory byte by byte, two pulses per
//! byte, so `pulse_in_stage` is unbounded here: the stage runs until the
//! terminator. Any other X value is an `InvalidSyscall` fault.

use super::MicroStep;
use crate::cpu::Cpu;
use crate::encoding;
use crate::mmu::Mmu;
use crate::CpuError;

/// Executes one pulse of SYS.
pub(crate) fn execute_sys(cpu: &mut Cpu, mmu: &mut Mmu) -> Result<MicroStep, CpuError> {
    match cpu.x {
        0x01 => {
            let rendered = cpu.y.to_string();
            cpu.output.push_str(&rendered);
            Ok(MicroStep::Done)
        }
        0x02 | 0x03 => execute_string_print(cpu, mmu),
        other => Err(CpuError::InvalidSyscall(other)),
    }
}

/// Streams a null-terminated string from memory into the output buffer.
///
/// Even pulses trigger the read of the next byte; odd pulses consume the
/// MDR. The 0x00 terminator finishes the instruction. Bytes outside the
/// machine's character set are skipped with a warning rather than
/// faulting; a garbled string is a program bug worth surviving.
fn execute_string_print(cpu: &mut Cpu, mmu: &mut Mmu) -> Result<MicroStep, CpuError> {
    let cursor = match cpu.string_cursor {
        Some(cursor) => cursor,
        None => {
            // First pulse: establish the start address for this print.
            let start = if cpu.x == 0x03 {
                cpu.operand_address()
            } else {
                // X = 2: zero page, (0x00 << 8) | Y
                u16::from(cpu.y)
            };
            cpu.string_cursor = Some(start);
            start
        }
    };

    if cpu.pulse_in_stage % 2 == 0 {
        mmu.trigger_read(cursor);
        return Ok(MicroStep::Again);
    }

    let byte = mmu.mdr()?;
    if byte == 0x00 {
        cpu.string_cursor = None;
        return Ok(MicroStep::Done);
    }

    match encoding::to_char(byte) {
        Some(ch) => cpu.output.push(ch),
        None => {
            log::warn!(
                "string print: skipping unprintable byte 0x{:02X} at 0x{:04X}",
                byte,
                cursor
            );
        }
    }
    cpu.string_cursor = Some(cursor.wrapping_add(1));

    Ok(MicroStep::Again)
}
