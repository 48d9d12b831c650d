//! # Branch Micro-ops
//!
//! BNE: branch on Z clear, relative addressing. The offset is the signed
//! 8-bit operand applied to the PC as it stands after the operand fetch,
//! wrapping modulo 65536.

use super::MicroStep;
use crate::cpu::Cpu;
use crate::CpuError;

/// Executes BNE (relative). Single pulse; no flags affected.
pub(crate) fn execute_bne(cpu: &mut Cpu) -> Result<MicroStep, CpuError> {
    if !cpu.flag_z {
        let offset = cpu.operand[0] as i8;
        cpu.pc = cpu.pc.wrapping_add_signed(i16::from(offset));
    }
    Ok(MicroStep::Done)
}
