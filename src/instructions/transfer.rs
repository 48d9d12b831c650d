//! # Register Transfer Micro-ops
//!
//! TXA, TYA, TAX, TAY: single-pulse copies between registers. No flag
//! side effects in this machine (a documented deviation from the real
//! 6502, where transfers update Z and N).

use super::MicroStep;
use crate::cpu::Cpu;
use crate::CpuError;

/// Executes TXA: A ← X.
pub(crate) fn execute_txa(cpu: &mut Cpu) -> Result<MicroStep, CpuError> {
    cpu.a = cpu.x;
    Ok(MicroStep::Done)
}

/// Executes TYA: A ← Y.
pub(crate) fn execute_tya(cpu: &mut Cpu) -> Result<MicroStep, CpuError> {
    cpu.a = cpu.y;
    Ok(MicroStep::Done)
}

/// Executes TAX: X ← A.
pub(crate) fn execute_tax(cpu: &mut Cpu) -> Result<MicroStep, CpuError> {
    cpu.x = cpu.a;
    Ok(MicroStep::Done)
}

/// Executes TAY: Y ← A.
pub(crate) fn execute_tay(cpu: &mut Cpu) -> Result<MicroStep, CpuError> {
    cpu.y = cpu.a;
    Ok(MicroStep::Done)
}
