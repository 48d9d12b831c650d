//! # Control Micro-ops
//!
//! NOP and BRK. BRK requests a system stop; the System observes the
//! request after the CPU's tick and shuts the clock down, so the stop
//! takes effect at the pulse boundary.

use super::MicroStep;
use crate::cpu::Cpu;
use crate::CpuError;

/// Executes NOP: one pulse, no effect.
pub(crate) fn execute_nop(_cpu: &mut Cpu) -> Result<MicroStep, CpuError> {
    Ok(MicroStep::Done)
}

/// Executes BRK: requests a system stop.
pub(crate) fn execute_brk(cpu: &mut Cpu) -> Result<MicroStep, CpuError> {
    cpu.request_stop();
    Ok(MicroStep::Done)
}
