//! # Increment Micro-ops
//!
//! INC (absolute) is the one instruction that uses the Writeback stage:
//! Execute reads the cell and computes the incremented value, then parks
//! it in the deferred-write slots. The pipeline routes through Writeback,
//! which commits the write, so the memory update lands one stage after
//! the computation.

use super::MicroStep;
use crate::cpu::Cpu;
use crate::mmu::Mmu;
use crate::CpuError;

/// Executes one pulse of INC (absolute).
///
/// Pulse 0 triggers the read; pulse 1 computes (M + 1) mod 256 and
/// latches the deferred write for the Writeback stage. No flags are
/// affected.
pub(crate) fn execute_inc(cpu: &mut Cpu, mmu: &mut Mmu) -> Result<MicroStep, CpuError> {
    if cpu.pulse_in_stage == 0 {
        mmu.trigger_read(cpu.operand_address());
        return Ok(MicroStep::Again);
    }

    let value = mmu.mdr()?;
    let address = cpu.operand_address();

    cpu.write_address = Some(address);
    cpu.write_value = Some(value.wrapping_add(1));

    Ok(MicroStep::Done)
}
