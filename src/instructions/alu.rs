//! # ALU Micro-ops
//!
//! - ADC: add memory to the accumulator; carry-in is gated by the
//!   `use_carry` startup option
//! - CPX: compare X with memory, setting Z and C
//!
//! Both are absolute-mode and therefore two-pulse: trigger the read, then
//! compute against the MDR.

use super::MicroStep;
use crate::cpu::Cpu;
use crate::mmu::Mmu;
use crate::CpuError;

/// Executes one pulse of ADC (absolute).
///
/// sum = A + M + (C if `use_carry` else 0); C ← sum > 0xFF; A ← sum mod
/// 256. Z is deliberately untouched: this machine's ADC only reports
/// through the carry.
pub(crate) fn execute_adc(cpu: &mut Cpu, mmu: &mut Mmu) -> Result<MicroStep, CpuError> {
    if cpu.pulse_in_stage == 0 {
        mmu.trigger_read(cpu.operand_address());
        return Ok(MicroStep::Again);
    }

    let value = mmu.mdr()?;
    let carry_in = if cpu.use_carry && cpu.flag_c { 1 } else { 0 };
    let sum = u16::from(cpu.a) + u16::from(value) + carry_in;

    cpu.flag_c = sum > 0xFF;
    cpu.a = sum as u8;

    Ok(MicroStep::Done)
}

/// Executes one pulse of CPX (absolute).
///
/// r = (X − M) mod 256; Z ← r == 0; C ← X ≥ M. X itself is unchanged.
pub(crate) fn execute_cpx(cpu: &mut Cpu, mmu: &mut Mmu) -> Result<MicroStep, CpuError> {
    if cpu.pulse_in_stage == 0 {
        mmu.trigger_read(cpu.operand_address());
        return Ok(MicroStep::Again);
    }

    let value = mmu.mdr()?;
    let result = cpu.x.wrapping_sub(value);

    cpu.flag_z = result == 0;
    cpu.flag_c = cpu.x >= value;

    Ok(MicroStep::Done)
}
