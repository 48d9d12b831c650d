//! # CPU Pipeline
//!
//! The CPU is a state machine over five pipeline stages, advanced one
//! sub-step per clock pulse. All multi-cycle behavior (operand fetches,
//! two-phase memory reads, streaming string prints) is encoded as state
//! that persists between pulses; nothing inside a pulse ever blocks.
//!
//! ## Stage flow
//!
//! ```text
//! Fetch ──► Decode ──► Execute ──► Writeback ──► InterruptCheck ──► Fetch
//!                │          │            (only when a deferred
//!                ▼          ▼             write is latched)
//!          operand-fetch  micro-op
//!          stall (2 pulses  runs until
//!          per byte)        it reports Done
//! ```
//!
//! - **Fetch** (2 pulses): trigger the opcode read, then consume the MDR
//!   and bump PC.
//! - **Decode** (1 pulse): look the opcode up in the decode table, latch
//!   the instruction tag and addressing mode, and announce how many
//!   operand bytes to fetch. SYS inspects X here to pick its operand size.
//! - **Operand-fetch stall**: while announced operand bytes remain, the
//!   pipeline holds its stage and spends two pulses per byte (trigger,
//!   consume).
//! - **Execute**: runs the instruction's micro-op once per pulse until it
//!   reports done.
//! - **Writeback** (1 pulse): commits a deferred write when both the
//!   address and the value slot are set. Entered only in that case.
//! - **InterruptCheck** (1 pulse): services the pending interrupt slot; a
//!   keyboard `q`/`Q` requests a system stop. Always returns to Fetch.
//!
//! ## Fault behavior
//!
//! Micro-ops propagate [`CpuError`] out of `tick`; the System logs the
//! fault with context and calls [`Cpu::abort_instruction`], which resets
//! the pipeline to Fetch. Execution resumes with the next instruction.

use crate::addressing::AddressingMode;
use crate::encoding;
use crate::instructions::load_store::LoadTarget;
use crate::instructions::{self, MicroStep};
use crate::interrupts::Interrupt;
use crate::keyboard;
use crate::mmu::Mmu;
use crate::opcodes::{self, Instruction};
use crate::program::RegisterSnapshot;
use crate::CpuError;

/// The five pipeline stages. The CPU is in exactly one between pulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the next opcode byte from memory.
    Fetch,
    /// Looking the opcode up in the decode table.
    Decode,
    /// Running the instruction's micro-op.
    Execute,
    /// Committing a deferred memory write.
    Writeback,
    /// Servicing the pending interrupt slot.
    InterruptCheck,
}

/// Pipeline state machine for the simulated processor.
pub struct Cpu {
    // ---- Data registers ----
    /// Accumulator.
    pub(crate) a: u8,
    /// X index register.
    pub(crate) x: u8,
    /// Y index register.
    pub(crate) y: u8,
    /// Zero flag. Set only by CPX in this machine.
    pub(crate) flag_z: bool,
    /// Carry flag. Set by ADC and CPX.
    pub(crate) flag_c: bool,

    // ---- Control registers ----
    /// Program counter.
    pub(crate) pc: u16,
    /// Most recently fetched opcode byte.
    pub(crate) opcode: u8,
    /// Decoded instruction tag; doubles as the micro-op handle.
    pub(crate) ir: Option<Instruction>,
    /// Addressing mode of the decoded instruction.
    pub(crate) mode: AddressingMode,
    /// Up to two operand bytes, little-endian for 16-bit addresses.
    pub(crate) operand: [u8; 2],

    // ---- Pipeline registers ----
    stage: Stage,
    /// Sub-step counter within the current stage. Unbounded only during
    /// a streaming string print.
    pub(crate) pulse_in_stage: u32,
    /// Operand bytes the decoded instruction needs.
    fetch_count: u8,
    /// Operand bytes loaded so far.
    current_fetch: u8,
    /// Toggle inside the operand-fetch stall: a read has been triggered
    /// and its MDR is due next pulse.
    operand_read_issued: bool,

    // ---- Deferred write (Writeback stage inputs) ----
    /// Destination for a deferred write, if one is latched.
    pub(crate) write_address: Option<u16>,
    /// Value for a deferred write, if one is latched.
    pub(crate) write_value: Option<u8>,

    // ---- Interrupts and host surface ----
    /// At most one interrupt awaiting the InterruptCheck stage.
    pending_interrupt: Option<Interrupt>,
    /// Set by BRK or a keyboard `q`; drained by the System.
    stop_requested: bool,
    /// Program output accumulated by SYS.
    pub(crate) output: String,
    /// Streaming print cursor, live only within one Execute stage.
    pub(crate) string_cursor: Option<u16>,

    // ---- Configuration ----
    /// Whether ADC includes the carry flag in its sum.
    pub(crate) use_carry: bool,
}

impl Cpu {
    /// Creates a CPU in power-on state: all registers zero, flags clear,
    /// pipeline at Fetch, PC at 0x0000 (where programs are loaded).
    pub fn new(use_carry: bool) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            flag_z: false,
            flag_c: false,
            pc: 0,
            opcode: 0,
            ir: None,
            mode: AddressingMode::Implied,
            operand: [0, 0],
            stage: Stage::Fetch,
            pulse_in_stage: 0,
            fetch_count: 0,
            current_fetch: 0,
            operand_read_issued: false,
            write_address: None,
            write_value: None,
            pending_interrupt: None,
            stop_requested: false,
            output: String::new(),
            string_cursor: None,
            use_carry,
        }
    }

    /// Advances the pipeline by one clock pulse.
    ///
    /// A no-op while the MMU is still draining a program into memory.
    /// Errors are the System's to catch: it logs them with context and
    /// calls [`Cpu::abort_instruction`].
    pub fn tick(&mut self, mmu: &mut Mmu) -> Result<(), CpuError> {
        if mmu.is_program_loading() {
            return Ok(());
        }

        // Operand-fetch stall: holds the stage while announced operand
        // bytes remain, two pulses per byte.
        if self.fetch_count > 0 && self.current_fetch < self.fetch_count {
            return self.operand_fetch_pulse(mmu);
        }

        match self.stage {
            Stage::Fetch => self.fetch_pulse(mmu),
            Stage::Decode => self.decode_pulse(),
            Stage::Execute => self.execute_pulse(mmu),
            Stage::Writeback => self.writeback_pulse(mmu),
            Stage::InterruptCheck => self.interrupt_check_pulse(),
        }
    }

    /// One pulse of the operand-fetch sub-protocol.
    fn operand_fetch_pulse(&mut self, mmu: &mut Mmu) -> Result<(), CpuError> {
        if !self.operand_read_issued {
            mmu.trigger_read(self.pc);
            self.operand_read_issued = true;
        } else {
            self.operand[self.current_fetch as usize] = mmu.mdr()?;
            self.pc = self.pc.wrapping_add(1);
            self.current_fetch += 1;
            self.operand_read_issued = false;

            if self.current_fetch >= self.fetch_count {
                self.fetch_count = 0;
                self.current_fetch = 0;
            }
        }
        Ok(())
    }

    /// Fetch stage: two pulses to read the opcode byte.
    fn fetch_pulse(&mut self, mmu: &mut Mmu) -> Result<(), CpuError> {
        if self.pulse_in_stage == 0 {
            mmu.trigger_read(self.pc);
            self.pulse_in_stage += 1;
            return Ok(());
        }

        self.opcode = mmu.mdr()?;
        self.pc = self.pc.wrapping_add(1);
        self.advance(Stage::Decode);
        Ok(())
    }

    /// Decode stage: one pulse to latch instruction, mode, and operand
    /// size.
    fn decode_pulse(&mut self) -> Result<(), CpuError> {
        let metadata =
            opcodes::decode(self.opcode).ok_or(CpuError::UnknownOpcode(self.opcode))?;

        self.ir = Some(metadata.instruction);
        self.mode = metadata.addressing_mode;
        self.operand = [0, 0];
        self.current_fetch = 0;

        // SYS is the one instruction whose operand size depends on a
        // register: two bytes when X selects the addressed string print.
        self.fetch_count = match metadata.addressing_mode {
            AddressingMode::DispatchOnX => {
                if self.x == 0x03 {
                    2
                } else {
                    0
                }
            }
            mode => mode.operand_bytes(),
        };

        log::trace!(
            "decoded {} (0x{:02X}) at pc=0x{:04X}, {} operand byte(s)",
            metadata.mnemonic,
            self.opcode,
            self.pc.wrapping_sub(1),
            self.fetch_count
        );

        self.advance(Stage::Execute);
        Ok(())
    }

    /// Execute stage: one micro-op pulse.
    fn execute_pulse(&mut self, mmu: &mut Mmu) -> Result<(), CpuError> {
        let instruction = self.ir.ok_or(CpuError::UnknownOpcode(self.opcode))?;

        let step = match instruction {
            Instruction::Lda => instructions::load_store::execute_load(self, mmu, LoadTarget::A)?,
            Instruction::Ldx => instructions::load_store::execute_load(self, mmu, LoadTarget::X)?,
            Instruction::Ldy => instructions::load_store::execute_load(self, mmu, LoadTarget::Y)?,
            Instruction::Sta => instructions::load_store::execute_sta(self, mmu)?,
            Instruction::Txa => instructions::transfer::execute_txa(self)?,
            Instruction::Tya => instructions::transfer::execute_tya(self)?,
            Instruction::Tax => instructions::transfer::execute_tax(self)?,
            Instruction::Tay => instructions::transfer::execute_tay(self)?,
            Instruction::Adc => instructions::alu::execute_adc(self, mmu)?,
            Instruction::Cpx => instructions::alu::execute_cpx(self, mmu)?,
            Instruction::Bne => instructions::branches::execute_bne(self)?,
            Instruction::Inc => instructions::inc_dec::execute_inc(self, mmu)?,
            Instruction::Nop => instructions::control::execute_nop(self)?,
            Instruction::Brk => instructions::control::execute_brk(self)?,
            Instruction::Sys => instructions::syscalls::execute_sys(self, mmu)?,
        };

        match step {
            MicroStep::Again => {
                self.pulse_in_stage += 1;
            }
            MicroStep::Done => {
                // Writeback runs only when a deferred write is fully
                // latched: both slots set, checked explicitly. A write of
                // value 0 to address 0 is still a write.
                let next = if self.write_address.is_some() && self.write_value.is_some() {
                    Stage::Writeback
                } else {
                    Stage::InterruptCheck
                };
                self.advance(next);
            }
        }
        Ok(())
    }

    /// Writeback stage: one pulse to commit the deferred write.
    fn writeback_pulse(&mut self, mmu: &mut Mmu) -> Result<(), CpuError> {
        if let (Some(address), Some(value)) = (self.write_address.take(), self.write_value.take())
        {
            mmu.write_immediate(address, value);
        }
        self.advance(Stage::InterruptCheck);
        Ok(())
    }

    /// InterruptCheck stage: one pulse to service and clear the pending
    /// slot, then back to Fetch.
    fn interrupt_check_pulse(&mut self) -> Result<(), CpuError> {
        if let Some(interrupt) = self.pending_interrupt.take() {
            let is_quit_key = interrupt.device == keyboard::DEVICE_NAME
                && matches!(encoding::to_char(interrupt.data), Some('q') | Some('Q'));

            if is_quit_key {
                log::debug!("keyboard quit key observed, requesting stop");
                self.stop_requested = true;
            } else {
                log::debug!(
                    "interrupt serviced: irq={} device={} data=0x{:02X}",
                    interrupt.irq,
                    interrupt.device,
                    interrupt.data
                );
            }
        }

        self.advance(Stage::Fetch);
        Ok(())
    }

    /// Moves to `next` and resets the per-stage sub-state.
    fn advance(&mut self, next: Stage) {
        self.stage = next;
        self.pulse_in_stage = 0;
        self.string_cursor = None;
    }

    /// Abandons the current instruction after a fault and resets the
    /// pipeline to Fetch. Registers and memory keep whatever state the
    /// instruction had already produced.
    pub fn abort_instruction(&mut self) {
        self.ir = None;
        self.fetch_count = 0;
        self.current_fetch = 0;
        self.operand_read_issued = false;
        self.write_address = None;
        self.write_value = None;
        self.advance(Stage::Fetch);
    }

    /// Latches an interrupt into the pending slot, replacing any
    /// unserviced one.
    pub fn set_pending_interrupt(&mut self, interrupt: Interrupt) {
        self.pending_interrupt = Some(interrupt);
    }

    /// The interrupt awaiting the next InterruptCheck stage, if any.
    pub fn pending_interrupt(&self) -> Option<&Interrupt> {
        self.pending_interrupt.as_ref()
    }

    /// Requests a system stop at the next pulse boundary.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Returns and clears the stop request flag.
    pub fn take_stop_request(&mut self) -> bool {
        std::mem::take(&mut self.stop_requested)
    }

    // ========== Register and state accessors ==========

    /// Accumulator value.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// X index register value.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Y index register value.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Zero flag.
    pub fn flag_z(&self) -> bool {
        self.flag_z
    }

    /// Carry flag.
    pub fn flag_c(&self) -> bool {
        self.flag_c
    }

    /// Program counter.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Most recently fetched opcode byte.
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Current pipeline stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Operand bytes the decoded instruction still expects in total.
    pub fn fetch_count(&self) -> u8 {
        self.fetch_count
    }

    /// Operand bytes loaded so far.
    pub fn current_fetch(&self) -> u8 {
        self.current_fetch
    }

    /// Program output accumulated by SYS so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Registers as a completion snapshot.
    pub fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            a: self.a,
            x: self.x,
            y: self.y,
            z: self.flag_z,
            c: self.flag_c,
        }
    }

    /// The effective 16-bit little-endian operand address.
    pub(crate) fn operand_address(&self) -> u16 {
        u16::from_le_bytes(self.operand)
    }
}
