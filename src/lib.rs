//! # pulse6502: a clocked 8-bit microcomputer simulator
//!
//! This crate simulates a small 8-bit microcomputer loosely modeled on the
//! MOS 6502. Unlike an instruction-at-a-time emulator, every component is
//! advanced by a shared clock pulse, and multi-cycle work is encoded as
//! pipeline state that persists between pulses:
//!
//! - **CPU**: a five-stage pipeline (Fetch / Decode / Execute / Writeback /
//!   InterruptCheck) that consumes one pulse per sub-step
//! - **Memory**: 64 KiB of RAM behind MAR/MDR latches; one queued read and
//!   one queued write complete per pulse
//! - **MMU**: the CPU's only path to memory, plus a program loader that
//!   drains one byte into memory per pulse
//! - **InterruptController**: buffers device interrupts and delivers the
//!   highest-priority one to the CPU each pulse
//! - **Keyboard**: raw-mode console input published as interrupts
//! - **System**: owns everything and advances the components in a fixed
//!   order on every pulse
//!
//! ## Quick Start
//!
//! ```rust
//! use pulse6502::{Config, Program, System};
//!
//! // LDA #$05, TAX, BRK
//! let program = Program::new("transfer", vec![0xA9, 0x05, 0xAA, 0x00]);
//!
//! let mut system = System::new(Config::default());
//! system.load_program(program).unwrap();
//!
//! // Drive the clock until the program stops itself.
//! while system.is_running() {
//!     system.pulse();
//! }
//!
//! assert_eq!(system.cpu().a(), 0x05);
//! assert_eq!(system.cpu().x(), 0x05);
//! ```
//!
//! ## Determinism
//!
//! Within one pulse the components always run in the same order (CPU,
//! Memory, InterruptController), so a program plus a scripted interrupt
//! schedule produces bit-identical results on every run. The interactive
//! binary adds real-time pacing and keyboard capture on top of the same
//! `System::pulse` entry point the tests use.

use thiserror::Error;

pub mod addressing;
pub mod clock;
pub mod cpu;
pub mod encoding;
pub mod interrupts;
pub mod keyboard;
pub mod memory;
pub mod mmu;
pub mod opcodes;
pub mod program;
pub mod system;

// Internal micro-op implementations (not part of the public API)
mod instructions;

// Re-export the public API
pub use addressing::AddressingMode;
pub use clock::{Clock, Timer, DEFAULT_TICK_PERIOD};
pub use cpu::{Cpu, Stage};
pub use interrupts::{Interrupt, InterruptController};
pub use keyboard::{Input, ScriptedKeyboard, StdinKeyboard};
pub use memory::Memory;
pub use mmu::Mmu;
pub use opcodes::{decode, Instruction, OpcodeMetadata, DECODE_TABLE};
pub use program::{sample_programs, Program, RegisterSnapshot};
pub use system::{Config, Report, RunOutcome, System};

/// Faults raised by the CPU pipeline.
///
/// Every variant is caught at the pulse boundary by [`System::pulse`]: the
/// fault is logged with context (PC, opcode, stage), the current
/// instruction is abandoned, and the pipeline resets to Fetch. There is no
/// hardware exception vector in this machine, so no fault escapes to the
/// host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    /// The Decode stage found no entry for the fetched opcode byte.
    #[error("unknown opcode 0x{0:02X}")]
    UnknownOpcode(u8),

    /// An address fell outside the 16-bit address space. Addresses are
    /// carried as `u16` everywhere, so this is not normally reachable; the
    /// variant exists so out-of-range values produced by future address
    /// arithmetic fault instead of wrapping silently.
    #[error("address 0x{0:X} is outside the 64 KiB address space")]
    MemoryOutOfRange(u32),

    /// SYS was executed with an X register value outside {1, 2, 3}.
    #[error("invalid syscall selector X=0x{0:02X}")]
    InvalidSyscall(u8),

    /// The MDR was read while the matching memory read was still pending.
    /// The two-phase protocol requires triggering the read on one pulse
    /// and consuming the MDR on a later one; hitting this is a sequencing
    /// bug in a micro-op, not a program error.
    #[error("memory data register read before the pending read completed")]
    LoadProtocolViolation,
}

/// Errors surfaced to the host before or outside pipeline execution.
#[derive(Debug, Error)]
pub enum SystemError {
    /// `load_program` was handed an empty byte sequence. The CPU is left
    /// idle; nothing starts.
    #[error("cannot load an empty program")]
    EmptyProgram,

    /// The keyboard backend failed while capturing host input.
    #[error("keyboard error: {0}")]
    Keyboard(#[from] std::io::Error),
}
