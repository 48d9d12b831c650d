//! # System Coordination
//!
//! The `System` owns every hardware component and is the machine's only
//! scheduler. One call to [`System::pulse`] is one clock pulse: the CPU
//! ticks first, then the memory (through the MMU), then the interrupt
//! controller. That fixed order is the scheduling contract the whole
//! design leans on:
//!
//! - a memory operation the CPU triggers on pulse N completes later in
//!   pulse N, so the CPU observes it no earlier than pulse N+1;
//! - an interrupt accepted during pulse N is delivered by the controller
//!   at the end of pulse N and serviced by the CPU from pulse N+1 on;
//! - the program loader commits one byte per pulse and frees the CPU on
//!   the pulse after the final byte lands.
//!
//! [`System::run`] adds wall-clock pacing and keyboard capture for the
//! interactive binary; tests drive [`System::pulse`] directly.

use std::time::Duration;

use crate::clock::{Clock, Timer, DEFAULT_TICK_PERIOD};
use crate::cpu::Cpu;
use crate::interrupts::{Interrupt, InterruptController};
use crate::keyboard::{self, Input};
use crate::mmu::Mmu;
use crate::program::{Program, RegisterSnapshot};
use crate::SystemError;

/// Startup options, chosen once before the machine boots.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Enables diagnostic logging (the binary maps this to the log
    /// filter level).
    pub debug: bool,

    /// Whether ADC includes the carry flag in its sum.
    pub use_carry: bool,
}

/// What a completed program left behind.
#[derive(Debug, Clone)]
pub struct Report {
    /// Program name, for display.
    pub program_name: String,

    /// Everything SYS printed.
    pub output: String,

    /// Registers at stop.
    pub registers: RegisterSnapshot,

    /// Oracle verdict: `Some(true)` = PASS, `Some(false)` = FAIL,
    /// `None` = the program carried no expected snapshot.
    pub verdict: Option<bool>,
}

/// Outcome of an interactive run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The completion report.
    pub report: Report,

    /// True when the run ended because the host pressed Ctrl-C; the
    /// caller should terminate instead of returning to its menu.
    pub host_interrupt: bool,
}

/// Top-level coordinator owning all hardware components.
pub struct System {
    config: Config,
    cpu: Cpu,
    mmu: Mmu,
    controller: InterruptController,
    clock: Clock,
    running: bool,
    program: Option<Program>,
}

impl System {
    /// Wires a machine together from the given options.
    pub fn new(config: Config) -> Self {
        Self::with_period(config, DEFAULT_TICK_PERIOD)
    }

    /// Wires a machine with a non-default tick period.
    pub fn with_period(config: Config, period: Duration) -> Self {
        Self {
            config,
            cpu: Cpu::new(config.use_carry),
            mmu: Mmu::new(),
            controller: InterruptController::new(),
            clock: Clock::new(period),
            running: false,
            program: None,
        }
    }

    /// Resets the machine and stages `program` for loading.
    ///
    /// The load itself is clocked: the MMU drains one byte per pulse
    /// while the CPU idles, so execution begins `program.code.len()`
    /// pulses after this call. An empty program is rejected and the
    /// machine stays idle.
    pub fn load_program(&mut self, program: Program) -> Result<(), SystemError> {
        if program.code.is_empty() {
            return Err(SystemError::EmptyProgram);
        }

        self.cpu = Cpu::new(self.config.use_carry);
        self.mmu.reset();
        self.controller.clear();
        self.mmu.set_program(&program.code);
        self.program = Some(program);
        self.running = true;

        Ok(())
    }

    /// True until the program stops the machine (BRK, keyboard quit) or
    /// the host does.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advances the whole machine by one clock pulse.
    ///
    /// Listener order is fixed: CPU, then memory, then interrupt
    /// controller. CPU faults are caught here and logged with PC, opcode,
    /// and stage; the pipeline abandons the instruction and resumes at
    /// Fetch on the next pulse. When the machine is stopped this is a
    /// no-op apart from the tick counter.
    pub fn pulse(&mut self) {
        self.clock.advance();

        if !self.running {
            return;
        }

        if let Err(fault) = self.cpu.tick(&mut self.mmu) {
            log::error!(
                "cpu fault at pc=0x{:04X} opcode=0x{:02X} stage={:?}: {}",
                self.cpu.pc(),
                self.cpu.opcode(),
                self.cpu.stage(),
                fault
            );
            self.cpu.abort_instruction();
        }

        self.mmu.tick();
        self.controller.tick(&mut self.cpu);

        if self.cpu.take_stop_request() {
            self.stop();
        }
    }

    /// Stops the machine: the clock stops firing work, the interrupt
    /// queue is emptied, and subsequent pulses are no-ops.
    pub fn stop(&mut self) {
        log::debug!("system stopping after {} pulses", self.clock.ticks());
        self.running = false;
        self.controller.clear();
    }

    /// Runs the machine in real time until it stops.
    ///
    /// Each iteration waits out one tick period, drains the keyboard,
    /// publishes each keystroke as an interrupt, and fires one pulse.
    /// Ctrl-C (byte 0x03) stops the machine and flags the outcome so the
    /// host terminates.
    pub fn run<I: Input>(&mut self, input: &mut I) -> Result<RunOutcome, SystemError> {
        let mut timer = Timer::start();
        let mut host_interrupt = false;

        while self.running {
            timer.pause_for(self.clock.period());

            for byte in input.drain()? {
                if byte == keyboard::ETX {
                    log::debug!("host interrupt (Ctrl-C)");
                    host_interrupt = true;
                    self.stop();
                    break;
                }
                self.controller.accept(Interrupt::keyboard(byte));
            }

            self.pulse();
        }

        Ok(RunOutcome {
            report: self.report(),
            host_interrupt,
        })
    }

    /// Builds the completion report for the current program.
    pub fn report(&self) -> Report {
        let registers = self.cpu.snapshot();
        let (program_name, verdict) = match &self.program {
            Some(program) => (
                program.name.clone(),
                program.expected.map(|expected| expected == registers),
            ),
            None => (String::new(), None),
        };

        Report {
            program_name,
            output: self.cpu.output().to_string(),
            registers,
            verdict,
        }
    }

    /// The CPU, for inspection.
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Reads a memory cell directly (host-side inspection only).
    pub fn peek(&self, address: u16) -> u8 {
        self.mmu.peek(address)
    }

    /// True while the program loader is still draining bytes into memory.
    pub fn is_program_loading(&self) -> bool {
        self.mmu.is_program_loading()
    }

    /// Clock pulses fired since boot.
    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    /// Queues an interrupt for arbitration at the end of the next pulse,
    /// exactly as a device would.
    pub fn inject_interrupt(&mut self, interrupt: Interrupt) {
        self.controller.accept(interrupt);
    }
}
