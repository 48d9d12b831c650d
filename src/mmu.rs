//! # Memory Management Unit
//!
//! The MMU is the CPU's only path to memory. It presents the latched
//! transaction protocol of [`Memory`] as three verbs (trigger a read,
//! trigger a write, write immediately) and owns the program loader that
//! drains code into memory one byte per clock tick.
//!
//! ## Two-phase convention
//!
//! The CPU must trigger a read on one pulse and consume the MDR on a
//! later one; [`Mmu::mdr`] returns a `LoadProtocolViolation` fault if the
//! matching read has not completed yet. Micro-ops that need a memory
//! value therefore always split the work across two `pulse_in_stage`
//! values.
//!
//! ## Program loading
//!
//! `set_program` primes the first write; every subsequent committed write
//! advances the queue by one byte. The CPU idles while
//! `is_program_loading` is true, so a program of N bytes occupies the
//! machine for exactly N pulses before the first fetch.

use std::collections::VecDeque;

use crate::memory::Memory;
use crate::CpuError;

/// Stateless façade over [`Memory`] plus the program-load queue.
pub struct Mmu {
    /// The memory this MMU fronts. Exclusive ownership; every access from
    /// the CPU side goes through this façade.
    memory: Memory,

    /// Bytes waiting to be written into consecutive memory locations.
    program_queue: VecDeque<u8>,

    /// Next destination address during a program load.
    load_address: u16,

    /// True while the program queue is draining.
    loading: bool,
}

impl Mmu {
    /// Creates an MMU fronting a fresh, zeroed memory.
    pub fn new() -> Self {
        Self {
            memory: Memory::new(),
            program_queue: VecDeque::new(),
            load_address: 0,
            loading: false,
        }
    }

    /// Latches `address` into the MAR and queues a read.
    ///
    /// The value is available from [`Mmu::mdr`] on the next pulse.
    pub fn trigger_read(&mut self, address: u16) {
        self.memory.set_mar(address);
        self.memory.queue_read();
    }

    /// Latches `value` into the MDR and queues a write to the address
    /// already latched in the MAR.
    pub fn trigger_write(&mut self, value: u8) {
        self.memory.set_mdr(value);
        self.memory.queue_write();
    }

    /// Latches both registers and queues a write in one call.
    pub fn write_immediate(&mut self, address: u16, value: u8) {
        self.memory.set_mar(address);
        self.memory.set_mdr(value);
        self.memory.queue_write();
    }

    /// Returns the MDR contents latched by the most recent completed read.
    ///
    /// Faults with [`CpuError::LoadProtocolViolation`] if the read is
    /// still pending: a micro-op consumed the value on the same pulse it
    /// triggered the read, which the two-phase protocol forbids.
    pub fn mdr(&self) -> Result<u8, CpuError> {
        if self.memory.read_pending() {
            return Err(CpuError::LoadProtocolViolation);
        }
        Ok(self.memory.mdr())
    }

    /// Resets load state and stages `bytes` for loading at address 0x0000.
    ///
    /// Primes the first write immediately; the remaining bytes drain one
    /// per tick as each write commits.
    pub fn set_program(&mut self, bytes: &[u8]) {
        self.program_queue.clear();
        self.program_queue.extend(bytes);
        self.load_address = 0;
        self.loading = !bytes.is_empty();

        if self.loading {
            self.advance_load();
        }
    }

    /// Stages the next queued byte for writing, or ends the load when the
    /// queue is empty.
    fn advance_load(&mut self) {
        match self.program_queue.pop_front() {
            Some(byte) => {
                self.write_immediate(self.load_address, byte);
                self.load_address = self.load_address.wrapping_add(1);
            }
            None => {
                self.loading = false;
            }
        }
    }

    /// True while program bytes are still draining into memory.
    pub fn is_program_loading(&self) -> bool {
        self.loading
    }

    /// Advances the memory by one clock tick.
    ///
    /// When the committed operation was a write and a program load is in
    /// flight, the loader advances by one byte. This is what paces the
    /// load at one byte per tick.
    pub fn tick(&mut self) {
        let wrote = self.memory.tick();
        if wrote && self.loading {
            self.advance_load();
        }
    }

    /// Reads a cell directly for host-side inspection (reports, tests).
    pub fn peek(&self, address: u16) -> u8 {
        self.memory.peek(address)
    }

    /// Clears the load queue and resets the memory to power-on state.
    pub fn reset(&mut self) {
        self.program_queue.clear();
        self.load_address = 0;
        self.loading = false;
        self.memory.reset();
    }
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}
