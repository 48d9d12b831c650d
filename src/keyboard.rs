//! # Keyboard Input
//!
//! Keystrokes enter the machine as interrupts: one byte per key press,
//! published to the interrupt controller with `irq=1, priority=1`. The
//! run loop polls the keyboard once per pulse, which serializes host
//! input with the tick loop without any locking.
//!
//! [`StdinKeyboard`] is the production backend: it puts the terminal in
//! raw mode (restored on drop) and drains crossterm key events without
//! blocking. [`ScriptedKeyboard`] feeds a canned byte schedule to tests.
//!
//! Two bytes get special treatment downstream: Ctrl-C arrives as 0x03 and
//! terminates the host loop; `q`/`Q` stops the running system when the
//! CPU's InterruptCheck stage sees it.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::encoding;

/// Device name carried by keyboard interrupts; the CPU's InterruptCheck
/// stage matches on it.
pub const DEVICE_NAME: &str = "Keyboard";

/// ASCII end-of-text, produced by Ctrl-C in raw mode.
pub const ETX: u8 = 0x03;

/// A source of keystroke bytes polled once per clock pulse.
pub trait Input {
    /// Returns every byte that arrived since the last call, oldest first.
    fn drain(&mut self) -> Result<Vec<u8>, io::Error>;
}

/// Raw-mode stdin keyboard backed by crossterm.
///
/// Construction enables raw mode; dropping the value restores the
/// terminal. Keep exactly one alive at a time.
pub struct StdinKeyboard {
    buffer: Vec<u8>,
}

impl StdinKeyboard {
    /// Enables raw mode and returns the keyboard.
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinKeyboard { buffer: Vec::new() })
    }

    /// Pulls all pending crossterm events into the byte buffer without
    /// blocking.
    fn read_pending_events(&mut self) -> Result<(), io::Error> {
        while poll(Duration::ZERO)? {
            let Event::Key(event) = read()? else {
                continue;
            };
            if event.kind != KeyEventKind::Press {
                continue;
            }

            match event.code {
                KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.buffer.push(ETX);
                }
                KeyCode::Char(key) => match encoding::to_byte(key) {
                    Some(byte) => self.buffer.push(byte),
                    None => {
                        log::warn!("dropping key {:?}: outside the machine's character set", key);
                    }
                },
                KeyCode::Enter => self.buffer.push(b'\n'),
                KeyCode::Tab => self.buffer.push(b'\t'),
                _ => {}
            }
        }
        Ok(())
    }
}

impl Drop for StdinKeyboard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for StdinKeyboard {
    fn drain(&mut self) -> Result<Vec<u8>, io::Error> {
        self.read_pending_events()?;
        Ok(std::mem::take(&mut self.buffer))
    }
}

/// Deterministic keyboard for tests: yields one scripted batch of bytes
/// per drain call.
///
/// An entry of `vec![]` models a pulse with no input. Once the script is
/// exhausted every further drain returns nothing.
pub struct ScriptedKeyboard {
    batches: VecDeque<Vec<u8>>,
}

impl ScriptedKeyboard {
    /// Creates a keyboard that delivers `batches` in order, one per
    /// drain call.
    pub fn new(batches: Vec<Vec<u8>>) -> Self {
        Self {
            batches: batches.into(),
        }
    }

    /// Creates a keyboard that delivers all of `bytes` on the first
    /// drain call and nothing afterwards.
    pub fn immediate(bytes: &[u8]) -> Self {
        Self::new(vec![bytes.to_vec()])
    }
}

impl Input for ScriptedKeyboard {
    fn drain(&mut self) -> Result<Vec<u8>, io::Error> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}
