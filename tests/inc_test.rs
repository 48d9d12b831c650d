//! Tests for the INC (Increment Memory) instruction.
//!
//! INC is the one instruction that routes through the Writeback stage:
//! Execute reads and computes, Writeback commits. No flags are affected.

use pulse6502::{Config, Program, System};

/// Runs `code` to completion on a default machine and returns it stopped.
fn run_program(code: &[u8]) -> System {
    let mut system = System::new(Config::default());
    system
        .load_program(Program::new("test", code.to_vec()))
        .unwrap();
    for _ in 0..1_000_000 {
        if !system.is_running() {
            return system;
        }
        system.pulse();
    }
    panic!("program did not stop");
}

#[test]
fn test_inc_increments_a_cell() {
    // INC $0040, BRK
    let system = run_program(&[0xEE, 0x40, 0x00, 0x00]);
    assert_eq!(system.peek(0x0040), 0x01);
}

#[test]
fn test_inc_twice() {
    // INC $0040, INC $0040, BRK
    let system = run_program(&[0xEE, 0x40, 0x00, 0xEE, 0x40, 0x00, 0x00]);
    assert_eq!(system.peek(0x0040), 0x02);
}

#[test]
fn test_inc_does_not_touch_flags_or_registers() {
    // INC $0040, BRK
    let system = run_program(&[0xEE, 0x40, 0x00, 0x00]);
    let cpu = system.cpu();
    assert_eq!(cpu.a(), 0x00);
    assert_eq!(cpu.x(), 0x00);
    assert_eq!(cpu.y(), 0x00);
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_c());
}

#[test]
fn test_inc_wraps_0xff_to_zero_and_commits_the_zero() {
    // The Writeback gate is "both slots latched", so a write-back of the
    // value zero must still commit.
    // LDA #$FF, STA $0040, INC $0040, BRK
    let system = run_program(&[0xA9, 0xFF, 0x8D, 0x40, 0x00, 0xEE, 0x40, 0x00, 0x00]);
    assert_eq!(system.peek(0x0040), 0x00);
}

#[test]
fn test_inc_address_zero_commits() {
    // A write-back targeting address zero must also commit: INC $0000
    // bumps this program's own first opcode byte (0xEE → 0xEF) after it
    // has already executed.
    // INC $0000, BRK
    let system = run_program(&[0xEE, 0x00, 0x00, 0x00]);
    assert_eq!(system.peek(0x0000), 0xEF);
}

#[test]
fn test_inc_256_times_returns_to_original_value() {
    // 256 increments are the identity on a byte cell.
    let mut code = Vec::new();
    for _ in 0..256 {
        code.extend_from_slice(&[0xEE, 0x40, 0x02]); // INC $0240
    }
    code.push(0x00); // BRK

    let system = run_program(&code);
    assert_eq!(system.peek(0x0240), 0x00);
}
