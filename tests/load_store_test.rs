//! Tests for the load and store instructions (LDA, LDX, LDY, STA).
//!
//! Loads come in immediate and absolute forms; STA is absolute only.
//! None of them touch the flags.

use pulse6502::{Config, Program, System};

/// Runs `code` to completion on a default machine and returns it stopped.
fn run_program(code: &[u8]) -> System {
    let mut system = System::new(Config::default());
    system
        .load_program(Program::new("test", code.to_vec()))
        .unwrap();
    for _ in 0..100_000 {
        if !system.is_running() {
            return system;
        }
        system.pulse();
    }
    panic!("program did not stop");
}

// ========== Immediate loads ==========

#[test]
fn test_lda_immediate() {
    // LDA #$42, BRK
    let system = run_program(&[0xA9, 0x42, 0x00]);
    assert_eq!(system.cpu().a(), 0x42);
}

#[test]
fn test_ldx_immediate() {
    // LDX #$10, BRK
    let system = run_program(&[0xA2, 0x10, 0x00]);
    assert_eq!(system.cpu().x(), 0x10);
}

#[test]
fn test_ldy_immediate() {
    // LDY #$FE, BRK
    let system = run_program(&[0xA0, 0xFE, 0x00]);
    assert_eq!(system.cpu().y(), 0xFE);
}

#[test]
fn test_load_of_zero_does_not_set_z() {
    // LDA #$00, BRK. Loads never touch flags in this machine.
    let system = run_program(&[0xA9, 0x00, 0x00]);
    assert_eq!(system.cpu().a(), 0x00);
    assert!(!system.cpu().flag_z());
}

// ========== Absolute loads ==========

#[test]
fn test_lda_absolute_reads_through_memory() {
    // The program's own bytes are data too.
    // LDA $0004, BRK, .byte $77
    let system = run_program(&[0xAD, 0x04, 0x00, 0x00, 0x77]);
    assert_eq!(system.cpu().a(), 0x77);
}

#[test]
fn test_ldx_absolute() {
    // LDX $0004, BRK, .byte $21
    let system = run_program(&[0xAE, 0x04, 0x00, 0x00, 0x21]);
    assert_eq!(system.cpu().x(), 0x21);
}

#[test]
fn test_ldy_absolute() {
    // LDY $0004, BRK, .byte $83
    let system = run_program(&[0xAC, 0x04, 0x00, 0x00, 0x83]);
    assert_eq!(system.cpu().y(), 0x83);
}

#[test]
fn test_absolute_address_is_little_endian() {
    // LDA $0100, BRK. The operand bytes are low, then high.
    // Nothing was stored at 0x0100, so A reads the default zero; then
    // verify the converse with a real store below.
    let system = run_program(&[0xAD, 0x00, 0x01, 0x00]);
    assert_eq!(system.cpu().a(), 0x00);

    // LDA #$AB, STA $0100, LDA #$00, LDA $0100, BRK
    let system = run_program(&[
        0xA9, 0xAB, 0x8D, 0x00, 0x01, 0xA9, 0x00, 0xAD, 0x00, 0x01, 0x00,
    ]);
    assert_eq!(system.cpu().a(), 0xAB);
    assert_eq!(system.peek(0x0100), 0xAB);
}

// ========== STA ==========

#[test]
fn test_sta_writes_accumulator_to_memory() {
    // LDA #$3C, STA $0040, BRK
    let system = run_program(&[0xA9, 0x3C, 0x8D, 0x40, 0x00, 0x00]);
    assert_eq!(system.peek(0x0040), 0x3C);
    assert_eq!(system.cpu().a(), 0x3C, "STA leaves A unchanged");
}

#[test]
fn test_sta_lda_round_trip() {
    // For any byte: STA a; LDA a leaves A with the same value.
    // LDA #$C7, STA $0200, LDA #$00, LDA $0200, BRK
    let system = run_program(&[
        0xA9, 0xC7, 0x8D, 0x00, 0x02, 0xA9, 0x00, 0xAD, 0x00, 0x02, 0x00,
    ]);
    assert_eq!(system.cpu().a(), 0xC7);
}

#[test]
fn test_sta_can_overwrite_program_bytes() {
    // Code and data share the flat address space: overwrite a NOP that
    // was already executed. LDA #$55, STA $0000, BRK
    let system = run_program(&[0xA9, 0x55, 0x8D, 0x00, 0x00, 0x00]);
    assert_eq!(system.peek(0x0000), 0x55);
}
