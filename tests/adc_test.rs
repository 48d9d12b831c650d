//! Tests for the ADC (Add with Carry) instruction.
//!
//! ADC in this machine is absolute-mode only, updates C on unsigned
//! overflow, and deliberately never touches Z. Whether the carry flag
//! feeds back into the sum is the `use_carry` startup option.

use pulse6502::{Config, Program, System};

/// Runs `code` to completion with the given carry configuration.
fn run_program_with(config: Config, code: &[u8]) -> System {
    let mut system = System::new(config);
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

fn run_program(code: &[u8]) -> System {
    run_program_with(Config::default(), code)
}

// ========== Basic addition ==========

#[test]
fn test_adc_without_overflow() {
    // LDA #$FE, STA $0010, LDA #$01, ADC $0010, BRK
    // 0x01 + 0xFE = 0xFF, no carry out.
    let system = run_program(&[
        0xA9, 0xFE, 0x8D, 0x10, 0x00, 0xA9, 0x01, 0x6D, 0x10, 0x00, 0x00,
    ]);
    assert_eq!(system.cpu().a(), 0xFF);
    assert!(!system.cpu().flag_c());
}

#[test]
fn test_adc_with_carry_out() {
    // LDA #$FF, STA $0010, LDA #$02, ADC $0010, BRK
    // 0x02 + 0xFF = 0x101 → A = 0x01, C set.
    let system = run_program(&[
        0xA9, 0xFF, 0x8D, 0x10, 0x00, 0xA9, 0x02, 0x6D, 0x10, 0x00, 0x00,
    ]);
    assert_eq!(system.cpu().a(), 0x01);
    assert!(system.cpu().flag_c());
}

#[test]
fn test_adc_sum_to_exactly_0x100() {
    // 0x80 + 0x80 = 0x100 → A = 0x00, C set.
    let system = run_program(&[
        0xA9, 0x80, 0x8D, 0x10, 0x00, 0xA9, 0x80, 0x6D, 0x10, 0x00, 0x00,
    ]);
    assert_eq!(system.cpu().a(), 0x00);
    assert!(system.cpu().flag_c());
}

// ========== Z is never touched ==========

#[test]
fn test_adc_does_not_set_z_on_zero_result() {
    // A zero sum would set Z on a real 6502; this machine leaves it
    // alone. 0x80 + 0x80 → A = 0x00, Z still clear.
    let system = run_program(&[
        0xA9, 0x80, 0x8D, 0x10, 0x00, 0xA9, 0x80, 0x6D, 0x10, 0x00, 0x00,
    ]);
    assert_eq!(system.cpu().a(), 0x00);
    assert!(!system.cpu().flag_z());
}

#[test]
fn test_adc_does_not_clear_a_set_z() {
    // CPX sets Z first (X=0 vs M=0); the following non-zero ADC must not
    // clear it. CPX $0020, LDA #$01, ADC $0020, BRK
    let system = run_program(&[0xEC, 0x20, 0x00, 0xA9, 0x01, 0x6D, 0x20, 0x00, 0x00]);
    assert_eq!(system.cpu().a(), 0x01);
    assert!(system.cpu().flag_z(), "Z survives ADC untouched");
}

// ========== The use_carry option ==========

#[test]
fn test_carry_in_ignored_when_use_carry_disabled() {
    // First ADC sets C; second ADC must not absorb it. The scratch cell
    // sits at $0030, past the end of the 21-byte program.
    // LDA #$FF, STA $0030, LDA #$02, ADC $0030 (C←1, A=0x01),
    // LDA #$03, STA $0030, LDA #$04, ADC $0030, BRK
    let system = run_program(&[
        0xA9, 0xFF, 0x8D, 0x30, 0x00, 0xA9, 0x02, 0x6D, 0x30, 0x00, // sets carry
        0xA9, 0x03, 0x8D, 0x30, 0x00, 0xA9, 0x04, 0x6D, 0x30, 0x00, // 4 + 3
        0x00,
    ]);
    assert_eq!(system.cpu().a(), 0x07, "no +1 from the stale carry");
    assert!(!system.cpu().flag_c());
}

#[test]
fn test_carry_in_applied_when_use_carry_enabled() {
    let config = Config {
        debug: false,
        use_carry: true,
    };
    // Same program as above; the second sum now includes the carry.
    let system = run_program_with(
        config,
        &[
            0xA9, 0xFF, 0x8D, 0x30, 0x00, 0xA9, 0x02, 0x6D, 0x30, 0x00, // sets carry
            0xA9, 0x03, 0x8D, 0x30, 0x00, 0xA9, 0x04, 0x6D, 0x30, 0x00, // 4 + 3 + C
            0x00,
        ],
    );
    assert_eq!(system.cpu().a(), 0x08, "carry feeds into the sum");
    assert!(!system.cpu().flag_c());
}

#[test]
fn test_clear_carry_adds_nothing_even_when_enabled() {
    let config = Config {
        debug: false,
        use_carry: true,
    };
    // LDA #$02, STA $0010, LDA #$03, ADC $0010, BRK. C starts clear.
    let system = run_program_with(
        config,
        &[0xA9, 0x02, 0x8D, 0x10, 0x00, 0xA9, 0x03, 0x6D, 0x10, 0x00, 0x00],
    );
    assert_eq!(system.cpu().a(), 0x05);
    assert!(!system.cpu().flag_c());
}
