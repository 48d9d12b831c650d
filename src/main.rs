//! Interactive host shell for the pulse6502 machine.
//!
//! Prompts for the startup options, then loops over a program menu:
//! bundled samples, hand-entered hex, or quit. Each run captures the
//! keyboard in raw mode (press `q` to stop the running program, Ctrl-C
//! to leave entirely) and ends with the program's output, a register
//! dump, and, when the program carries an oracle, a PASS/FAIL verdict.

use std::error::Error;
use std::io::{self, BufRead, Write};

use log::LevelFilter;

use pulse6502::{sample_programs, Config, Program, Report, StdinKeyboard, System};

fn main() -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let config = prompt_config(&mut lines)?;

    env_logger::Builder::new()
        .filter_level(if config.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .init();

    let samples = sample_programs();

    loop {
        print_menu(&samples);
        let Some(choice) = next_line(&mut lines)? else {
            break; // stdin closed
        };

        let program = match choice.trim() {
            "" => continue,
            "q" | "Q" => break,
            "h" | "H" => match prompt_hex_program(&mut lines)? {
                Some(program) => program,
                None => continue,
            },
            number => {
                let Ok(index) = number.parse::<usize>() else {
                    println!("Not a menu entry: {number}");
                    continue;
                };
                match samples.get(index.wrapping_sub(1)) {
                    Some(program) => program.clone(),
                    None => {
                        println!("No such program: {index}");
                        continue;
                    }
                }
            }
        };

        if run_program(config, program)? {
            // Ctrl-C during the run: terminate rather than re-menu.
            break;
        }
    }

    Ok(())
}

/// Asks the two startup questions. Defaults are "no".
fn prompt_config<I>(lines: &mut I) -> Result<Config, io::Error>
where
    I: Iterator<Item = Result<String, io::Error>>,
{
    print!("Enable debug logging? [y/N] ");
    io::stdout().flush()?;
    let debug = matches!(next_line(lines)?.as_deref(), Some("y") | Some("Y"));

    print!("Include carry flag in ADC? [y/N] ");
    io::stdout().flush()?;
    let use_carry = matches!(next_line(lines)?.as_deref(), Some("y") | Some("Y"));

    Ok(Config { debug, use_carry })
}

fn print_menu(samples: &[Program]) {
    println!();
    println!("==== pulse6502 ====");
    for (index, program) in samples.iter().enumerate() {
        println!("  {}) {}", index + 1, program.name);
    }
    println!("  h) enter program as hex");
    println!("  q) quit");
    print!("> ");
    let _ = io::stdout().flush();
}

/// Reads hex byte pairs over multiple lines until a blank line.
///
/// Tokens are whitespace-separated; each must parse as one byte. A bad
/// token abandons the entry and returns to the menu; partial programs
/// never reach the machine.
fn prompt_hex_program<I>(lines: &mut I) -> Result<Option<Program>, io::Error>
where
    I: Iterator<Item = Result<String, io::Error>>,
{
    println!("Enter hex bytes (e.g. A9 05 AA 00), blank line to finish:");

    let mut code = Vec::new();
    loop {
        let Some(line) = next_line(lines)? else {
            break;
        };
        if line.trim().is_empty() {
            break;
        }

        for token in line.split_whitespace() {
            match u8::from_str_radix(token, 16) {
                Ok(byte) => code.push(byte),
                Err(_) => {
                    println!("Not a hex byte: {token}");
                    return Ok(None);
                }
            }
        }
    }

    if code.is_empty() {
        println!("No bytes entered.");
        return Ok(None);
    }

    Ok(Some(Program::new("hex entry", code)))
}

/// Loads and runs one program with the real keyboard attached.
///
/// Returns `true` when the host interrupted with Ctrl-C.
fn run_program(config: Config, program: Program) -> Result<bool, Box<dyn Error>> {
    let mut system = System::new(config);
    system.load_program(program)?;

    let outcome = {
        // Raw mode lives exactly as long as the run.
        let mut keyboard = StdinKeyboard::new()?;
        system.run(&mut keyboard)?
    };

    print_report(&outcome.report);
    Ok(outcome.host_interrupt)
}

fn print_report(report: &Report) {
    println!();
    println!("---- {} ----", report.program_name);
    if !report.output.is_empty() {
        println!("output: {}", report.output);
    }
    let r = &report.registers;
    println!(
        "A=0x{:02X} X=0x{:02X} Y=0x{:02X} Z={} C={}",
        r.a, r.x, r.y, r.z, r.c
    );
    match report.verdict {
        Some(true) => println!("verdict: PASS"),
        Some(false) => println!("verdict: FAIL"),
        None => {}
    }
}

/// Next line from stdin, `None` on end of input.
fn next_line<I>(lines: &mut I) -> Result<Option<String>, io::Error>
where
    I: Iterator<Item = Result<String, io::Error>>,
{
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}
