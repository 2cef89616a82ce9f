use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use vm_core::{Console, Memory, MemoryLayout};

/// Runs an assembled VM binary against the console peripheral.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the assembled program binary, loaded at offset 0
    binary: PathBuf,
    /// Directory containing console/printc.bin and console/printcstr.bin
    libdir: PathBuf,
    /// Any value here enables opcode tracing to standard output
    trace: Option<String>,
}

fn read_required(path: &PathBuf) -> Result<Vec<u8>, String> {
    fs::read(path).map_err(|err| format!("failed to read {}: {}", path.display(), err))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let layout = MemoryLayout::default();

    let program = match read_required(&cli.binary) {
        Ok(bytes) => bytes,
        Err(message) => return fail(&message),
    };
    let printc = match read_required(&cli.libdir.join("console").join("printc.bin")) {
        Ok(bytes) => bytes,
        Err(message) => return fail(&message),
    };
    let printcstr = match read_required(&cli.libdir.join("console").join("printcstr.bin")) {
        Ok(bytes) => bytes,
        Err(message) => return fail(&message),
    };

    let memory = Memory::new(layout.capacity);
    memory.load_bytes(&program, layout.offset_program);
    memory.load_bytes(&printc, layout.offset_console_printc);
    memory.load_bytes(&printcstr, layout.offset_console_printcstr);

    let console = Console::start(memory.clone(), layout.io_printc_data, layout.io_printc_enable);
    let result = vm_core::run(&memory, &layout, cli.trace.is_some());
    console.stop();

    match result.reason {
        vm_core::HaltReason::Halt => ExitCode::SUCCESS,
        vm_core::HaltReason::UnknownOpcode(opcode) => {
            fail(&format!("unknown opcode {} at pc={}", opcode, result.pc))
        }
    }
}

fn fail(message: &str) -> ExitCode {
    eprintln!("{} {}", "error:".red().bold(), message);
    ExitCode::FAILURE
}
