use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

/// Assembles a source file into a raw VM binary.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path the assembled binary is written to
    output: PathBuf,
    /// Path to the assembly source file
    input: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{} failed to read {}: {}", "error:".red().bold(), cli.input.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let binary = match vm_core::assemble(&source) {
        Ok(binary) => binary,
        Err(err) => {
            eprint!("{}", err.render(&source));
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = fs::write(&cli.output, &binary) {
        eprintln!("{} failed to write {}: {}", "error:".red().bold(), cli.output.display(), err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
