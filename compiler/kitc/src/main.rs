//! The `kit` command.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;

use kit_vm::{stderr_handler, stdout_handler};

fn main() -> ExitCode {
    kitc::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    let mut machine = kitc::new_machine(stdout_handler(), stderr_handler());
    match args.get(1).map(String::as_str) {
        Some("-h" | "--help") => {
            print_usage();
            ExitCode::SUCCESS
        }
        Some(path) => match kitc::run_file(&mut machine, Path::new(path)) {
            Ok(_) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        },
        None => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            match kitc::run_lines(&mut machine, stdin.lock(), prompt) {
                Ok(_) => {
                    if prompt {
                        println!();
                    }
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("error reading input: {err}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn print_usage() {
    eprintln!("Usage: kit [FILE]");
    eprintln!();
    eprintln!("Interprets FILE, or reads standard input line by line.");
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=kit_vm=debug) for engine logs.");
}
