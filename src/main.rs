//! `pdfid` entry point.

use std::process::ExitCode;

use pdfid::cli::{args, dispatch};

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let command = match args::parse(&argv) {
        Ok(command) => command,
        Err(err) => {
            eprint!("{err}");
            return ExitCode::from(1);
        }
    };
    ExitCode::from(dispatch::run(command) as u8)
}
