//! Maps a parsed [`Command`] to driver calls and the exact exit codes and
//! messages the CLI surface promises: 0 on success, 2 when the payload
//! exceeds capacity, 1 on any other I/O or parse failure.

use std::io::{self, Read, Write};

use crate::cli::args::Command;
use crate::driver;
use crate::error::StegoError;
use crate::io::file_io::{open_input_file, open_output_file, open_payload_sink, open_payload_source};

/// Runs `command` and returns the process exit code.
pub fn run(command: Command) -> i32 {
    match command {
        Command::Write {
            input,
            output,
            payload,
        } => run_write(&input, &output, payload.as_deref()),
        Command::Read { input, output } => run_read(&input, output.as_deref()),
        Command::Capacity { input } => run_capacity(&input),
    }
}

fn read_all(path: &str) -> Result<Vec<u8>, StegoError> {
    let mut bytes = Vec::new();
    open_input_file(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(|e| StegoError::io("read input PDF", e))?;
    Ok(bytes)
}

fn run_write(input_path: &str, output_path: &str, payload_path: Option<&str>) -> i32 {
    let input = match read_all(input_path) {
        Ok(b) => b,
        Err(e) => return report_error(e),
    };

    let mut payload_source: Box<dyn Read> = match open_payload_source(payload_path) {
        Ok(r) => r,
        Err(e) => return report_error(StegoError::io("open payload", e)),
    };

    let mut out: Box<dyn Write> = match open_output_file(output_path) {
        Ok(w) => w,
        Err(e) => return report_error(StegoError::io("open output PDF", e)),
    };

    match driver::write_hidden(&input, &mut payload_source, &mut out) {
        Ok(()) => {
            crate::displaylevel!(2, "wrote hidden payload into {output_path}\n");
            0
        }
        Err(e) => report_error(e),
    }
}

fn run_read(input_path: &str, output_path: Option<&str>) -> i32 {
    let input = match read_all(input_path) {
        Ok(b) => b,
        Err(e) => return report_error(e),
    };

    let mut out: Box<dyn Write> = match open_payload_sink(output_path) {
        Ok(w) => w,
        Err(e) => return report_error(StegoError::io("open payload output", e)),
    };

    match driver::read_hidden(&input, &mut out) {
        Ok(()) => 0,
        Err(e) => report_error(e),
    }
}

fn run_capacity(input_path: &str) -> i32 {
    let input = match read_all(input_path) {
        Ok(b) => b,
        Err(e) => return report_error(e),
    };

    match driver::capacity_bytes(&input) {
        Ok(bytes) => {
            crate::displayout!("{bytes}\n");
            0
        }
        Err(e) => report_error(e),
    }
}

/// Prints `err` to stderr and returns its exit code: capacity overruns are
/// 2, everything else is 1.
fn report_error(err: StegoError) -> i32 {
    match &err {
        StegoError::Capacity { .. } => {
            eprintln!("{err}");
            2
        }
        _ => {
            eprintln!("pdfid: {err}");
            1
        }
    }
}
