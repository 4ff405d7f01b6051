//! File I/O primitives for the steganography driver.
//!
//! The input and output PDF paths are always real files; the optional
//! payload argument falls back to stdin (`write`) or stdout (`read`) when
//! omitted.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};

use crate::cli::constants::DISPLAY_LEVEL;
use std::sync::atomic::Ordering;

/// Label used in diagnostics when the payload stream is stdin.
pub const STDIN_LABEL: &str = "stdin";
/// Label used in diagnostics when the payload stream is stdout.
pub const STDOUT_LABEL: &str = "stdout";

/// Opens a mandatory input PDF path for reading.
pub fn open_input_file(path: &str) -> io::Result<Box<dyn Read>> {
    let f = File::open(path).map_err(|e| {
        if DISPLAY_LEVEL.load(Ordering::Relaxed) >= 1 {
            eprintln!("pdfid: {path}: {e}");
        }
        e
    })?;
    Ok(Box::new(BufReader::new(f)))
}

/// Opens a mandatory output PDF path for writing, truncating it if it
/// already exists.
pub fn open_output_file(path: &str) -> io::Result<Box<dyn Write>> {
    let f = File::create(path).map_err(|e| {
        if DISPLAY_LEVEL.load(Ordering::Relaxed) >= 1 {
            eprintln!("pdfid: {path}: {e}");
        }
        e
    })?;
    Ok(Box::new(f))
}

/// Opens the payload source for `write`: the named file if given, stdin
/// otherwise.
pub fn open_payload_source(path: Option<&str>) -> io::Result<Box<dyn Read>> {
    match path {
        Some(path) => open_input_file(path),
        None => {
            if DISPLAY_LEVEL.load(Ordering::Relaxed) >= 2 {
                eprintln!("pdfid: reading payload from {STDIN_LABEL}");
            }
            Ok(Box::new(io::stdin()))
        }
    }
}

/// Opens the payload sink for `read`: the named file if given, stdout
/// otherwise.
pub fn open_payload_sink(path: Option<&str>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => open_output_file(path),
        None => {
            if DISPLAY_LEVEL.load(Ordering::Relaxed) >= 2 {
                eprintln!("pdfid: writing payload to {STDOUT_LABEL}");
            }
            Ok(Box::new(io::stdout()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_input_file_nonexistent_returns_err() {
        let result = open_input_file("/nonexistent/path/that/cannot/exist.pdf");
        assert!(result.is_err());
    }

    #[test]
    fn open_payload_source_falls_back_to_stdin_when_omitted() {
        // Can't easily assert identity with real stdin in a unit test; just
        // confirm the None branch doesn't error opening the file-path branch.
        let result = open_payload_source(None);
        assert!(result.is_ok());
    }

    #[test]
    fn open_output_file_creates_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        std::fs::write(&path, b"stale contents").unwrap();
        {
            let mut f = open_output_file(path.to_str().unwrap()).unwrap();
            f.write_all(b"fresh").unwrap();
        }
        let contents = std::fs::read(&path).unwrap();
        assert_eq!(contents, b"fresh");
    }
}
