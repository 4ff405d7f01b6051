//! Crate-level error taxonomy.
//!
//! Distinguishes the three outcomes the CLI dispatch layer maps to distinct
//! exit codes: a parse failure, an I/O failure, and a capacity overrun.
//! Hand-written rather than built on a derive crate — three variants with
//! one message each don't earn the dependency.
use std::fmt;

#[derive(Debug)]
pub enum StegoError {
    /// The input could not be parsed as a well-formed PDF.
    Parse(String),
    /// The payload does not fit in the document's capacity.
    Capacity { available_bytes: u64 },
    /// A lower-level I/O failure, with the action being attempted.
    Io {
        action: &'static str,
        source: std::io::Error,
    },
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StegoError::Parse(msg) => write!(f, "failed to parse PDF: {msg}"),
            StegoError::Capacity { available_bytes } => write!(
                f,
                "The PDF file doesn't have sufficient capacity to hold all given data. \
                 The file can hold at most {available_bytes} hidden bytes"
            ),
            StegoError::Io { action, source } => write!(f, "failed to {action}: {source}"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StegoError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl StegoError {
    pub fn io(action: &'static str, source: std::io::Error) -> Self {
        StegoError::Io { action, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_matches_documented_wording() {
        let err = StegoError::Capacity {
            available_bytes: 1,
        };
        assert_eq!(
            err.to_string(),
            "The PDF file doesn't have sufficient capacity to hold all given data. \
             The file can hold at most 1 hidden bytes"
        );
    }
}
