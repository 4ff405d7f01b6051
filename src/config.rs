//! Compile-time constants.
//!
//! There is no config file and no environment variable surface; CLI flags
//! are the only runtime configuration.

/// Dictionaries larger than this contribute zero capacity rather than
/// paying for an enormous factorial; see [`crate::bigint::MAX_DICT_LEN`].
pub use crate::bigint::MAX_DICT_LEN;

/// PDF version string emitted in the output header by the writer.
pub const PDF_VERSION: &str = "1.6";
