use std::{io, path::PathBuf};
use thiserror::Error;

/// Failure kinds of the online Beta-Binomial updater.
#[derive(Error, Debug)]
pub enum BetaError {
    /// The data file does not exist or could not be opened.
    #[error("Could not open data file {}: {source}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record contains a character other than '0' or '1'.
    #[error("Malformed record on line {line}: unexpected {found:?} at column {column}, expected '0' or '1'")]
    MalformedRecord {
        line: usize,
        column: usize,
        found: char,
    },

    /// A shape parameter is non-positive or not finite.
    #[error("Invalid beta parameter {name}: {value} (must be positive and finite)")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Error reading data: {0}")]
    Io(#[from] io::Error),
}
