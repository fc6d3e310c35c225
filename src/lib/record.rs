use crate::error::BetaError;
use std::fmt;

/// A single line of binary observations, e.g. `1011`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservationRecord {
    raw: String,
    successes: u64,
}

impl ObservationRecord {
    /// Parse one line of input. The trailing line terminator, if any, is
    /// stripped; every remaining character must be '0' or '1'.
    /// `line_number` is only used for error reporting.
    pub fn parse(line: &str, line_number: usize) -> Result<Self, BetaError> {
        let raw = strip_terminator(line);
        let mut successes = 0;
        for (idx, c) in raw.chars().enumerate() {
            match c {
                '1' => successes += 1,
                '0' => {}
                found => {
                    return Err(BetaError::MalformedRecord {
                        line: line_number,
                        column: idx + 1,
                        found,
                    });
                }
            }
        }
        Ok(Self {
            raw: raw.to_string(),
            successes,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// N, the number of observations on the line.
    pub fn trials(&self) -> u64 {
        self.raw.len() as u64
    }

    /// m, the number of '1' observations.
    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn failures(&self) -> u64 {
        self.trials() - self.successes
    }

    /// Observed fraction m/N. NaN for an empty record.
    pub fn likelihood_ratio(&self) -> f64 {
        self.successes as f64 / self.trials() as f64
    }
}

impl fmt::Display for ObservationRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

pub fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
