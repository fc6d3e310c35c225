use crate::beta::BetaDistribution;
use crate::error::BetaError;
use crate::record::{strip_terminator, ObservationRecord};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::Utf8Error;

/// What to do with a line that is not made of '0'/'1' characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RecordPolicy {
    /// Abort the stream on the first malformed record.
    #[default]
    Strict,
    /// Log and skip malformed records.
    Lenient,
}

/// A record together with the posterior obtained after folding it in.
#[derive(Clone, Debug, PartialEq)]
pub struct PosteriorStep {
    pub line_number: usize,
    pub record: ObservationRecord,
    pub posterior: BetaDistribution,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StreamSummary {
    pub posterior: BetaDistribution,
    pub records_seen: usize,
    pub records_skipped: usize,
}

pub fn open_data_file(path: &Path) -> Result<BufReader<File>, BetaError> {
    let file = File::open(path).map_err(|source| BetaError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Opened data file {}", path.display());
    Ok(BufReader::new(file))
}

/// Lazily folds observation records into a Beta posterior, one line at a time.
///
/// Each call to `next` reads one more line and yields the updated posterior.
/// After an error the stream is exhausted.
pub struct PosteriorStream<R: BufRead> {
    reader: R,
    posterior: BetaDistribution,
    policy: RecordPolicy,
    line_number: usize,
    records_seen: usize,
    records_skipped: usize,
    buffer: Vec<u8>,
    done: bool,
}

impl<R: BufRead> PosteriorStream<R> {
    pub fn new(reader: R, prior: BetaDistribution, policy: RecordPolicy) -> Self {
        Self {
            reader,
            posterior: prior,
            policy,
            line_number: 0,
            records_seen: 0,
            records_skipped: 0,
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Posterior after the last yielded step (the prior before any).
    pub fn current(&self) -> BetaDistribution {
        self.posterior
    }

    fn next_step(&mut self) -> Result<Option<PosteriorStep>, BetaError> {
        loop {
            self.buffer.clear();
            if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let parsed = match std::str::from_utf8(&self.buffer) {
                Ok(line) => {
                    if strip_terminator(line).is_empty() {
                        warn!("Skipping blank line {}", self.line_number);
                        self.records_skipped += 1;
                        continue;
                    }
                    ObservationRecord::parse(line, self.line_number)
                }
                Err(e) => Err(invalid_utf8(&self.buffer, e, self.line_number)),
            };

            let record = match parsed {
                Ok(record) => record,
                Err(e) if self.policy == RecordPolicy::Lenient => {
                    warn!("{}. Skipping record", e);
                    self.records_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            self.posterior = self
                .posterior
                .update(record.successes(), record.failures());
            self.records_seen += 1;
            debug!(
                "Line {}: {}/{} successes ({:.3}) -> {}",
                self.line_number,
                record.successes(),
                record.trials(),
                record.likelihood_ratio(),
                self.posterior
            );
            return Ok(Some(PosteriorStep {
                line_number: self.line_number,
                record,
                posterior: self.posterior,
            }));
        }
    }

    pub fn summary(&self) -> StreamSummary {
        StreamSummary {
            posterior: self.posterior,
            records_seen: self.records_seen,
            records_skipped: self.records_skipped,
        }
    }
}

impl<R: BufRead> Iterator for PosteriorStream<R> {
    type Item = Result<PosteriorStep, BetaError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_step() {
            Ok(Some(step)) => Some(Ok(step)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

// Bytes that are not UTF-8 cannot be '0' or '1' either
fn invalid_utf8(bytes: &[u8], e: Utf8Error, line: usize) -> BetaError {
    let column = std::str::from_utf8(&bytes[..e.valid_up_to()])
        .map(|prefix| prefix.chars().count())
        .unwrap_or(0)
        + 1;
    BetaError::MalformedRecord {
        line,
        column,
        found: char::REPLACEMENT_CHARACTER,
    }
}

/// Consume the whole source and return the final posterior.
pub fn fold_stream<R: BufRead>(
    reader: R,
    prior: BetaDistribution,
    policy: RecordPolicy,
) -> Result<StreamSummary, BetaError> {
    let mut stream = PosteriorStream::new(reader, prior, policy);
    for step in stream.by_ref() {
        step?;
    }
    Ok(stream.summary())
}
