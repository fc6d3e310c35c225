use crate::beta::CurvePoint;
use anyhow::{bail, Context, Result};
use csv::{Writer, WriterBuilder};
use log::{debug, info};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Receives density curves as the posterior evolves.
pub trait DensityPlotter {
    fn plot(&mut self, label: &str, curve: &[CurvePoint], lower: f64, upper: f64) -> Result<()>;
}

/// Draws curves as character charts on a writer (usually stdout).
pub struct TerminalPlotter<W: Write> {
    out: W,
    width: usize,
    height: usize,
}

impl<W: Write> TerminalPlotter<W> {
    pub fn new(out: W) -> Self {
        Self::with_size(out, 64, 12)
    }

    pub fn with_size(out: W, width: usize, height: usize) -> Self {
        Self {
            out,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Column heights in rows, each column holding the max of its samples.
    fn column_heights(&self, curve: &[CurvePoint], lower: f64, upper: f64) -> Vec<usize> {
        let mut peaks = vec![0.0_f64; self.width];
        let span = upper - lower;
        for point in curve {
            if point.x < lower || point.x > upper {
                continue;
            }
            let col = if span > 0.0 {
                (((point.x - lower) / span) * (self.width - 1) as f64).round() as usize
            } else {
                0
            };
            let col = col.min(self.width - 1);
            peaks[col] = peaks[col].max(point.y);
        }
        let y_max = peaks.iter().cloned().fold(0.0, f64::max);
        if y_max <= 0.0 {
            return vec![0; self.width];
        }
        peaks
            .iter()
            .map(|&y| ((y / y_max) * self.height as f64).round() as usize)
            .collect()
    }
}

impl<W: Write> DensityPlotter for TerminalPlotter<W> {
    fn plot(&mut self, label: &str, curve: &[CurvePoint], lower: f64, upper: f64) -> Result<()> {
        let heights = self.column_heights(curve, lower, upper);
        writeln!(self.out, "{}", label)?;
        for row in (1..=self.height).rev() {
            let line: String = heights
                .iter()
                .map(|&h| if h >= row { '*' } else { ' ' })
                .collect();
            writeln!(self.out, "|{}", line.trim_end())?;
        }
        writeln!(self.out, "+{}", "-".repeat(self.width))?;
        let lower_label = format!("{:.2}", lower);
        let upper_label = format!("{:.2}", upper);
        let gap = (self.width + 1).saturating_sub(lower_label.len() + upper_label.len());
        writeln!(self.out, "{}{}{}\n", lower_label, " ".repeat(gap), upper_label)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes each curve to its own tab-separated file in a directory.
pub struct CurveWriter {
    dir: PathBuf,
    count: usize,
}

impl CurveWriter {
    pub fn new(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Could not create curve directory: {}", dir.display()))?;
            info!("Created curve directory {}", dir.display());
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            count: 0,
        })
    }

    pub fn written(&self) -> usize {
        self.count
    }

    fn next_path(&self, label: &str) -> PathBuf {
        let label: String = label
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{:04}_{}.tsv", self.count, label))
    }
}

impl DensityPlotter for CurveWriter {
    fn plot(&mut self, label: &str, curve: &[CurvePoint], _lower: f64, _upper: f64) -> Result<()> {
        let path = self.next_path(label);
        if path.exists() {
            bail!("Curve file already exists: {}", path.display());
        }
        let file = File::create(&path)
            .with_context(|| format!("Could not create curve file: {}", path.display()))?;
        let mut writer: Writer<File> = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_writer(file);
        for point in curve {
            writer.serialize(point)?;
        }
        writer.flush()?;
        debug!("Wrote {} curve points to {}", curve.len(), path.display());
        self.count += 1;
        Ok(())
    }
}
