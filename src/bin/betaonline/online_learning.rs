use crate::cli::Cli;
use anyhow::{Context, Result};
use betaonline_utils::beta::{BetaDistribution, CURVE_LOWER, CURVE_UPPER};
use betaonline_utils::plot::{CurveWriter, DensityPlotter, TerminalPlotter};
use betaonline_utils::report::record_block;
use betaonline_utils::stream::{open_data_file, PosteriorStream, RecordPolicy, StreamSummary};
use log::{debug, info};
use std::io::{self, BufRead, Write};

pub fn online_learning(args: &Cli) -> Result<StreamSummary> {
    let prior = BetaDistribution::new(args.a as f64, args.b as f64)
        .context("Invalid prior hyperparameters")?;
    info!("Prior: {}", prior);
    let policy = if args.lenient {
        RecordPolicy::Lenient
    } else {
        RecordPolicy::Strict
    };

    let reader = open_data_file(&args.file)?;
    info!("Reading observations from {}", args.file.display());

    let mut plotters: Vec<Box<dyn DensityPlotter>> = Vec::new();
    if args.plot {
        plotters.push(Box::new(TerminalPlotter::new(io::stdout())));
    }
    if let Some(dir) = &args.curve_out {
        plotters.push(Box::new(CurveWriter::new(dir)?));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = update_from_reader(reader, prior, policy, &mut out, &mut plotters, args.samples)
        .with_context(|| format!("Error processing data file: {}", args.file.display()))?;
    Ok(summary)
}

/// Prints the prior, then folds every record of `reader` into it, printing a
/// report block and feeding every plotter after each update.
pub fn update_from_reader<R: BufRead, W: Write>(
    reader: R,
    prior: BetaDistribution,
    policy: RecordPolicy,
    out: &mut W,
    plotters: &mut [Box<dyn DensityPlotter>],
    samples: usize,
) -> Result<StreamSummary> {
    writeln!(out, "{}", prior.status_report())?;
    plot_all(plotters, "prior", &prior, samples)?;

    let mut stream = PosteriorStream::new(reader, prior, policy);
    for step in stream.by_ref() {
        let step = step?;
        write!(out, "{}", record_block(&step))?;
        out.flush()?;
        plot_all(plotters, &format!("line {}", step.line_number), &step.posterior, samples)?;
    }

    let summary = stream.summary();
    debug!(
        "Folded {} records, skipped {}",
        summary.records_seen, summary.records_skipped
    );
    Ok(summary)
}

fn plot_all(
    plotters: &mut [Box<dyn DensityPlotter>],
    label: &str,
    model: &BetaDistribution,
    samples: usize,
) -> Result<()> {
    if plotters.is_empty() {
        return Ok(());
    }
    let curve = model.density_curve(CURVE_LOWER, CURVE_UPPER, samples);
    for plotter in plotters.iter_mut() {
        plotter.plot(label, &curve, CURVE_LOWER, CURVE_UPPER)?;
    }
    Ok(())
}
