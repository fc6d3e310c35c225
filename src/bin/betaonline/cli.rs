// src/cli.rs
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Sequential Beta-Binomial updating over a file of binary observations.
#[derive(Parser, Debug)]
#[command(name = "betaonline", version, about = "Online Bayesian learning of a Bernoulli probability")]
pub struct Cli {
    #[arg(
        long,
        short = 'f',
        default_value = "data/binary.txt",
        value_name = "FILE",
        help = "Data file with one line of 0/1 observations per record"
    )]
    pub file: PathBuf,

    #[arg(
        short = 'a',
        default_value = "2",
        allow_hyphen_values = true,
        help = "Prior success pseudo-count of the beta distribution"
    )]
    pub a: i64,

    #[arg(
        short = 'b',
        default_value = "2",
        allow_hyphen_values = true,
        help = "Prior failure pseudo-count of the beta distribution"
    )]
    pub b: i64,

    #[arg(long, short = 'p', help = "Plot the density after every update")]
    pub plot: bool,

    #[arg(
        long,
        value_name = "DIR",
        help = "Write every density curve as a tab-separated file into DIR"
    )]
    pub curve_out: Option<PathBuf>,

    #[arg(
        long,
        default_value = "1001",
        help = "Number of grid points of the density curve"
    )]
    pub samples: usize,

    #[arg(long, help = "Skip malformed records instead of aborting")]
    pub lenient: bool,

    #[arg(
        value_enum,
        long,
        default_value = "normal",
        value_name = "VERBOSITY",
        help = "Verbosity level"
    )]
    pub verbosity: LogLevel,
}

#[allow(non_camel_case_types)]
#[derive(ValueEnum, Clone, Debug)]
pub enum LogLevel {
    verbose,
    normal,
    silent,
}
