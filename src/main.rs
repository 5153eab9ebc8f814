mod classify;
mod cli;
mod error;
mod markers;
mod translate;

use std::io::IsTerminal;
use std::path::PathBuf;

use crate::error::Result;
use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;

/// Translate phased genotypes into the HIrisPlex-S upload format and
/// classify its prediction output into phenotype labels.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a phased-genotype query stream to the HIrisPlex-S upload CSV.
    Translate {
        /// Tab-separated translate table: marker id, chromosome, position,
        /// strand (F/R), test allele; rows in model input column order.
        translate_table: PathBuf,

        /// Tab-separated variant stream, or "-" for standard input.
        variants: String,
    },

    /// Annotate the HIrisPlex-S Result.csv with eye, hair and skin color labels.
    Classify {
        /// Result CSV downloaded from the HIrisPlex-S webtool.
        results: PathBuf,

        /// Print only sample ids and the three labels instead of the full rows.
        #[arg(short, long)]
        short: bool,
    },
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Translate {
            translate_table,
            variants,
        } => cli::run_translate(&translate_table, &variants),
        Command::Classify { results, short } => cli::run_classify(&results, short),
    }
}

fn main() -> miette::Result<()> {
    // Diagnostics go to stderr; stdout carries only the output CSV.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    try_main().into_diagnostic()
}
