use clap::Parser;
use std::path::PathBuf;

use bit_reducer::pipeline::{process_file, ProcessOptions};
use bit_reducer::quantise::{validate, MAX_BIT_DEPTH, MIN_BIT_DEPTH};
use bit_reducer::reducer::ReduceOptions;

/// Write 15-bit down to 1-bit equivalents of a 16-bit PCM WAV file
#[derive(Parser, Debug)]
#[command(name = "bit-reducer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input WAV file to process (16-bit signed PCM)
    #[arg(value_name = "INPUT", default_value = "test_track_mono_signed_16bit.wav")]
    input_file: PathBuf,

    /// Output directory for the reduced files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Highest bit depth to produce
    #[arg(long, default_value_t = MAX_BIT_DEPTH as i64, value_parser = clap::value_parser!(i64).range(1..=15))]
    from: i64,

    /// Lowest bit depth to produce
    #[arg(long, default_value_t = MIN_BIT_DEPTH as i64, value_parser = clap::value_parser!(i64).range(1..=15))]
    to: i64,

    /// Worker threads per bit depth pass
    #[arg(short = 'j', long, default_value = "1")]
    threads: usize,

    /// Log quantisation error statistics for every output
    #[arg(long)]
    stats: bool,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let from = validate(args.from)?;
    let to = validate(args.to)?;
    if from < to {
        eprintln!("Error: --from ({}) must not be below --to ({})", from, to);
        std::process::exit(1);
    }

    let options = ProcessOptions {
        output_dir: args.output_dir,
        depths: (to..=from).rev().collect(),
        reduce: ReduceOptions {
            threads: args.threads.max(1),
            ..ReduceOptions::default()
        },
        progress: !args.quiet,
        stats: args.stats,
    };

    log::info!("Processing started");
    let summary = process_file(&args.input_file, &options)?;
    log::info!("Processing completed");

    println!(
        "Saved {} file(s) to {}",
        summary.written.len(),
        options.output_dir.display()
    );
    if !summary.failures.is_empty() {
        for failure in &summary.failures {
            eprintln!("  {}-bit failed: {}", failure.bit_depth, failure.error);
        }
        std::process::exit(1);
    }

    Ok(())
}
