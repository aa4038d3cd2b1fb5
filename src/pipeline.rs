use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::input::wav::read_pcm16;
use crate::output::{output_filename, write_pcm16};
use crate::progress::{LogProgress, NoProgress, ProgressSink};
use crate::quantise::{default_depths, BitDepth};
use crate::reducer::{reduce_each, DepthFailure, ReduceOptions};
use crate::stats::ErrorStats;

#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub output_dir: PathBuf,
    pub depths: Vec<BitDepth>,
    pub reduce: ReduceOptions,
    /// Log per-depth progress lines.
    pub progress: bool,
    /// Measure and log the quantisation error of every output.
    pub stats: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            depths: default_depths(),
            reduce: ReduceOptions::default(),
            progress: true,
            stats: false,
        }
    }
}

/// Outcome of one file run.
#[derive(Debug)]
pub struct RunSummary {
    pub written: Vec<PathBuf>,
    pub failures: Vec<DepthFailure>,
}

/// Decode `input_path` and write one reduced copy per requested depth.
///
/// Failing to decode the source or to create the output directory aborts the run. A failure at one depth is
/// logged and reported in the summary; the remaining depths still run.
pub fn process_file(input_path: &Path, options: &ProcessOptions) -> Result<RunSummary> {
    let (samples, info) = read_pcm16(input_path)?;
    info!("Opened audio file {}", input_path.display());
    info!("sample rate = {}", info.sample_rate);
    info!(
        "number of samples = {} ({} channel(s), {:.2}s)",
        info.frames(samples.len()),
        info.channels,
        info.duration_secs(samples.len())
    );
    if samples.is_empty() {
        warn!("{} contains no samples", input_path.display());
    }

    // Create output directory if it doesn't exist
    std::fs::create_dir_all(&options.output_dir)?;

    let mut progress: Box<dyn ProgressSink> = if options.progress {
        Box::new(LogProgress)
    } else {
        Box::new(NoProgress)
    };

    let mut written = Vec::with_capacity(options.depths.len());
    let report = reduce_each(
        &samples,
        info.sample_rate,
        &options.depths,
        &options.reduce,
        progress.as_mut(),
        None,
        |bit_depth, reduced, _| {
            let path = options.output_dir.join(output_filename(bit_depth));
            info!("Writing {}", path.display());
            write_pcm16(&path, &reduced, info)?;

            if options.stats {
                let stats = ErrorStats::measure(&samples, &reduced)?;
                info!(
                    "{}-bit: max error {}, mean {:.2}, rms {:.2}, SQNR {:.1} dB",
                    bit_depth, stats.max_abs, stats.mean_abs, stats.rms, stats.sqnr_db
                );
            }

            written.push(path);
            Ok(())
        },
    );

    Ok(RunSummary {
        written,
        failures: report.failures,
    })
}
