//! Applies the quantiser across a whole buffer, once per target bit depth.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, error, info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::error::{Error, Result};
use crate::progress::{NoProgress, ProgressSink, ProgressTracker};
use crate::quantise::{is_degenerate, quantise, BitDepth, Sample};

/// Buffers shorter than this per thread are not worth splitting.
const MIN_CHUNK: usize = 4096;

#[derive(Debug, Clone)]
pub struct ReduceOptions {
    /// Size of the rayon pool used within one pass. 1 keeps everything on the caller's thread.
    pub threads: usize,
    /// Progress granularity in percent.
    pub progress_step: u32,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            threads: 1,
            progress_step: 10,
        }
    }
}

/// A bit depth whose pass was abandoned.
#[derive(Debug)]
pub struct DepthFailure {
    pub bit_depth: BitDepth,
    pub error: Error,
}

/// What happened to each requested depth.
#[derive(Debug, Default)]
pub struct ReduceReport {
    pub completed: Vec<BitDepth>,
    pub failures: Vec<DepthFailure>,
}

impl ReduceReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Every reduced buffer of a run, in processing order.
#[derive(Debug)]
pub struct OutputSet {
    pub sample_rate: u32,
    pub buffers: Vec<(BitDepth, Vec<Sample>)>,
    pub failures: Vec<DepthFailure>,
}

impl OutputSet {
    pub fn get(&self, bit_depth: BitDepth) -> Option<&[Sample]> {
        self.buffers
            .iter()
            .find(|(depth, _)| *depth == bit_depth)
            .map(|(_, buffer)| buffer.as_slice())
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

/// Quantise every sample of `input` at one bit depth into a fresh buffer.
pub fn reduce_depth(
    input: &[Sample],
    bit_depth: BitDepth,
    options: &ReduceOptions,
    progress: &mut dyn ProgressSink,
) -> Result<Vec<Sample>> {
    if is_degenerate(bit_depth) {
        warn!(
            "{}-bit pass divides by zero levels; every sample falls back to 0",
            bit_depth
        );
    }

    let mut output = vec![0; input.len()];
    let mut tracker = ProgressTracker::new(bit_depth, input.len(), options.progress_step);
    let threads = options.threads.max(1);

    if threads == 1 || input.len() < threads * MIN_CHUNK {
        for (index, (out, &sample)) in output.iter_mut().zip(input).enumerate() {
            *out = quantise(sample, bit_depth)?;
            tracker.update(index, progress);
        }
        return Ok(output);
    }

    // Work through the buffer one progress step at a time; inside a step the
    // pool's chunks write disjoint ranges of the output.
    let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
    let step = options.progress_step.max(1);
    let mut start = 0;
    let mut percent = 0;
    while start < input.len() {
        percent += step;
        let end = index_at_percent(input.len(), percent);
        tracker.update(start, progress);

        let chunk_len = (end - start).div_ceil(threads);
        pool.install(|| {
            output[start..end]
                .par_chunks_mut(chunk_len)
                .zip(input[start..end].par_chunks(chunk_len))
                .try_for_each(|(dst, src)| quantise_into(src, dst, bit_depth))
        })?;
        start = end;
    }
    debug!("{}-bit pass split across {} threads", bit_depth, threads);

    Ok(output)
}

/// First index whose completion percentage reaches `percent`, capped at `len`.
fn index_at_percent(len: usize, percent: u32) -> usize {
    ((len as u64 * u64::from(percent)).div_ceil(100) as usize).min(len)
}

/// A reduced buffer must line up sample for sample with its source.
fn check_length(expected: usize, buffer: &[Sample], bit_depth: BitDepth) -> Result<()> {
    if buffer.len() != expected {
        return Err(Error::MalformedInput(format!(
            "{}-bit buffer holds {} samples, source has {}",
            bit_depth,
            buffer.len(),
            expected
        )));
    }
    Ok(())
}

fn quantise_into(src: &[Sample], dst: &mut [Sample], bit_depth: BitDepth) -> Result<()> {
    for (out, &sample) in dst.iter_mut().zip(src) {
        *out = quantise(sample, bit_depth)?;
    }
    Ok(())
}

/// Reduce `input` at each depth in turn, handing every finished buffer to `sink`.
///
/// Only one reduced buffer is alive at a time. A depth that fails, either while
/// quantising or inside the sink, is recorded and the next depth still runs.
/// `cancel` is checked between depths; once set, the remaining depths are
/// reported as [`Error::Cancelled`].
pub fn reduce_each<F>(
    input: &[Sample],
    sample_rate: u32,
    depths: &[BitDepth],
    options: &ReduceOptions,
    progress: &mut dyn ProgressSink,
    cancel: Option<&AtomicBool>,
    mut sink: F,
) -> ReduceReport
where
    F: FnMut(BitDepth, Vec<Sample>, u32) -> Result<()>,
{
    let mut report = ReduceReport::default();

    for (position, &bit_depth) in depths.iter().enumerate() {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            debug!("Cancelled with {} depth(s) left", depths.len() - position);
            report.failures.extend(depths[position..].iter().map(|&skipped| DepthFailure {
                bit_depth: skipped,
                error: Error::Cancelled(skipped),
            }));
            break;
        }

        info!("Creating {}-bit equivalent", bit_depth);
        let outcome = reduce_depth(input, bit_depth, options, progress)
            .and_then(|buffer| {
                check_length(input.len(), &buffer, bit_depth)?;
                sink(bit_depth, buffer, sample_rate)
            });

        match outcome {
            Ok(()) => report.completed.push(bit_depth),
            Err(err) => {
                error!("{}-bit pass abandoned: {}", bit_depth, err);
                report.failures.push(DepthFailure {
                    bit_depth,
                    error: err,
                });
            }
        }
    }

    report
}

/// Reduce `input` at every depth and keep all the buffers in memory.
pub fn reduce_all(
    input: &[Sample],
    sample_rate: u32,
    depths: &[BitDepth],
    options: &ReduceOptions,
) -> OutputSet {
    let mut buffers = Vec::with_capacity(depths.len());
    let report = reduce_each(
        input,
        sample_rate,
        depths,
        options,
        &mut NoProgress,
        None,
        |bit_depth, buffer, _| {
            buffers.push((bit_depth, buffer));
            Ok(())
        },
    );

    OutputSet {
        sample_rate,
        buffers,
        failures: report.failures,
    }
}
