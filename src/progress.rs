use log::info;

use crate::quantise::BitDepth;

/// Receives coarse completion updates while a bit depth pass runs.
pub trait ProgressSink {
    fn report(&mut self, bit_depth: BitDepth, percent: u32);
}

/// Logs each update at info level.
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, bit_depth: BitDepth, percent: u32) {
        info!(" {}-bit >> {}% completed", bit_depth, percent);
    }
}

/// Discards every update.
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _bit_depth: BitDepth, _percent: u32) {}
}

impl<F: FnMut(BitDepth, u32)> ProgressSink for F {
    fn report(&mut self, bit_depth: BitDepth, percent: u32) {
        self(bit_depth, percent)
    }
}

/// Tracks completion of one pass and forwards each step boundary once.
///
/// Percentages are `index * 100 / total` rounded down, so the last update of a
/// pass is the final multiple of `step` below 100.
#[derive(Debug)]
pub struct ProgressTracker {
    bit_depth: BitDepth,
    total: usize,
    step: u32,
    last: Option<u32>,
}

impl ProgressTracker {
    pub fn new(bit_depth: BitDepth, total: usize, step: u32) -> Self {
        Self {
            bit_depth,
            total,
            step: step.max(1),
            last: None,
        }
    }

    /// Record that the sample at `index` has been processed.
    pub fn update(&mut self, index: usize, sink: &mut dyn ProgressSink) {
        if self.total == 0 {
            return;
        }
        let percent = (index as u64 * 100 / self.total as u64) as u32;
        if percent % self.step == 0 && self.last != Some(percent) {
            sink.report(self.bit_depth, percent);
            self.last = Some(percent);
        }
    }
}
