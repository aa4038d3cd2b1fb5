pub mod wav;

/// Format of the decoded source, carried unchanged to every output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
}

impl WavInfo {
    /// Number of frames (samples per channel) in an interleaved buffer of `len` samples.
    pub fn frames(&self, len: usize) -> usize {
        len / usize::from(self.channels.max(1))
    }

    pub fn duration_secs(&self, len: usize) -> f64 {
        self.frames(len) as f64 / f64::from(self.sample_rate)
    }
}
