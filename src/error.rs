use thiserror::Error;

use crate::quantise::{BitDepth, Sample};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("arithmetic fault quantising sample {sample} at {bit_depth} bits")]
    Arithmetic { sample: Sample, bit_depth: BitDepth },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid bit depth {0} (expected 1..=15)")]
    InvalidBitDepth(i64),

    #[error("cancelled before {0}-bit pass")]
    Cancelled(BitDepth),

    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
