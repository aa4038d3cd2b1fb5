//! Bit depth reduction of 16-bit PCM audio.
//!
//! [`quantise`](quantise::quantise) maps one sample to its reconstituted value at a
//! lower bit depth; [`reducer`] applies it across a buffer for a series of depths
//! and streams each result to a sink. WAV decoding and encoding live in
//! [`input`] and [`output`], and [`pipeline`] ties them together for a file.

pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod quantise;
pub mod reducer;
pub mod stats;

pub use error::{Error, Result};
pub use quantise::{quantise, BitDepth, Sample};
pub use reducer::{reduce_all, reduce_each, OutputSet, ReduceOptions};
