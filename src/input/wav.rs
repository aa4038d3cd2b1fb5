use hound::{SampleFormat, WavReader};
use log::warn;
use std::io::Read;
use std::path::Path;

use super::WavInfo;
use crate::error::{Error, Result};
use crate::quantise::Sample;

/// Read a 16-bit integer PCM WAV file.
///
/// Channels stay interleaved; every sample is quantised on its own, so each
/// channel is still processed independently.
pub fn read_pcm16<P: AsRef<Path>>(path: P) -> Result<(Vec<Sample>, WavInfo)> {
    let reader = WavReader::open(path)?;
    read_pcm16_from(reader)
}

pub fn read_pcm16_from<R: Read>(mut reader: WavReader<R>) -> Result<(Vec<Sample>, WavInfo)> {
    let spec = reader.spec();

    // Validate format
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(Error::UnsupportedFormat(format!(
            "expected 16-bit integer PCM, got {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }
    if spec.channels == 0 {
        return Err(Error::MalformedInput("WAV header declares 0 channels".into()));
    }

    let info = WavInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    };

    // A data chunk cut short (an interrupted recording or copy) still opens;
    // keep every whole frame that arrived and carry on.
    let expected = reader.len() as usize;
    let mut samples = Vec::with_capacity(expected);
    for sample in reader.samples::<i16>() {
        match sample {
            Ok(sample) => samples.push(sample),
            Err(hound::Error::IoError(err)) => {
                let channels = usize::from(spec.channels);
                samples.truncate(samples.len() - samples.len() % channels);
                warn!(
                    "Reached end of data early ({}); keeping {} of {} samples",
                    err,
                    samples.len(),
                    expected
                );
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok((samples, info))
}
