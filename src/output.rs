use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

use crate::error::{Error, Result};
use crate::input::WavInfo;
use crate::quantise::{BitDepth, Sample};

/// Write interleaved samples as 16-bit integer PCM with the source's layout.
pub fn write_pcm16<P: AsRef<Path>>(path: P, samples: &[Sample], info: WavInfo) -> Result<()> {
    if info.channels == 0 || samples.len() % usize::from(info.channels) != 0 {
        return Err(Error::MalformedInput(format!(
            "{} samples do not divide into {} channel(s)",
            samples.len(),
            info.channels
        )));
    }

    let spec = WavSpec {
        channels: info.channels,
        sample_rate: info.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }

    writer.finalize()?;
    Ok(())
}

/// Output filename for a reduced copy.
pub fn output_filename(bit_depth: BitDepth) -> String {
    format!("{}_bit_equiv.wav", bit_depth)
}
