//! Per-sample bit depth reduction.
//!
//! A 16-bit sample is lifted into unsigned space, scaled down to `2^bit_depth`
//! levels, rounded, then scaled back up and lowered again so the result can be
//! stored in an ordinary 16-bit WAV file next to the source.

use crate::error::{Error, Result};

/// One signed 16-bit PCM amplitude.
pub type Sample = i16;

/// Target bit depth. Signed so out-of-range values can still be quantised.
pub type BitDepth = i32;

pub const MIN_BIT_DEPTH: BitDepth = 1;
pub const MAX_BIT_DEPTH: BitDepth = 15;

/// Offset that lifts a signed sample into non-negative space.
///
/// Known asymmetry: the signed range is [-32768, 32767] but the offset is
/// 32767, so shifted values span [-1, 65534] rather than [0, 65535]. Existing
/// reference outputs were produced with this offset and must keep matching.
pub const SHIFT: i32 = 32767;

/// Number of distinct 16-bit values.
const FULL_SCALE: f64 = 65536.0;

/// Number of quantisation levels for a bit depth, as `2^bit_depth`.
///
/// Very negative depths underflow to `0.0`; depths of 1024 and up overflow to infinity.
pub fn levels(bit_depth: BitDepth) -> f64 {
    2f64.powi(bit_depth)
}

/// True when a bit depth has no levels to scale by, so every sample falls back to 0.
pub fn is_degenerate(bit_depth: BitDepth) -> bool {
    levels(bit_depth) == 0.0
}

/// Depths produced by a full run, highest first.
pub fn default_depths() -> Vec<BitDepth> {
    (MIN_BIT_DEPTH..=MAX_BIT_DEPTH).rev().collect()
}

/// Check that a depth lies in the range a 16-bit source can be reduced to.
pub fn validate(bit_depth: i64) -> Result<BitDepth> {
    if (i64::from(MIN_BIT_DEPTH)..=i64::from(MAX_BIT_DEPTH)).contains(&bit_depth) {
        Ok(bit_depth as BitDepth)
    } else {
        Err(Error::InvalidBitDepth(bit_depth))
    }
}

/// Reduce `sample` to `bit_depth` bits and reconstitute it as a 16-bit sample.
///
/// Rounding is half to even and the rescaled value is truncated toward zero.
/// The result saturates into the 16-bit range: near full scale at 1 bit the
/// reconstruction lands on 32769.
///
/// A depth with zero levels yields `0`. Any other non-finite intermediate is
/// an [`Error::Arithmetic`].
pub fn quantise(sample: Sample, bit_depth: BitDepth) -> Result<Sample> {
    let shifted = i32::from(sample) + SHIFT;
    let levels = levels(bit_depth);
    if levels == 0.0 {
        return Ok(0);
    }

    let factor = f64::from(shifted) / FULL_SCALE;
    let quantised = (levels * factor).round_ties_even();
    let reconstituted = quantised * (FULL_SCALE / levels);
    if !reconstituted.is_finite() {
        return Err(Error::Arithmetic { sample, bit_depth });
    }

    let value = reconstituted.trunc() as i64 - i64::from(SHIFT);
    Ok(value.clamp(i64::from(Sample::MIN), i64::from(Sample::MAX)) as Sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_examples() {
        // 12767 / 65536 * 64 = 12.47 -> 12, 12 * 1024 - 32767
        assert_eq!(quantise(-20000, 6).unwrap(), -20479);
        // 12767 / 65536 * 8 = 1.56 -> 2, 2 * 8192 - 32767
        assert_eq!(quantise(-20000, 3).unwrap(), -16383);
    }

    #[test]
    fn ties_round_to_even() {
        // 32769 / 2 = 16384.5 -> 16384
        assert_eq!(quantise(2, 15).unwrap(), 1);
        // 32771 / 2 = 16385.5 -> 16386
        assert_eq!(quantise(4, 15).unwrap(), 5);
        // -1 / 2 = -0.5 -> -0
        assert_eq!(quantise(-32768, 15).unwrap(), -32767);
    }

    #[test]
    fn zero_maps_to_one_at_every_depth() {
        for depth in default_depths() {
            assert_eq!(quantise(0, depth).unwrap(), 1, "depth {}", depth);
        }
    }

    #[test]
    fn full_scale_saturates() {
        assert_eq!(quantise(32767, 1).unwrap(), 32767);
        assert_eq!(quantise(32767, 15).unwrap(), 32767);
        assert_eq!(quantise(-32768, 1).unwrap(), -32767);
    }

    #[test]
    fn full_range_quantises_without_fault() {
        for depth in default_depths() {
            for sample in Sample::MIN..=Sample::MAX {
                assert!(quantise(sample, depth).is_ok(), "{} at {}", sample, depth);
            }
        }
    }

    #[test]
    fn deterministic() {
        for &sample in &[-32768, -20000, -1, 0, 1, 12345, 32767] {
            for depth in default_depths() {
                assert_eq!(quantise(sample, depth).unwrap(), quantise(sample, depth).unwrap());
            }
        }
    }

    #[test]
    fn fifteen_bits_never_worse_than_one_bit() {
        for sample in Sample::MIN..=Sample::MAX {
            let err = |depth| (i32::from(sample) - i32::from(quantise(sample, depth).unwrap())).abs();
            assert!(err(15) <= err(1), "sample {}", sample);
            assert!(err(15) <= 1, "sample {}", sample);
        }
    }

    #[test]
    fn zero_levels_fall_back_to_zero() {
        assert!(is_degenerate(-2000));
        for &sample in &[-32768, -20000, 0, 32767] {
            assert_eq!(quantise(sample, -2000).unwrap(), 0);
        }
    }

    #[test]
    fn infinite_levels_are_a_fault() {
        assert!(matches!(
            quantise(100, 2000),
            Err(Error::Arithmetic { sample: 100, bit_depth: 2000 })
        ));
    }

    #[test]
    fn validate_range() {
        assert_eq!(validate(1).unwrap(), 1);
        assert_eq!(validate(15).unwrap(), 15);
        assert!(matches!(validate(0), Err(Error::InvalidBitDepth(0))));
        assert!(matches!(validate(16), Err(Error::InvalidBitDepth(16))));
    }

    #[test]
    fn default_depths_descend() {
        let depths = default_depths();
        assert_eq!(depths.len(), 15);
        assert_eq!(depths.first(), Some(&15));
        assert_eq!(depths.last(), Some(&1));
    }
}
