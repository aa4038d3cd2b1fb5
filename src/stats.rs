use crate::error::{Error, Result};
use crate::quantise::Sample;

/// How far a reduced buffer strays from its source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStats {
    pub max_abs: u32,
    pub mean_abs: f64,
    pub rms: f64,
    /// Signal to quantisation noise ratio in dB. Infinite for an exact copy.
    pub sqnr_db: f64,
}

impl ErrorStats {
    pub fn measure(original: &[Sample], reduced: &[Sample]) -> Result<Self> {
        if original.len() != reduced.len() {
            return Err(Error::MalformedInput(format!(
                "cannot compare {} samples with {}",
                original.len(),
                reduced.len()
            )));
        }
        if original.is_empty() {
            return Ok(Self {
                max_abs: 0,
                mean_abs: 0.0,
                rms: 0.0,
                sqnr_db: f64::INFINITY,
            });
        }

        let mut max_abs = 0u32;
        let mut abs_sum = 0.0f64;
        let mut noise_power = 0.0f64;
        let mut signal_power = 0.0f64;
        for (&a, &b) in original.iter().zip(reduced) {
            let diff = i32::from(a) - i32::from(b);
            max_abs = max_abs.max(diff.unsigned_abs());
            abs_sum += f64::from(diff.abs());
            noise_power += f64::from(diff) * f64::from(diff);
            signal_power += f64::from(a) * f64::from(a);
        }

        let n = original.len() as f64;
        let sqnr_db = if noise_power == 0.0 {
            f64::INFINITY
        } else {
            10.0 * (signal_power / noise_power).log10()
        };

        Ok(Self {
            max_abs,
            mean_abs: abs_sum / n,
            rms: (noise_power / n).sqrt(),
            sqnr_db,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantise::{default_depths, quantise};

    #[test]
    fn identical_buffers_are_lossless() {
        let samples = [-5, 0, 7, 32767];
        let stats = ErrorStats::measure(&samples, &samples).unwrap();
        assert_eq!(stats.max_abs, 0);
        assert_eq!(stats.rms, 0.0);
        assert!(stats.sqnr_db.is_infinite());
    }

    #[test]
    fn known_errors() {
        let stats = ErrorStats::measure(&[100, -100], &[97, -96]).unwrap();
        assert_eq!(stats.max_abs, 4);
        assert!((stats.mean_abs - 3.5).abs() < 1e-12);
        assert!((stats.rms - 12.5f64.sqrt()).abs() < 1e-12);
        // 10 * log10(10000 / 12.5)
        assert!((stats.sqnr_db - 29.0309).abs() < 1e-3);
    }

    #[test]
    fn length_mismatch_is_malformed() {
        assert!(matches!(
            ErrorStats::measure(&[1, 2, 3], &[1, 2]),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn fidelity_drops_with_depth() {
        let original: Vec<Sample> = (Sample::MIN..=Sample::MAX).step_by(7).collect();
        let mut previous: Option<ErrorStats> = None;
        for depth in default_depths() {
            let reduced: Vec<Sample> = original.iter().map(|&s| quantise(s, depth).unwrap()).collect();
            let stats = ErrorStats::measure(&original, &reduced).unwrap();
            if let Some(higher) = previous {
                assert!(stats.mean_abs >= higher.mean_abs, "depth {}", depth);
                assert!(stats.sqnr_db <= higher.sqnr_db, "depth {}", depth);
            }
            previous = Some(stats);
        }
    }
}
