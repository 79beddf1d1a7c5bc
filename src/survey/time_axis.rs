//! Time-axis reconstruction for channel-response captures

/// Samples captured ahead of the detected arrival (fixed firmware property)
pub const PRE_TRIGGER_SAMPLES: i64 = 100;

/// Sample rate of the modem's channel-response capture, in Hz (fixed firmware property)
pub const CAPTURE_SAMPLE_RATE_HZ: f64 = 16_000.0;

/// Map a sample count to the elapsed time of each sample, in seconds
///
/// Sample index 0 sits one pre-trigger window before the detected arrival,
/// so the axis starts negative and crosses zero at index 100.
pub fn time_axis(sample_count: usize) -> Vec<f64> {
    (0..sample_count)
        .map(|i| (i as f64 - PRE_TRIGGER_SAMPLES as f64) / CAPTURE_SAMPLE_RATE_HZ)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_length_matches_sample_count() {
        assert_eq!(time_axis(0).len(), 0);
        assert_eq!(time_axis(1).len(), 1);
        assert_eq!(time_axis(4096).len(), 4096);
    }

    #[test]
    fn test_axis_values() {
        let axis = time_axis(256);
        for (i, t) in axis.iter().enumerate() {
            let expected = (i as f64 - 100.0) / 16_000.0;
            assert_eq!(*t, expected);
        }
        // first sample is one pre-trigger window before the arrival
        assert_eq!(axis[0], -0.00625);
        // the arrival itself lands exactly on zero
        assert_eq!(axis[100], 0.0);
    }

    #[test]
    fn test_axis_is_deterministic() {
        assert_eq!(time_axis(512), time_axis(512));
    }
}
