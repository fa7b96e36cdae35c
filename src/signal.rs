//! Mono audio signal type shared by the collaborators

/// Mono audio samples with their sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    /// Mono samples, nominally in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioSignal {
    /// Create a signal from mono samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the signal has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (0.0 for a zero sample rate)
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Convert a duration in seconds to a whole number of samples (truncating)
    pub fn time_to_samples(&self, seconds: f32) -> usize {
        (self.sample_rate as f32 * seconds) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_samples_truncates() {
        let signal = AudioSignal::new(vec![0.0; 22100], 22100);
        assert_eq!(signal.time_to_samples(0.032), 707);
        assert_eq!(signal.time_to_samples(0.016), 353);
        assert!((signal.duration_seconds() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_rate_duration() {
        let signal = AudioSignal::new(vec![0.0; 10], 0);
        assert_eq!(signal.duration_seconds(), 0.0);
    }
}
