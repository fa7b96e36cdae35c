//! Configuration parameters for guarded chains and feature extraction

use serde::{Deserialize, Serialize};

/// When to capture a backtrace for a captured fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BacktraceMode {
    /// Never capture; the reason carries only the message and location
    Off,
    /// Capture only when `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE` enable it
    Env,
    /// Always capture
    Force,
}

/// Fault-capture configuration carried by every [`Maybe`](crate::Maybe)
///
/// The config is copied into each container produced by `transform`, so a chain
/// keeps the settings of the container it started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Backtrace capture for captured faults (default: Force)
    pub backtrace: BacktraceMode,

    /// Suppress the default "thread panicked" report for panics that a guard
    /// captures (default: true)
    pub quiet_panics: bool,

    /// Highlight diagnostics written by `run` with terminal escape codes
    /// (default: true)
    pub colored: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            backtrace: BacktraceMode::Force,
            quiet_panics: true,
            colored: true,
        }
    }
}

/// Feature extraction parameters
///
/// Fields missing from a deserialized config take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Sample rate every signal is resampled to, in Hz (default: 22100)
    pub sample_rate: u32,

    /// Length every signal is truncated or padded to, in seconds (default: 2.0)
    pub duration_seconds: f32,

    /// Analysis window length in seconds (default: 0.032)
    pub window_seconds: f32,

    /// Hop between windows in seconds (default: half a window)
    pub hop_seconds: f32,

    /// Number of MFCC coefficients kept per frame (default: 40)
    pub n_mfcc: usize,

    /// Number of mel bands used before the DCT (default: 128)
    pub n_mels: usize,
}

impl FeatureConfig {
    /// Signal length in samples after `limit_samples_to`
    pub fn n_samples(&self) -> usize {
        (self.duration_seconds * self.sample_rate as f32) as usize
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22100,
            duration_seconds: 2.0,
            window_seconds: 0.032,
            hop_seconds: 0.016,
            n_mfcc: 40,
            n_mels: 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_n_samples() {
        let config = FeatureConfig::default();
        assert_eq!(config.n_samples(), 44200);
    }

    #[test]
    fn test_guard_config_defaults() {
        let config = GuardConfig::default();
        assert_eq!(config.backtrace, BacktraceMode::Force);
        assert!(config.quiet_panics);
        assert!(config.colored);
    }

    #[test]
    fn test_partial_feature_config_from_json() {
        let config: FeatureConfig =
            serde_json::from_str(r#"{"sample_rate": 16000, "n_mfcc": 13}"#).unwrap();
        assert_eq!(config.sample_rate, 16000);
        assert_eq!(config.n_mfcc, 13);
        assert_eq!(config.n_mels, 128);
        assert_eq!(config.n_samples(), 32000);
    }

    #[test]
    fn test_guard_config_json_round_trip() {
        let config = GuardConfig {
            backtrace: BacktraceMode::Env,
            quiet_panics: false,
            colored: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""backtrace":"Env""#));
        assert_eq!(serde_json::from_str::<GuardConfig>(&json).unwrap(), config);
    }
}
