//! Peak normalization
//!
//! # Example
//!
//! ```
//! use guarded_dsp::preprocessing::normalization::normalize_peak;
//!
//! let mut samples = vec![0.25f32, -0.5, 0.1];
//! let gain = normalize_peak(&mut samples)?;
//! assert_eq!(gain, 2.0);
//! assert_eq!(samples, vec![0.5, -1.0, 0.2]);
//! # Ok::<(), guarded_dsp::DspError>(())
//! ```

use crate::error::DspError;
use crate::signal::AudioSignal;

/// Numerical stability epsilon for divisions
const EPSILON: f32 = 1e-10;

/// Scale samples in place so the absolute peak becomes 1.0
///
/// # Returns
///
/// The linear gain applied (1.0 for silent input, which is left unchanged)
///
/// # Errors
///
/// Returns `DspError::InvalidInput` for empty input and
/// `DspError::NumericalError` if the samples contain NaN or infinity.
pub fn normalize_peak(samples: &mut [f32]) -> Result<f32, DspError> {
    if samples.is_empty() {
        return Err(DspError::InvalidInput("Empty audio samples".to_string()));
    }

    if samples.iter().any(|x| !x.is_finite()) {
        return Err(DspError::NumericalError(
            "Non-finite sample in input".to_string(),
        ));
    }

    let peak = samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);

    if peak <= EPSILON {
        log::warn!("Audio is silent or extremely quiet, cannot normalize");
        return Ok(1.0);
    }

    let gain = 1.0 / peak;
    for sample in samples.iter_mut() {
        *sample *= gain;
    }

    log::debug!(
        "Peak normalization: peak={:.2} dB, gain={:.2} dB",
        20.0 * peak.log10(),
        20.0 * gain.log10()
    );

    Ok(gain)
}

/// Peak-normalize a signal, returning the normalized copy
pub fn normalize(mut signal: AudioSignal) -> Result<AudioSignal, DspError> {
    normalize_peak(&mut signal.samples)?;
    Ok(signal)
}
