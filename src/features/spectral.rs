//! Spectral shape descriptors per STFT frame
//!
//! Both descriptors treat a frame's magnitude spectrum as a distribution over
//! bin frequencies:
//! - centroid: `Σ f·|X(f)| / Σ |X(f)|`
//! - bandwidth: `sqrt(Σ p(f)·(f − centroid)²)` with `p(f) = |X(f)| / Σ |X(f)|`
//!
//! Silent frames have no distribution; both descriptors are 0.0 for them.

use super::spectrogram::stft;
use crate::error::DspError;
use crate::signal::AudioSignal;
use rustfft::num_complex::Complex;

/// Center frequency in Hz of each of the `n_bins` one-sided FFT bins
fn bin_frequencies(sample_rate: u32, n_bins: usize) -> Vec<f32> {
    let n_fft = (n_bins.saturating_sub(1) * 2).max(1);
    (0..n_bins)
        .map(|k| k as f32 * sample_rate as f32 / n_fft as f32)
        .collect()
}

/// Centroid and bandwidth of one frame
fn frame_shape(frame: &[Complex<f32>], freqs: &[f32]) -> (f32, f32) {
    let magnitudes: Vec<f32> = frame.iter().map(|bin| bin.norm()).collect();
    let total: f32 = magnitudes.iter().sum();
    if total <= f32::EPSILON {
        return (0.0, 0.0);
    }

    let centroid = magnitudes
        .iter()
        .zip(freqs)
        .map(|(m, f)| m * f)
        .sum::<f32>()
        / total;
    let variance = magnitudes
        .iter()
        .zip(freqs)
        .map(|(m, f)| m / total * (f - centroid).powi(2))
        .sum::<f32>();

    (centroid, variance.sqrt())
}

fn shape_per_frame(
    signal: &AudioSignal,
    window_seconds: f32,
    hop_seconds: f32,
) -> Result<Vec<(f32, f32)>, DspError> {
    let frames = stft(signal, window_seconds, hop_seconds)?;
    let n_bins = frames.first().map_or(0, |frame| frame.len());
    let freqs = bin_frequencies(signal.sample_rate, n_bins);

    let shape: Vec<(f32, f32)> = frames.iter().map(|frame| frame_shape(frame, &freqs)).collect();
    if shape.iter().any(|(c, b)| !c.is_finite() || !b.is_finite()) {
        return Err(DspError::NumericalError(
            "Non-finite spectral shape (NaN or Inf in signal)".to_string(),
        ));
    }
    Ok(shape)
}

/// Spectral centroid of each STFT frame, in Hz
///
/// # Errors
///
/// Same conditions as [`stft`], plus `DspError::NumericalError` for a signal
/// holding NaN or infinite samples.
pub fn spectral_centroid(
    signal: &AudioSignal,
    window_seconds: f32,
    hop_seconds: f32,
) -> Result<Vec<f32>, DspError> {
    let shape = shape_per_frame(signal, window_seconds, hop_seconds)?;
    log::debug!("Spectral centroid over {} frames", shape.len());
    Ok(shape.into_iter().map(|(centroid, _)| centroid).collect())
}

/// Spectral bandwidth (second-order spread around the centroid) of each STFT
/// frame, in Hz
pub fn spectral_bandwidth(
    signal: &AudioSignal,
    window_seconds: f32,
    hop_seconds: f32,
) -> Result<Vec<f32>, DspError> {
    let shape = shape_per_frame(signal, window_seconds, hop_seconds)?;
    log::debug!("Spectral bandwidth over {} frames", shape.len());
    Ok(shape.into_iter().map(|(_, bandwidth)| bandwidth).collect())
}
