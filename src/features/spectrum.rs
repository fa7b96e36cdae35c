//! FFT spectrum and magnitude conversions
//!
//! # Example
//!
//! ```
//! use guarded_dsp::features::spectrum::{amplitude, fft};
//!
//! let samples = vec![1.0f32, 0.0, -1.0, 0.0];
//! let bins = fft(&samples, None)?;
//! assert_eq!(bins.len(), 2);
//! assert!((amplitude(&bins)[1] - 2.0).abs() < 1e-6);
//! # Ok::<(), guarded_dsp::DspError>(())
//! ```

use crate::error::DspError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Smallest amplitude considered by [`amplitude_to_db`]
const AMIN: f32 = 1e-5;

/// Dynamic range kept by [`amplitude_to_db`], in dB below the maximum
const TOP_DB: f32 = 80.0;

/// Forward FFT of a real signal, keeping the first half of the bins
///
/// The signal is zero-padded or truncated to `nfft` samples first; `None` uses
/// the signal length.
///
/// # Errors
///
/// Returns `DspError::InvalidInput` if the transform length is zero.
pub fn fft(samples: &[f32], nfft: Option<usize>) -> Result<Vec<Complex<f32>>, DspError> {
    let nfft = nfft.unwrap_or(samples.len());
    if nfft == 0 {
        return Err(DspError::InvalidInput("FFT length is zero".to_string()));
    }

    log::debug!("Computing FFT: {} samples, nfft={}", samples.len(), nfft);

    let mut buffer: Vec<Complex<f32>> = samples
        .iter()
        .take(nfft)
        .map(|&x| Complex::new(x, 0.0))
        .collect();
    buffer.resize(nfft, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::<f32>::new();
    planner.plan_fft_forward(nfft).process(&mut buffer);

    buffer.truncate(nfft / 2);
    Ok(buffer)
}

/// Magnitude of each bin
pub fn amplitude(bins: &[Complex<f32>]) -> Vec<f32> {
    bins.iter().map(|c| c.norm()).collect()
}

/// Convert amplitudes to decibels
///
/// `20 * log10(max(1e-5, x))`, then clipped from below at 80 dB under the
/// loudest value.
pub fn amplitude_to_db(values: &[f32]) -> Vec<f32> {
    let db: Vec<f32> = values
        .iter()
        .map(|&x| 20.0 * x.abs().max(AMIN).log10())
        .collect();
    let floor = db.iter().copied().fold(f32::NEG_INFINITY, f32::max) - TOP_DB;
    db.into_iter().map(|x| x.max(floor)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_peak_bin() {
        // 8 cycles over 64 samples lands exactly in bin 8.
        let samples: Vec<f32> = (0..64)
            .map(|i| (2.0 * std::f32::consts::PI * 8.0 * i as f32 / 64.0).sin())
            .collect();
        let magnitudes = amplitude(&fft(&samples, None).unwrap());
        assert_eq!(magnitudes.len(), 32);

        let peak = magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 8);
        assert!((magnitudes[8] - 32.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_padding() {
        let bins = fft(&[1.0], Some(8)).unwrap();
        assert_eq!(bins.len(), 4);
        // An impulse has a flat spectrum.
        for bin in amplitude(&bins) {
            assert!((bin - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_length() {
        assert!(fft(&[], None).is_err());
        assert!(fft(&[1.0, 2.0], Some(0)).is_err());
    }

    #[test]
    fn test_amplitude_to_db() {
        let db = amplitude_to_db(&[1.0, 0.1, 0.0]);
        assert!((db[0] - 0.0).abs() < 1e-4);
        assert!((db[1] + 20.0).abs() < 1e-4);
        // 0.0 would be -100 dB; it is clipped to 80 dB under the maximum.
        assert!((db[2] + 80.0).abs() < 1e-4);
    }

    #[test]
    fn test_amplitude_to_db_empty() {
        assert!(amplitude_to_db(&[]).is_empty());
    }
}
