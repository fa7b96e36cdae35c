//! Short-time Fourier transform

use super::framing::FrameIter;
use crate::error::DspError;
use crate::signal::AudioSignal;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Periodic Hann window of `size` samples
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos())
        .collect()
}

/// Compute the STFT of a signal
///
/// # Arguments
///
/// * `signal` - Mono signal
/// * `window_seconds` - Window length; the FFT size is the window length in samples
/// * `hop_seconds` - Distance between frame starts
///
/// # Returns
///
/// One row per frame, each holding `n_fft / 2 + 1` complex bins
///
/// # Errors
///
/// Returns `DspError::InvalidInput` if the window or hop rounds down to zero
/// samples, or the signal is shorter than one window.
pub fn stft(
    signal: &AudioSignal,
    window_seconds: f32,
    hop_seconds: f32,
) -> Result<Vec<Vec<Complex<f32>>>, DspError> {
    let n_fft = signal.time_to_samples(window_seconds);
    let hop_size = signal.time_to_samples(hop_seconds);

    log::debug!(
        "Computing STFT: {} samples at {} Hz, n_fft={}, hop={}",
        signal.len(),
        signal.sample_rate,
        n_fft,
        hop_size
    );

    let frames = FrameIter::new(&signal.samples, n_fft, hop_size)?;
    if frames.frame_count() == 0 {
        return Err(DspError::InvalidInput(format!(
            "Signal of {} samples is shorter than one {}-sample window",
            signal.len(),
            n_fft
        )));
    }

    let window = hann_window(n_fft);
    let fft = FftPlanner::<f32>::new().plan_fft_forward(n_fft);
    let n_bins = n_fft / 2 + 1;

    let mut spectrogram = Vec::with_capacity(frames.frame_count());
    let mut buffer = vec![Complex::new(0.0f32, 0.0); n_fft];
    for frame in frames {
        for ((slot, &x), &w) in buffer.iter_mut().zip(frame).zip(&window) {
            *slot = Complex::new(x * w, 0.0);
        }
        fft.process(&mut buffer);
        spectrogram.push(buffer[..n_bins].to_vec());
    }

    Ok(spectrogram)
}
