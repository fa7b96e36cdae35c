//! Mel-frequency cepstral coefficients
//!
//! # Algorithm
//!
//! 1. Power spectrogram `|STFT|²` (Hann window, no centering)
//! 2. Triangular mel filterbank on the HTK mel scale, area-normalized
//! 3. Power to dB, clipped at 80 dB below the loudest mel energy
//! 4. Orthonormal DCT-II over the mel bands of each frame, first `n_mfcc` kept

use super::spectrogram::stft;
use crate::error::DspError;
use crate::signal::AudioSignal;

/// Floor applied to mel energies before taking the log
const AMIN: f32 = 1e-10;

/// Dynamic range kept in the log-mel spectrogram, in dB
const TOP_DB: f32 = 80.0;

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank, `n_mels` rows of `n_fft / 2 + 1` weights
///
/// Bands are spaced evenly on the mel scale between 0 Hz and Nyquist; each
/// triangle is scaled by `2 / bandwidth` so bands carry equal area.
pub fn mel_filterbank(sample_rate: u32, n_fft: usize, n_mels: usize) -> Vec<Vec<f32>> {
    let n_bins = n_fft / 2 + 1;
    let nyquist = sample_rate as f32 / 2.0;
    let max_mel = hz_to_mel(nyquist);

    let edges: Vec<f32> = (0..n_mels + 2)
        .map(|i| mel_to_hz(max_mel * i as f32 / (n_mels + 1) as f32))
        .collect();
    let bin_hz: Vec<f32> = (0..n_bins)
        .map(|k| k as f32 * sample_rate as f32 / n_fft as f32)
        .collect();

    (0..n_mels)
        .map(|m| {
            let (lower, center, upper) = (edges[m], edges[m + 1], edges[m + 2]);
            let norm = 2.0 / (upper - lower);
            bin_hz
                .iter()
                .map(|&f| {
                    let rising = (f - lower) / (center - lower);
                    let falling = (upper - f) / (upper - center);
                    rising.min(falling).max(0.0) * norm
                })
                .collect()
        })
        .collect()
}

/// Orthonormal DCT-II of `input`, first `n_out` coefficients
fn dct_ortho(input: &[f32], n_out: usize) -> Vec<f32> {
    let n = input.len() as f32;
    (0..n_out)
        .map(|k| {
            let sum: f32 = input
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    x * (std::f32::consts::PI * k as f32 * (2.0 * i as f32 + 1.0) / (2.0 * n)).cos()
                })
                .sum();
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            sum * scale
        })
        .collect()
}

/// Compute MFCCs of a signal
///
/// # Arguments
///
/// * `signal` - Mono signal
/// * `n_mfcc` - Coefficients kept per frame
/// * `n_mels` - Mel bands
/// * `window_seconds` - STFT window length
/// * `hop_seconds` - STFT hop
///
/// # Returns
///
/// One row of `n_mfcc` coefficients per STFT frame
///
/// # Errors
///
/// Returns `DspError::InvalidInput` if `n_mfcc` or `n_mels` is zero, if
/// `n_mfcc > n_mels`, or if the STFT cannot be computed.
pub fn mfcc(
    signal: &AudioSignal,
    n_mfcc: usize,
    n_mels: usize,
    window_seconds: f32,
    hop_seconds: f32,
) -> Result<Vec<Vec<f32>>, DspError> {
    if n_mfcc == 0 || n_mels == 0 || n_mfcc > n_mels {
        return Err(DspError::InvalidInput(format!(
            "Invalid MFCC shape: n_mfcc={}, n_mels={}",
            n_mfcc, n_mels
        )));
    }

    log::debug!(
        "Computing MFCC: n_mfcc={}, n_mels={}, window={:.3}s, hop={:.3}s",
        n_mfcc,
        n_mels,
        window_seconds,
        hop_seconds
    );

    let spectrogram = stft(signal, window_seconds, hop_seconds)?;
    let n_fft = signal.time_to_samples(window_seconds);
    let filterbank = mel_filterbank(signal.sample_rate, n_fft, n_mels);

    let mut mel_db: Vec<Vec<f32>> = spectrogram
        .iter()
        .map(|frame| {
            let power: Vec<f32> = frame.iter().map(|c| c.norm_sqr()).collect();
            filterbank
                .iter()
                .map(|weights| {
                    let energy: f32 = weights.iter().zip(&power).map(|(w, p)| w * p).sum();
                    10.0 * energy.max(AMIN).log10()
                })
                .collect()
        })
        .collect();

    let floor = mel_db
        .iter()
        .flatten()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max)
        - TOP_DB;
    for value in mel_db.iter_mut().flatten() {
        *value = value.max(floor);
    }

    let coefficients: Vec<Vec<f32>> = mel_db.iter().map(|bands| dct_ortho(bands, n_mfcc)).collect();

    if coefficients.iter().flatten().any(|x| !x.is_finite()) {
        return Err(DspError::NumericalError(
            "Non-finite MFCC coefficient".to_string(),
        ));
    }

    Ok(coefficients)
}

/// Average each coefficient over all frames
///
/// # Errors
///
/// Returns `DspError::InvalidInput` if there are no frames or the frames differ
/// in length.
pub fn mean_over_frames(frames: &[Vec<f32>]) -> Result<Vec<f32>, DspError> {
    let width = match frames.first() {
        Some(first) => first.len(),
        None => return Err(DspError::InvalidInput("No frames to average".to_string())),
    };

    if frames.iter().any(|frame| frame.len() != width) {
        return Err(DspError::InvalidInput(
            "Frames differ in length".to_string(),
        ));
    }

    let mut mean = vec![0.0f32; width];
    for frame in frames {
        for (acc, &x) in mean.iter_mut().zip(frame) {
            *acc += x;
        }
    }
    for acc in mean.iter_mut() {
        *acc /= frames.len() as f32;
    }

    Ok(mean)
}
