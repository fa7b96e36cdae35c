//! Feature extraction steps chained through [`Maybe`]
//!
//! Each step takes the previous step's container, so a failure anywhere (a
//! missing file, a signal too short for one window, a panic inside a transform)
//! turns into an empty container that every later step passes through untouched.
//! Steps log a `debug` line for present results only; a failure is reported
//! once, by whoever finally inspects the container.
//!
//! # Example
//!
//! ```no_run
//! use guarded_dsp::pipeline::{mfcc, normalized_audio};
//! use guarded_dsp::FeatureConfig;
//!
//! let config = FeatureConfig::default();
//! let audio = normalized_audio("data/train/guitar/a.wav", &config);
//! let coefficients = mfcc(&audio, &config);
//! match coefficients.get() {
//!     Ok(frames) => println!("{} MFCC frames", frames.len()),
//!     Err(empty) => eprintln!("{}", empty),
//! }
//! ```

use crate::config::{FeatureConfig, GuardConfig};
use crate::features::mfcc::{mean_over_frames, mfcc as compute_mfcc};
use crate::features::spectral::{spectral_bandwidth as bandwidth, spectral_centroid as centroid};
use crate::features::spectrogram::stft;
use crate::features::spectrum::{amplitude, amplitude_to_db, fft};
use crate::io::decoder::decode_audio;
use crate::maybe::Maybe;
use crate::preprocessing::normalization::normalize;
use crate::preprocessing::resample::{limit_samples_to, sample_to};
use crate::signal::AudioSignal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scale of spectral magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreqType {
    /// Linear magnitudes
    Amplitude,
    /// Magnitudes in dB, 80 dB dynamic range
    Decibel,
}

impl FreqType {
    /// Convert raw magnitudes to this scale
    pub fn convert(self, magnitudes: Vec<f32>) -> Vec<f32> {
        match self {
            FreqType::Amplitude => magnitudes,
            FreqType::Decibel => amplitude_to_db(&magnitudes),
        }
    }
}

/// Log a present result; empty containers pass through without output
fn checkpoint<T>(maybe: Maybe<T>, log_present: impl FnOnce(&T)) -> Maybe<T> {
    if let Ok(value) = maybe.get() {
        log_present(value);
    }
    maybe
}

/// Load, resample, trim and peak-normalize an audio file
pub fn normalized_audio(path: impl AsRef<Path>, config: &FeatureConfig) -> Maybe<AudioSignal> {
    normalized_audio_with(path, config, GuardConfig::default())
}

/// [`normalized_audio`] with explicit fault-capture settings
pub fn normalized_audio_with(
    path: impl AsRef<Path>,
    config: &FeatureConfig,
    guard: GuardConfig,
) -> Maybe<AudioSignal> {
    let sample_rate = config.sample_rate;
    let n_samples = config.n_samples();

    let audio = Maybe::with_config(path.as_ref().to_path_buf(), guard)
        .try_transform(|path| decode_audio(path))
        .try_transform(|signal| sample_to(signal, sample_rate))
        .transform(|signal| limit_samples_to(signal, n_samples))
        .try_transform(normalize);

    checkpoint(audio, |signal| {
        log::debug!(
            "Normalized audio: {} samples at {} Hz",
            signal.len(),
            signal.sample_rate
        )
    })
}

/// Magnitude spectrum of the whole signal
pub fn spectrum(audio: &Maybe<AudioSignal>, freq: FreqType) -> Maybe<Vec<f32>> {
    let spectrum = audio
        .try_transform_ref(|signal| fft(&signal.samples, None))
        .transform_ref(|bins| freq.convert(amplitude(bins)));

    checkpoint(spectrum, |bins| {
        log::debug!("Spectrum: {} bins ({:?})", bins.len(), freq)
    })
}

/// Magnitude spectrogram, one row per STFT frame
///
/// For [`FreqType::Decibel`] the 80 dB range is measured from the loudest bin
/// of the whole spectrogram, not per frame.
pub fn spectrogram(
    audio: &Maybe<AudioSignal>,
    freq: FreqType,
    config: &FeatureConfig,
) -> Maybe<Vec<Vec<f32>>> {
    let (window, hop) = (config.window_seconds, config.hop_seconds);

    let rows = audio
        .try_transform_ref(|signal| stft(signal, window, hop))
        .transform_ref(|frames| {
            let width = frames.first().map_or(0, |frame| frame.len());
            let flat: Vec<f32> = frames.iter().flat_map(|frame| amplitude(frame)).collect();
            freq.convert(flat)
                .chunks(width.max(1))
                .map(|row| row.to_vec())
                .collect::<Vec<_>>()
        });

    checkpoint(rows, |rows| {
        log::debug!("Spectrogram: {} frames ({:?})", rows.len(), freq)
    })
}

/// MFCCs of the signal, one row per STFT frame
pub fn mfcc(audio: &Maybe<AudioSignal>, config: &FeatureConfig) -> Maybe<Vec<Vec<f32>>> {
    let (n_mfcc, n_mels) = (config.n_mfcc, config.n_mels);
    let (window, hop) = (config.window_seconds, config.hop_seconds);

    let frames =
        audio.try_transform_ref(|signal| compute_mfcc(signal, n_mfcc, n_mels, window, hop));

    checkpoint(frames, |frames| {
        log::debug!("MFCC: {} frames of {} coefficients", frames.len(), n_mfcc)
    })
}

/// MFCCs averaged over all frames: one vector per signal
pub fn mean_mfcc(audio: &Maybe<AudioSignal>, config: &FeatureConfig) -> Maybe<Vec<f32>> {
    mfcc(audio, config).try_transform_ref(|frames| mean_over_frames(frames))
}

/// Spectral centroid per STFT frame, in Hz
pub fn spectral_centroid(audio: &Maybe<AudioSignal>, config: &FeatureConfig) -> Maybe<Vec<f32>> {
    let (window, hop) = (config.window_seconds, config.hop_seconds);
    audio.try_transform_ref(|signal| centroid(signal, window, hop))
}

/// Spectral bandwidth per STFT frame, in Hz
pub fn spectral_bandwidth(audio: &Maybe<AudioSignal>, config: &FeatureConfig) -> Maybe<Vec<f32>> {
    let (window, hop) = (config.window_seconds, config.hop_seconds);
    audio.try_transform_ref(|signal| bandwidth(signal, window, hop))
}
