//! Feature extraction modules
//!
//! This module contains the spectral features computed from a signal:
//! - Framing (fixed window and hop)
//! - FFT spectrum, amplitude and decibel conversion
//! - STFT spectrogram
//! - Spectral centroid and bandwidth
//! - MFCC

pub mod framing;
pub mod mfcc;
pub mod spectral;
pub mod spectrogram;
pub mod spectrum;
