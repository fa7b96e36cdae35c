//! # Guarded DSP
//!
//! A chainable container that shields a pipeline of audio feature computations
//! from faults raised inside them, carrying failures forward as data instead of
//! letting them unwind through the caller.
//!
//! ## Features
//!
//! - **Maybe**: value-or-[`Empty`] container with `apply`, `transform` and `run`
//! - **Fault capture**: panics and `Err` values become an `Empty` with message,
//!   location and backtrace
//! - **Sticky failure**: once empty, later steps are skipped, never re-run
//! - **Collaborators**: Symphonia decoding, resampling, peak normalization,
//!   FFT/STFT/MFCC with rustfft
//!
//! ## Quick Start
//!
//! ```
//! use guarded_dsp::Maybe;
//!
//! let samples = Maybe::new(vec![0.5f32, -1.0, 0.25]);
//!
//! let peak = samples.transform(|s| s.iter().fold(0.0f32, |m, x| m.max(x.abs())));
//! assert_eq!(peak.get(), Ok(&1.0));
//!
//! // Out-of-bounds indexing panics; the panic is captured.
//! let tenth = samples.transform(|s| s[10]);
//! assert!(!tenth.is_present());
//!
//! // Later steps never run on an empty container.
//! let scaled = tenth.transform(|x| x * 2.0);
//! assert_eq!(scaled.get(), tenth.get());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! path → decode → resample → trim → normalize → STFT → mel → DCT → MFCC
//!        each arrow is a Maybe::transform; the first failure stops the rest
//! ```
//!
//! Panics can only be captured when the crate is built with `panic = "unwind"`
//! (the default).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod maybe;
pub mod pipeline;
pub mod preprocessing;
pub mod signal;

// Re-export main types
pub use config::{BacktraceMode, FeatureConfig, GuardConfig};
pub use error::DspError;
pub use maybe::{Empty, Maybe, Spread};
pub use pipeline::FreqType;
pub use signal::AudioSignal;
