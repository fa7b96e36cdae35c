//! Audio preprocessing modules
//!
//! This module contains utilities for preparing audio for feature extraction:
//! - Channel mixing (interleaved multi-channel to mono)
//! - Peak normalization
//! - Resampling and length limiting

pub mod channel_mixer;
pub mod normalization;
pub mod resample;
