//! Resampling and length limiting

use crate::error::DspError;
use crate::signal::AudioSignal;

/// Resample a signal to `sample_rate` using linear interpolation
///
/// The output holds `floor(len * sample_rate / input_rate)` samples. A signal
/// already at the target rate is returned unchanged.
///
/// # Errors
///
/// Returns `DspError::InvalidInput` if either rate is zero or the signal is empty.
pub fn sample_to(signal: AudioSignal, sample_rate: u32) -> Result<AudioSignal, DspError> {
    if sample_rate == 0 || signal.sample_rate == 0 {
        return Err(DspError::InvalidInput(format!(
            "Invalid sample rate conversion: {} Hz -> {} Hz",
            signal.sample_rate, sample_rate
        )));
    }

    if signal.is_empty() {
        return Err(DspError::InvalidInput("Empty audio samples".to_string()));
    }

    if signal.sample_rate == sample_rate {
        return Ok(signal);
    }

    let input = &signal.samples;
    let out_len = (input.len() as u64 * sample_rate as u64 / signal.sample_rate as u64) as usize;
    let step = signal.sample_rate as f64 / sample_rate as f64;
    let last = input.len() - 1;

    let samples = (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = (pos.floor() as usize).min(last);
            let next = (idx + 1).min(last);
            let frac = (pos - idx as f64) as f32;
            input[idx] * (1.0 - frac) + input[next] * frac
        })
        .collect::<Vec<f32>>();

    log::debug!(
        "Resampled {} samples at {} Hz to {} samples at {} Hz",
        input.len(),
        signal.sample_rate,
        samples.len(),
        sample_rate
    );

    Ok(AudioSignal::new(samples, sample_rate))
}

/// Truncate or zero-pad a signal to exactly `n_samples`
pub fn limit_samples_to(mut signal: AudioSignal, n_samples: usize) -> AudioSignal {
    signal.samples.resize(n_samples, 0.0);
    signal
}
