//! Channel mixing utilities (multi-channel to mono conversion)

use crate::error::DspError;

/// Average interleaved channels into mono
///
/// # Arguments
///
/// * `interleaved` - Samples ordered frame by frame (`L R L R ...` for stereo)
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// One sample per frame
///
/// # Errors
///
/// Returns `DspError::InvalidInput` if `channels` is zero or the input does not
/// hold a whole number of frames.
pub fn downmix(interleaved: &[f32], channels: usize) -> Result<Vec<f32>, DspError> {
    if channels == 0 {
        return Err(DspError::InvalidInput("Zero channels".to_string()));
    }

    if interleaved.len() % channels != 0 {
        return Err(DspError::InvalidInput(format!(
            "{} samples is not a whole number of {}-channel frames",
            interleaved.len(),
            channels
        )));
    }

    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    Ok(interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_average() {
        let mono = downmix(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2).unwrap();
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_mono_passthrough() {
        assert_eq!(downmix(&[0.1, 0.2], 1).unwrap(), vec![0.1, 0.2]);
    }

    #[test]
    fn test_ragged_input() {
        assert!(downmix(&[0.1, 0.2, 0.3], 2).is_err());
        assert!(downmix(&[0.1], 0).is_err());
    }
}
