//! Sample windowing utilities

use crate::error::DspError;

/// Iterator over fixed-size windows of a sample slice
///
/// Windows start every `hop_size` samples; a trailing partial window is dropped.
#[derive(Debug, Clone)]
pub struct FrameIter<'a> {
    /// Samples being windowed
    samples: &'a [f32],
    /// Window length in samples
    frame_size: usize,
    /// Distance between window starts
    hop_size: usize,
    /// Start of the next window
    position: usize,
}

impl<'a> FrameIter<'a> {
    /// Create a frame iterator
    ///
    /// # Errors
    ///
    /// Returns `DspError::InvalidInput` if `frame_size` or `hop_size` is zero.
    pub fn new(samples: &'a [f32], frame_size: usize, hop_size: usize) -> Result<Self, DspError> {
        if frame_size == 0 || hop_size == 0 {
            return Err(DspError::InvalidInput(format!(
                "Invalid framing: frame_size={}, hop_size={}",
                frame_size, hop_size
            )));
        }

        Ok(Self {
            samples,
            frame_size,
            hop_size,
            position: 0,
        })
    }

    /// Total number of whole windows in the slice
    pub fn frame_count(&self) -> usize {
        if self.samples.len() < self.frame_size {
            0
        } else {
            (self.samples.len() - self.frame_size) / self.hop_size + 1
        }
    }
}

impl<'a> Iterator for FrameIter<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        if self.position + self.frame_size > self.samples.len() {
            return None;
        }

        let window = &self.samples[self.position..self.position + self.frame_size];
        self.position += self.hop_size;
        Some(window)
    }
}
