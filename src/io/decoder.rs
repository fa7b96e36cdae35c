//! Audio decoding using Symphonia

use crate::error::DspError;
use crate::preprocessing::channel_mixer::downmix;
use crate::signal::AudioSignal;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an audio file to a mono signal
///
/// The first track with a known codec is decoded. Every sample format is
/// converted to `f32` and all channels are averaged into one. Packets that fail
/// to decode are skipped with a warning.
///
/// # Errors
///
/// Returns `DspError` if the file cannot be opened, the container is not
/// recognised, the track has no sample rate, or no samples could be decoded.
pub fn decode_audio(path: impl AsRef<Path>) -> Result<AudioSignal, DspError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DspError::DecodingError("No supported audio tracks found".to_string()))?;
    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.ok_or_else(|| {
        DspError::DecodingError(format!("Unknown sample rate in {}", path.display()))
    })?;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();
    let mut buffer: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count();
                if buffer
                    .as_ref()
                    .map_or(false, |buf| buf.capacity() < decoded.capacity() * channels)
                {
                    buffer = None;
                }
                let buf = buffer
                    .get_or_insert_with(|| SampleBuffer::new(decoded.capacity() as u64, spec));
                buf.copy_interleaved_ref(decoded);
                samples.extend(downmix(buf.samples(), channels)?);
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet in {}: {}", path.display(), msg);
                continue;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if samples.is_empty() {
        return Err(DspError::DecodingError(format!(
            "No samples decoded from {}",
            path.display()
        )));
    }

    log::debug!(
        "Decoded {} mono samples at {} Hz from {}",
        samples.len(),
        sample_rate,
        path.display()
    );

    Ok(AudioSignal::new(samples, sample_rate))
}
