use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::Decoder;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatReader;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::probe::Hint;
use tracing::warn;

use super::AudioData;

/// Decode an audio file (MP3, OGG, FLAC, WAV, ...) to mono f32 samples
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<AudioData> {
    let mut track = TrackReader::open(path.as_ref())?;
    let mut samples = Vec::new();
    while let Some(mono) = track.next_mono()? {
        samples.extend(mono);
    }
    Ok(AudioData {
        samples,
        sample_rate: track.sample_rate,
    })
}

/// Default track of a container together with its decoder.
struct TrackReader {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    buffer: Option<SampleBuffer<f32>>,
}

impl TrackReader {
    fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open audio file: {}", path.display()))?;
        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }

        let format = symphonia::default::get_probe()
            .format(
                &hint,
                MediaSourceStream::new(Box::new(file), Default::default()),
                &Default::default(),
                &Default::default(),
            )
            .with_context(|| format!("Unrecognized audio format: {}", path.display()))?
            .format;
        let track = format
            .default_track()
            .context("No audio tracks found in file")?;
        let sample_rate = track
            .codec_params
            .sample_rate
            .context("Sample rate not specified in audio file")?;
        let track_id = track.id;
        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &Default::default())
            .context("Unsupported audio codec")?;

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            buffer: None,
        })
    }

    /// Mono samples of the next decodable packet, `None` once the stream ends.
    fn next_mono(&mut self) -> Result<Option<Vec<f32>>> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(err)) if err.kind() == ErrorKind::UnexpectedEof => {
                    return Ok(None)
                }
                Err(err) => return Err(err).context("Failed to read packet"),
            };
            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(reason)) => {
                    warn!(reason, "skipping corrupt audio packet");
                    continue;
                }
                Err(err) => return Err(err).context("Failed to decode audio packet"),
            };
            let spec = *decoded.spec();
            let channels = spec.channels.count().max(1);
            let frames = decoded.capacity();

            // Interleaved f32 conversion handles every sample format symphonia emits
            if self
                .buffer
                .as_ref()
                .is_some_and(|buffer| buffer.capacity() < frames * channels)
            {
                self.buffer = None;
            }
            let buffer = self
                .buffer
                .get_or_insert_with(|| SampleBuffer::new(frames as u64, spec));
            buffer.copy_interleaved_ref(decoded);
            return Ok(Some(downmix(buffer.samples(), channels).collect()));
        }
    }
}

/// Average interleaved frames down to a single channel
fn downmix(interleaved: &[f32], channels: usize) -> impl Iterator<Item = f32> + '_ {
    interleaved
        .chunks(channels)
        .map(move |frame| frame.iter().sum::<f32>() / channels as f32)
}
