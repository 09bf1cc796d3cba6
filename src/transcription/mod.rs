//! Transcription module - converts audio files to timestamped transcripts
//!
//! The whisper.cpp engine is only compiled with the `whisper` feature; the
//! rest of the crate talks to it through [`Transcriber`].

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::types::Transcript;

/// Turns an audio file into a transcript. May take minutes on long files.
pub trait Transcriber {
    fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;
}

pub const DEFAULT_WHISPER_MODEL: &str = "./models/ggml-base.en.bin";

/// Settings for the whisper.cpp backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhisperSettings {
    pub model_path: PathBuf,
    pub language: String,
}

impl Default for WhisperSettings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_WHISPER_MODEL),
            language: "en".to_string(),
        }
    }
}

/// Build the transcriber this binary was compiled with.
pub fn default_transcriber(settings: WhisperSettings) -> Result<Box<dyn Transcriber>> {
    build_transcriber(settings)
}

#[cfg(feature = "whisper")]
fn build_transcriber(settings: WhisperSettings) -> Result<Box<dyn Transcriber>> {
    Ok(Box::new(whisper::WhisperTranscriber::new(settings)))
}

#[cfg(not(feature = "whisper"))]
fn build_transcriber(settings: WhisperSettings) -> Result<Box<dyn Transcriber>> {
    bail!(
        "transcription with {:?} requires building with the 'whisper' feature",
        settings.model_path
    )
}

pub fn ensure_audio_exists(audio_path: &Path) -> Result<()> {
    if !audio_path.is_file() {
        bail!("Audio file not found at: {}", audio_path.display());
    }
    Ok(())
}

#[cfg(feature = "whisper")]
pub mod whisper {
    use std::path::Path;

    use anyhow::{Context, Result};
    use tracing::info;
    use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

    use super::{ensure_audio_exists, Transcriber, WhisperSettings};
    use crate::audio::decoder::decode_audio;
    use crate::audio::resample::{resample_to, WHISPER_SAMPLE_RATE};
    use crate::types::{Transcript, TranscriptSegment};

    pub struct WhisperTranscriber {
        settings: WhisperSettings,
    }

    impl WhisperTranscriber {
        pub fn new(settings: WhisperSettings) -> Self {
            Self { settings }
        }
    }

    impl Transcriber for WhisperTranscriber {
        fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
            ensure_audio_exists(audio_path)?;

            let decoded = decode_audio(audio_path)?;
            let audio = resample_to(&decoded, WHISPER_SAMPLE_RATE)?;
            info!(
                path = %audio_path.display(),
                seconds = audio.duration_seconds(),
                "starting transcription; this may take several minutes"
            );

            let model_path = self.settings.model_path.to_string_lossy();
            let ctx = WhisperContext::new_with_params(
                &model_path,
                WhisperContextParameters::default(),
            )
            .with_context(|| {
                format!(
                    "Failed to load Whisper model at {}. Download with: wget https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.en.bin -P ./models/",
                    model_path
                )
            })?;

            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            params.set_language(Some(self.settings.language.as_str()));
            params.set_translate(false);
            params.set_print_special(false);
            params.set_print_progress(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);

            let mut state = ctx
                .create_state()
                .context("Failed to create Whisper state")?;
            state
                .full(params, &audio.samples)
                .context("Failed to transcribe audio")?;

            let mut transcript = Transcript::default();
            for segment in state.as_iter() {
                let text = segment
                    .to_str()
                    .context("Failed to get segment text")?
                    .to_string();
                // Timestamps are in centiseconds
                let start = segment.start_timestamp() as f64 / 100.0;
                let end = segment.end_timestamp() as f64 / 100.0;
                transcript.text.push_str(&text);
                transcript
                    .chunks
                    .push(TranscriptSegment::new(start, end, text));
            }

            info!(segments = transcript.chunks.len(), "transcription completed");
            Ok(transcript)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ensure_audio_exists, WhisperSettings};
    use std::path::Path;

    #[test]
    fn missing_audio_is_rejected() {
        let err = ensure_audio_exists(Path::new("data/scraped_videos/absent.mp3")).unwrap_err();
        assert!(err.to_string().contains("Audio file not found"));
    }

    #[test]
    fn default_settings_target_english_base_model() {
        let settings = WhisperSettings::default();
        assert_eq!(settings.language, "en");
        assert!(settings.model_path.ends_with("ggml-base.en.bin"));
    }

    #[cfg(not(feature = "whisper"))]
    #[test]
    fn transcriber_requires_whisper_feature() {
        assert!(super::default_transcriber(WhisperSettings::default()).is_err());
    }
}
