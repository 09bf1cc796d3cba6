use anyhow::{ensure, Result};

use super::AudioData;

/// Sample rate whisper.cpp expects its input at
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Linearly interpolate `audio` onto `target_rate`.
pub fn resample_to(audio: &AudioData, target_rate: u32) -> Result<AudioData> {
    ensure!(audio.sample_rate > 0, "source sample rate must be positive");
    ensure!(target_rate > 0, "target sample rate must be positive");
    if audio.samples.is_empty() || audio.sample_rate == target_rate {
        return Ok(AudioData {
            samples: audio.samples.clone(),
            sample_rate: target_rate,
        });
    }

    let step = audio.sample_rate as f64 / target_rate as f64;
    let output_len = (audio.samples.len() as f64 / step).ceil().max(1.0) as usize;
    let last = audio.samples.len() - 1;
    let samples = (0..output_len)
        .map(|i| {
            let position = i as f64 * step;
            let left = (position.floor() as usize).min(last);
            let right = (left + 1).min(last);
            let t = (position - left as f64) as f32;
            audio.samples[left] * (1.0 - t) + audio.samples[right] * t
        })
        .collect();

    Ok(AudioData {
        samples,
        sample_rate: target_rate,
    })
}
