use std::path::Path;

use crate::error::PredictError;

/// Sample rate both models expect.
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Requirements: 16 kHz, mono, PCM int16 WAV file.
pub fn read_wav_samples(wav_path: &Path) -> Result<Vec<f32>, PredictError> {
    let mut reader =
        hound::WavReader::open(wav_path).map_err(|e| PredictError::audio("opening wav", e))?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(PredictError::invalid_audio(format!(
            "expected 1 channel, found {}",
            spec.channels
        )));
    }

    if spec.sample_rate != SAMPLE_RATE_HZ {
        return Err(PredictError::invalid_audio(format!(
            "expected {SAMPLE_RATE_HZ} Hz sample rate, found {} Hz",
            spec.sample_rate
        )));
    }

    if spec.bits_per_sample != 16 {
        return Err(PredictError::invalid_audio(format!(
            "expected 16 bits per sample, found {}",
            spec.bits_per_sample
        )));
    }

    if spec.sample_format != hound::SampleFormat::Int {
        return Err(PredictError::invalid_audio(format!(
            "expected Int sample format, found {:?}",
            spec.sample_format
        )));
    }

    let samples: Result<Vec<f32>, hound::Error> = reader
        .samples::<i16>()
        .map(|sample| sample.map(|s| s as f32 / i16::MAX as f32))
        .collect();

    samples.map_err(|e| PredictError::audio("reading samples", e))
}

/// Duration in seconds of a decoded sample buffer.
pub fn duration_secs(samples: &[f32]) -> f32 {
    samples.len() as f32 / SAMPLE_RATE_HZ as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_of_one_second_buffer() {
        let samples = vec![0.0f32; SAMPLE_RATE_HZ as usize];
        assert!((duration_secs(&samples) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn duration_of_empty_buffer_is_zero() {
        assert_eq!(duration_secs(&[]), 0.0);
    }
}
