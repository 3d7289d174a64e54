use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use relay_speech::audio::{duration_secs, read_wav_samples};
use relay_speech::PredictError;

#[test]
fn reads_pcm16_mono_16khz_wav() {
    let path = write_temp_wav(16_000, 1, &[0, 1000, -1000, 250]);
    let samples = read_wav_samples(&path).expect("wav should load");
    let _ = std::fs::remove_file(path);

    assert_eq!(samples.len(), 4);
    assert!(samples[1] > 0.0);
    assert!(samples[2] < 0.0);
}

#[test]
fn rejects_non_16khz_wav() {
    let path = write_temp_wav(8_000, 1, &[0, 100, -100, 50]);
    let error = read_wav_samples(&path).expect_err("8kHz input must fail");
    let _ = std::fs::remove_file(path);

    assert!(matches!(error, PredictError::InvalidAudio { .. }));
    assert!(error.to_string().contains("16000"));
}

#[test]
fn rejects_stereo_wav() {
    let path = write_temp_wav(16_000, 2, &[0, 0, 100, 100]);
    let error = read_wav_samples(&path).expect_err("stereo input must fail");
    let _ = std::fs::remove_file(path);

    assert!(matches!(error, PredictError::InvalidAudio { .. }));
    assert!(error.to_string().contains("1 channel"));
}

#[test]
fn missing_file_is_an_audio_error_not_fatal() {
    let error = read_wav_samples(&PathBuf::from("/nonexistent/audio.wav"))
        .expect_err("missing file must fail");
    assert!(matches!(error, PredictError::Audio { .. }));
    assert!(!error.is_setup_fatal());
}

#[test]
fn duration_tracks_sample_count() {
    let path = write_temp_wav(16_000, 1, &[0; 8_000]);
    let samples = read_wav_samples(&path).expect("wav should load");
    let _ = std::fs::remove_file(path);

    assert!((duration_secs(&samples) - 0.5).abs() < 1e-6);
}

fn write_temp_wav(sample_rate: u32, channels: u16, samples: &[i16]) -> PathBuf {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("relay-speech-test-{nonce}.wav"));

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&path, spec).expect("wav file should be created");
    for sample in samples {
        writer
            .write_sample(*sample)
            .expect("sample should be written");
    }
    writer.finalize().expect("wav should be finalized");

    path
}
