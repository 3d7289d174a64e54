pub mod audio;
pub mod config;
pub mod engines;
pub mod error;
pub mod memory;
pub mod predictor;

use serde::Serialize;

pub use config::PredictorConfig;
pub use error::PredictError;
pub use predictor::{PredictOptions, Predictor};

/// One word with refined timing, produced by the alignment pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordSpan {
    pub word: String,
    /// Start time in seconds.
    pub start: f32,
    /// End time in seconds.
    pub end: f32,
    /// Confidence in [0, 1].
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptSegment {
    /// Segment start time in seconds.
    pub start: f32,
    /// Segment end time in seconds.
    pub end: f32,
    pub text: String,
    /// Word-level timing, present only when alignment ran for this call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<WordSpan>>,
}

/// Output of the transcription pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub language: String,
    pub segments: Vec<TranscriptSegment>,
}

/// Output of the alignment pass. `segments` carries the same ordered text
/// spans as the transcript it was built from, each with its `words` filled
/// in; `word_segments` is the flat word sequence across the whole audio.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTranscript {
    pub segments: Vec<TranscriptSegment>,
    pub word_segments: Vec<WordSpan>,
}

/// Per-call transcription options. Built fresh for every call; nothing here
/// is written back into the engine, so two calls with different prompts
/// cannot observe each other.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscribeOptions {
    /// Decode parallelism. Clamped to available cores by the engine.
    pub batch_size: u32,
    /// Seed text for the first decoding window.
    pub initial_prompt: Option<String>,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            batch_size: 32,
            initial_prompt: None,
        }
    }
}

pub trait TranscriptionEngine {
    /// Transcribe already-decoded samples (16 kHz, mono, f32 in [-1, 1]).
    fn transcribe(
        &self,
        samples: &[f32],
        options: &TranscribeOptions,
    ) -> Result<Transcript, PredictError>;
}

pub trait WordAligner {
    /// Refine segment timestamps into word-level timing for the same audio.
    fn align(
        &self,
        segments: &[TranscriptSegment],
        samples: &[f32],
    ) -> Result<AlignedTranscript, PredictError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcribe_options_default_batch_size() {
        let options = TranscribeOptions::default();
        assert_eq!(options.batch_size, 32);
        assert!(options.initial_prompt.is_none());
    }

    #[test]
    fn segment_without_words_serializes_without_words_key() {
        let segment = TranscriptSegment {
            start: 0.0,
            end: 1.5,
            text: "hello there".to_string(),
            words: None,
        };
        let json = serde_json::to_string(&segment).expect("segment serializes");
        assert!(!json.contains("words"));
    }

    #[test]
    fn segment_with_words_serializes_word_fields() {
        let segment = TranscriptSegment {
            start: 0.0,
            end: 1.0,
            text: "hi".to_string(),
            words: Some(vec![WordSpan {
                word: "hi".to_string(),
                start: 0.1,
                end: 0.4,
                score: 0.92,
            }]),
        };
        let json = serde_json::to_string(&segment).expect("segment serializes");
        assert!(json.contains("\"words\""));
        assert!(json.contains("\"score\""));
    }
}
