use std::path::Path;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::SAMPLE_RATE_HZ;
use crate::error::PredictError;
use crate::{AlignedTranscript, TranscriptSegment, WordAligner, WordSpan};

/// Language-specific metadata carried next to the alignment model handle.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignMetadata {
    pub language: String,
    pub sample_rate_hz: u32,
}

/// Word-level aligner backed by a second whisper.cpp context.
///
/// Runs the audio again with token timestamps enabled, groups decoder
/// tokens into words, and re-attaches the words to the transcription
/// segments. Character-level alignments are never produced.
pub struct WhisperAligner {
    context: WhisperContext,
    metadata: AlignMetadata,
}

impl WhisperAligner {
    pub fn load(model_path: &Path, language: &str) -> Result<Self, PredictError> {
        let path_str = model_path
            .to_str()
            .ok_or_else(|| PredictError::model_load(model_path, "path is not valid UTF-8"))?;

        let context =
            WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
                .map_err(|e| PredictError::model_load(model_path, e))?;

        log::info!(
            "loaded alignment model from {} (language={language})",
            model_path.display()
        );

        Ok(Self {
            context,
            metadata: AlignMetadata {
                language: language.to_string(),
                sample_rate_hz: SAMPLE_RATE_HZ,
            },
        })
    }

    pub fn metadata(&self) -> &AlignMetadata {
        &self.metadata
    }

    fn timed_tokens(&self, samples: &[f32]) -> Result<Vec<TokenTiming>, PredictError> {
        let mut state = self
            .context
            .create_state()
            .map_err(|e| PredictError::inference("alignment", e))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(&self.metadata.language));
        params.set_translate(false);
        params.set_token_timestamps(true);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| PredictError::inference("alignment", e))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| PredictError::inference("alignment", e))?;

        let mut tokens = Vec::new();
        for seg in 0..num_segments {
            let n_tokens = state
                .full_n_tokens(seg)
                .map_err(|e| PredictError::inference("alignment", e))?;
            for tok in 0..n_tokens {
                let text = state
                    .full_get_token_text(seg, tok)
                    .map_err(|e| PredictError::inference("alignment", e))?;
                let data = state
                    .full_get_token_data(seg, tok)
                    .map_err(|e| PredictError::inference("alignment", e))?;

                if is_special_token(&text) {
                    continue;
                }

                tokens.push(TokenTiming {
                    text,
                    t0: data.t0,
                    t1: data.t1,
                    p: data.p,
                });
            }
        }

        Ok(tokens)
    }
}

impl WordAligner for WhisperAligner {
    fn align(
        &self,
        segments: &[TranscriptSegment],
        samples: &[f32],
    ) -> Result<AlignedTranscript, PredictError> {
        if samples.is_empty() {
            return Err(PredictError::invalid_audio("empty sample buffer"));
        }
        if segments.is_empty() {
            return Ok(AlignedTranscript {
                segments: Vec::new(),
                word_segments: Vec::new(),
            });
        }

        let tokens = self.timed_tokens(samples)?;
        let word_segments = group_words(&tokens);
        let segments = attach_words(segments, &word_segments);

        log::debug!(
            "aligned {} words across {} segments",
            word_segments.len(),
            segments.len()
        );

        Ok(AlignedTranscript {
            segments,
            word_segments,
        })
    }
}

struct TokenTiming {
    text: String,
    /// Centiseconds.
    t0: i64,
    /// Centiseconds.
    t1: i64,
    p: f32,
}

/// Whisper emits control tokens like `[_BEG_]` and `<|endoftext|>` inline
/// with text tokens; they carry no word content.
fn is_special_token(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<')
}

/// Groups BPE tokens into words. A token whose text begins with whitespace
/// opens a new word; everything else extends the current one. Word score is
/// the mean token probability, clamped to [0, 1].
fn group_words(tokens: &[TokenTiming]) -> Vec<WordSpan> {
    let mut words: Vec<WordSpan> = Vec::new();
    let mut probs: Vec<Vec<f32>> = Vec::new();

    for token in tokens {
        let starts_word = token.text.starts_with(char::is_whitespace) || words.is_empty();
        if starts_word {
            words.push(WordSpan {
                word: token.text.trim().to_string(),
                start: token.t0 as f32 / 100.0,
                end: (token.t1.max(token.t0)) as f32 / 100.0,
                score: 0.0,
            });
            probs.push(vec![token.p]);
        } else if let (Some(word), Some(word_probs)) = (words.last_mut(), probs.last_mut()) {
            word.word.push_str(token.text.trim_end());
            word.end = word.end.max(token.t1 as f32 / 100.0);
            word_probs.push(token.p);
        }
    }

    for (word, word_probs) in words.iter_mut().zip(&probs) {
        let mean = word_probs.iter().sum::<f32>() / word_probs.len() as f32;
        word.score = mean.clamp(0.0, 1.0);
    }

    words.retain(|w| !w.word.is_empty());
    words
}

/// Assigns each word to the segment whose time range contains its midpoint,
/// falling back to the nearest segment. Every output segment carries a
/// `words` list, empty or not, so the output shape is uniform.
fn attach_words(segments: &[TranscriptSegment], words: &[WordSpan]) -> Vec<TranscriptSegment> {
    let mut buckets: Vec<Vec<WordSpan>> = vec![Vec::new(); segments.len()];

    for word in words {
        let midpoint = (word.start + word.end) / 2.0;
        let index = segments
            .iter()
            .position(|s| midpoint >= s.start && midpoint < s.end)
            .unwrap_or_else(|| nearest_segment(segments, midpoint));
        buckets[index].push(word.clone());
    }

    segments
        .iter()
        .zip(buckets)
        .map(|(segment, words)| TranscriptSegment {
            start: segment.start,
            end: segment.end,
            text: segment.text.clone(),
            words: Some(words),
        })
        .collect()
}

fn nearest_segment(segments: &[TranscriptSegment], midpoint: f32) -> usize {
    let mut best = 0;
    let mut best_distance = f32::MAX;
    for (i, segment) in segments.iter().enumerate() {
        let distance = if midpoint < segment.start {
            segment.start - midpoint
        } else {
            midpoint - segment.end
        };
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best
}
