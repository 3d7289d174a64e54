use std::path::Path;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::error::PredictError;
use crate::{TranscribeOptions, Transcript, TranscriptSegment, TranscriptionEngine};

#[derive(Debug, Clone, PartialEq)]
pub struct WhisperModelParams {
    /// Language the model is pinned to for the process lifetime.
    pub language: String,
    pub use_gpu: bool,
    pub gpu_device: i32,
}

impl Default for WhisperModelParams {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            use_gpu: true,
            gpu_device: 0,
        }
    }
}

/// Transcription engine holding a long-lived whisper.cpp context.
///
/// The context is loaded once and shared across calls; everything per-call
/// (decode params, prompt, scratch state) is built fresh inside
/// `transcribe` and dropped when it returns, so calls do not observe each
/// other and per-inference buffers are released every time.
pub struct WhisperEngine {
    context: WhisperContext,
    language: String,
}

impl WhisperEngine {
    pub fn load(model_path: &Path, params: WhisperModelParams) -> Result<Self, PredictError> {
        let path_str = model_path
            .to_str()
            .ok_or_else(|| PredictError::model_load(model_path, "path is not valid UTF-8"))?;

        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(params.use_gpu);
        ctx_params.gpu_device(params.gpu_device);

        let context = WhisperContext::new_with_params(path_str, ctx_params)
            .map_err(|e| PredictError::model_load(model_path, e))?;

        log::info!(
            "loaded transcription model from {} (language={})",
            model_path.display(),
            params.language
        );

        Ok(Self {
            context,
            language: params.language,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl TranscriptionEngine for WhisperEngine {
    fn transcribe(
        &self,
        samples: &[f32],
        options: &TranscribeOptions,
    ) -> Result<Transcript, PredictError> {
        if samples.is_empty() {
            return Err(PredictError::invalid_audio("empty sample buffer"));
        }

        let mut state = self
            .context
            .create_state()
            .map_err(|e| PredictError::inference("transcription", e))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(&self.language));
        params.set_translate(false);
        params.set_n_threads(decode_threads(options.batch_size));
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        if let Some(prompt) = options.initial_prompt.as_deref() {
            if !prompt.is_empty() {
                params.set_initial_prompt(prompt);
            }
        }

        state
            .full(params, samples)
            .map_err(|e| PredictError::inference("transcription", e))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| PredictError::inference("transcription", e))?;

        let mut segments = Vec::with_capacity(num_segments as usize);
        for i in 0..num_segments {
            let text = state
                .full_get_segment_text(i)
                .map_err(|e| PredictError::inference("transcription", e))?;
            let t0 = state
                .full_get_segment_t0(i)
                .map_err(|e| PredictError::inference("transcription", e))?;
            let t1 = state
                .full_get_segment_t1(i)
                .map_err(|e| PredictError::inference("transcription", e))?;

            segments.push(TranscriptSegment {
                // Segment timestamps are in centiseconds.
                start: t0 as f32 / 100.0,
                end: t1 as f32 / 100.0,
                text: text.trim().to_string(),
                words: None,
            });
        }

        Ok(Transcript {
            language: self.language.clone(),
            segments,
        })
    }
}

/// Maps the caller's parallelism knob onto decode threads. Unbounded above
/// by contract, so only the machine clamps it.
fn decode_threads(batch_size: u32) -> i32 {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (batch_size.max(1) as usize).min(cores) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_threads_at_least_one() {
        assert!(decode_threads(0) >= 1);
        assert!(decode_threads(1) >= 1);
    }

    #[test]
    fn decode_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1) as i32;
        assert!(decode_threads(32) <= cores);
        assert!(decode_threads(10_000) <= cores);
    }

    #[test]
    fn load_fails_for_missing_model() {
        let result = WhisperEngine::load(
            Path::new("/nonexistent/ggml-large-v2.bin"),
            WhisperModelParams::default(),
        );
        assert!(result.is_err());
        assert!(result.err().map(|e| e.is_setup_fatal()).unwrap_or(false));
    }
}
