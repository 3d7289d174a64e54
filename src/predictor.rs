use std::path::Path;

use crate::audio;
use crate::config::PredictorConfig;
use crate::engines::{WhisperAligner, WhisperEngine, WhisperModelParams};
use crate::error::PredictError;
use crate::memory::{format_gib, PeakMemorySampler};
use crate::{TranscribeOptions, TranscriptionEngine, WordAligner};

/// Per-call prediction options. Defaults mirror the serving contract:
/// batch size 32, no alignment, no prompt, no diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictOptions {
    /// Transcription parallelism.
    pub batch_size: u32,
    /// Refine segment timestamps into word-level timing.
    pub align_output: bool,
    /// Seed text for the first decoding window, passed through verbatim.
    pub initial_prompt: Option<String>,
    /// Print a peak-memory diagnostic line after inference.
    pub debug: bool,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            batch_size: 32,
            align_output: false,
            initial_prompt: None,
            debug: false,
        }
    }
}

/// Single-prediction interface over a transcription engine and a word
/// aligner, both loaded once for the process lifetime.
///
/// Generic over the two trait seams so the orchestration can be exercised
/// with stub engines in tests; production code uses [`Predictor::load`].
pub struct Predictor<E = WhisperEngine, A = WhisperAligner> {
    engine: E,
    aligner: A,
}

impl Predictor {
    /// Setup phase. Loads both models; any failure here is fatal and the
    /// process must not start serving.
    pub fn load(config: &PredictorConfig) -> Result<Self, PredictError> {
        let engine = WhisperEngine::load(
            &config.model_path,
            WhisperModelParams {
                language: config.language.clone(),
                use_gpu: config.use_gpu,
                gpu_device: config.gpu_device,
            },
        )?;
        let aligner = WhisperAligner::load(&config.align_model_path, &config.language)?;
        Ok(Self { engine, aligner })
    }
}

impl<E: TranscriptionEngine, A: WordAligner> Predictor<E, A> {
    pub fn with_parts(engine: E, aligner: A) -> Self {
        Self { engine, aligner }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Run one prediction on an audio file and return the segment sequence
    /// serialized as JSON. No retries; errors propagate to the caller.
    pub fn predict(&self, audio_path: &Path, options: &PredictOptions) -> Result<String, PredictError> {
        let samples = audio::read_wav_samples(audio_path)?;
        self.predict_samples(&samples, options)
    }

    /// Same as [`predict`](Self::predict) for already-decoded samples.
    pub fn predict_samples(
        &self,
        samples: &[f32],
        options: &PredictOptions,
    ) -> Result<String, PredictError> {
        let sampler = options.debug.then(PeakMemorySampler::start);

        let transcribe_options = TranscribeOptions {
            batch_size: options.batch_size,
            initial_prompt: options.initial_prompt.clone(),
        };
        let transcript = self.engine.transcribe(samples, &transcribe_options)?;
        log::debug!(
            "transcribed {:.1}s of audio into {} segments (language={})",
            audio::duration_secs(samples),
            transcript.segments.len(),
            transcript.language
        );

        let segments = if options.align_output {
            self.aligner.align(&transcript.segments, samples)?.segments
        } else {
            transcript.segments
        };

        if let Some(sampler) = sampler {
            let peak = sampler.stop();
            println!(
                "max memory reserved over inference: {} GiB",
                format_gib(peak)
            );
        }

        Ok(serde_json::to_string(&segments)?)
    }
}
