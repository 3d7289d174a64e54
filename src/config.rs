use std::path::PathBuf;

/// Environment variable naming the cache directory for transcription
/// model weights. Read before any model is loaded.
pub const MODEL_DIR_ENV: &str = "RELAY_SPEECH_MODEL_DIR";
/// Environment variable naming the cache directory for alignment model
/// weights.
pub const ALIGN_DIR_ENV: &str = "RELAY_SPEECH_ALIGN_DIR";

const DEFAULT_MODEL_DIR: &str = "models";
const DEFAULT_MODEL_FILE: &str = "ggml-large-v2.bin";
const DEFAULT_ALIGN_FILE: &str = "ggml-tiny.en.bin";

/// Setup-phase configuration. Fixed for the process lifetime: the models,
/// language, and device are chosen once and never reloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorConfig {
    /// GGML weights for the transcription model.
    pub model_path: PathBuf,
    /// GGML weights for the word-alignment model.
    pub align_model_path: PathBuf,
    /// Language both models are pinned to.
    pub language: String,
    pub use_gpu: bool,
    pub gpu_device: i32,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_DIR).join(DEFAULT_MODEL_FILE),
            align_model_path: PathBuf::from(DEFAULT_MODEL_DIR).join(DEFAULT_ALIGN_FILE),
            language: "en".to_string(),
            use_gpu: true,
            gpu_device: 0,
        }
    }
}

impl PredictorConfig {
    /// Resolve model files under the two env-configured cache directories,
    /// falling back to `models/` when a variable is unset.
    pub fn from_env() -> Self {
        let model_dir = std::env::var(MODEL_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_DIR));
        let align_dir = std::env::var(ALIGN_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_DIR));

        Self {
            model_path: model_dir.join(DEFAULT_MODEL_FILE),
            align_model_path: align_dir.join(DEFAULT_ALIGN_FILE),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_pins_english_and_gpu_zero() {
        let config = PredictorConfig::default();
        assert_eq!(config.language, "en");
        assert!(config.use_gpu);
        assert_eq!(config.gpu_device, 0);
        assert!(config.model_path.ends_with("ggml-large-v2.bin"));
        assert!(config.align_model_path.ends_with("ggml-tiny.en.bin"));
    }

    #[test]
    fn from_env_falls_back_to_models_dir() {
        // Only checks the fallback shape; env-var overrides are process-wide
        // and not exercised here to keep tests independent.
        let config = PredictorConfig::from_env();
        assert!(config.model_path.to_string_lossy().contains("ggml-large-v2.bin"));
    }
}
