use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    /// Model weights could not be loaded. Fatal: the process must not
    /// become ready without both models.
    #[error("failed to load model at {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("invalid audio: {message}")]
    InvalidAudio { message: String },

    #[error("audio error while {context}: {source}")]
    Audio {
        context: &'static str,
        #[source]
        source: hound::Error,
    },

    /// Transcription or alignment failure from the inference backend.
    #[error("{context}: {message}")]
    Inference {
        context: &'static str,
        message: String,
    },

    #[error("failed to serialize result: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}

impl PredictError {
    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_audio(message: impl Into<String>) -> Self {
        Self::InvalidAudio {
            message: message.into(),
        }
    }

    pub(crate) fn audio(context: &'static str, source: hound::Error) -> Self {
        Self::Audio { context, source }
    }

    pub(crate) fn inference(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Inference {
            context,
            message: err.to_string(),
        }
    }

    /// True for errors that should prevent the process from becoming ready.
    /// Everything else is per-call; the serving harness may retry.
    pub fn is_setup_fatal(&self) -> bool {
        matches!(self, Self::ModelLoad { .. })
    }
}
