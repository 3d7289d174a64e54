pub mod align;
pub mod whisper;

pub use align::{AlignMetadata, WhisperAligner};
pub use whisper::{WhisperEngine, WhisperModelParams};
