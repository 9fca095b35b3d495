use thiserror::Error;

/// All errors produced by voxseg-core.
#[derive(Debug, Error)]
pub enum VoxsegError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("not enough samples: need at least {needed}, got {got}")]
    InsufficientInput { needed: usize, got: usize },

    #[error("inference error: {0}")]
    Inference(String),

    #[error("speech end event with no pending start")]
    UnexpectedSpeechEnd,

    #[error("ONNX session error: {0}")]
    OnnxSession(String),

    #[error("model file not found: {path}")]
    ModelNotFound { path: std::path::PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VoxsegError>;
