use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("index {index} is out of range (len: {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("the quiz has no questions")]
    EmptyPlan,
    #[error("invalid question \"{prompt}\": {reason}")]
    InvalidQuestion { prompt: String, reason: String },
    #[error("random source returned an invalid permutation of {len} items")]
    InvalidPermutation { len: usize },
    #[error("the quiz is already completed")]
    SessionCompleted,
}

/// Failure of an external content source. Never leaves `content::load_with_fallback`.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("unable to read content: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed content: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("content source is missing: {0}")]
    Missing(String),
}
