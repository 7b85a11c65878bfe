use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The caller passed input the pipeline cannot work with. Never retried.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An embedding or relevance model could not be loaded or invoked.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// The external generation service kept failing after bounded retries.
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// No context chunks were supplied, so there is nothing to answer from.
    #[error("No context available to answer from")]
    EmptyContext,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Index error: {0}")]
    Index(String),
}

pub type Result<T> = std::result::Result<T, Error>;
