use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider timed out after {0}s")]
    Timeout(u64),

    #[error("provider returned an unexpected payload: {0}")]
    UnexpectedPayload(String),

    #[error("missing secret: environment variable {0} is not set")]
    MissingSecret(String),

    #[error("ocr binary '{0}' not found on PATH")]
    OcrMissing(String),

    #[error("ocr failed: {0}")]
    Ocr(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AssembleError {
    /// Input failed pre-flight screening; no provider call was made.
    #[error(transparent)]
    Input(#[from] ralph_core::RalphError),

    /// The provider was unreachable, timed out, or failed at the transport
    /// level. Retryable by the caller.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider responded, but its output failed schema validation even
    /// after the bounded repair attempts. `raw` carries the last completion
    /// for manual inspection.
    #[error("provider output failed validation after {attempts} attempt(s): {defects}")]
    Malformed {
        attempts: u32,
        defects: String,
        raw: String,
    },
}
