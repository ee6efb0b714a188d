use thiserror::Error;

#[derive(Error, Debug)]
pub enum TilerError {
    #[error("Invalid resampling method: {0} (expected nearest, bilinear, bicubic or lanczos)")]
    InvalidResampling(String),

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Pyramid level {size} yields a zero step (step = size / {divisor})")]
    DegeneratePyramidLevel { size: u32, divisor: u32 },

    #[error("Invalid target size: {0}")]
    InvalidTargetSize(u32),

    #[error("Failed to load input: {0}")]
    LoadError(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Document contains no page images")]
    EmptyDocument,

    #[error("Failed to save image: {0}")]
    SaveError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Unwrap the only result produced by a sequence operation called with one input
pub(crate) fn single<T>(results: Vec<T>) -> Result<T, TilerError> {
    results
        .into_iter()
        .next()
        .ok_or_else(|| TilerError::Internal("expected one result for one input".to_string()))
}
