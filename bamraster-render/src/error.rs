use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid interval: end ({end}) is before start ({start})")]
    InvalidInterval { start: i64, end: i64 },
    #[error("image width must be positive")]
    ZeroWidth,
    #[error("image too large: {width}x{height}")]
    TooLarge { width: u32, height: u64 },
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("alignment source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
