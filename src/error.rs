use thiserror::Error;

#[derive(Debug, Error)]
pub enum SigError {
    #[error("DOM not available")]
    DomUnavailable,
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    #[error("Canvas context unavailable")]
    NoContext2d,
    #[error("Operation failed: {0}")]
    OpFailed(String),
    #[error("No signature preview to export")]
    PreviewUnavailable,
    #[error("Malformed data URL: {0}")]
    DataUrl(String),
    #[error("Base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Image codec failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error)
}
