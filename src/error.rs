//! Error types for the slide renderer

use thiserror::Error;

/// Result type alias for slide operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing, composing or writing a slide
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to launch the browser or open a tab
    #[error("Browser initialization failed: {0}")]
    InitializationError(String),

    /// The page could not be loaded or the selector matched nothing
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// The capture produced no pixels (hidden or zero-size element)
    #[error("Captured image is empty ({width}x{height}); check the page layout or selector")]
    InvalidCaptureError { width: u32, height: u32 },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode/encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_capture_message_points_at_layout() {
        let e = Error::InvalidCaptureError { width: 0, height: 12 };
        let msg = e.to_string();
        assert!(msg.contains("0x12"));
        assert!(msg.contains("layout"));
    }
}
