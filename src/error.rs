//! Error types for certificate generation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, CertError>;

/// Errors that abort a certificate generation call.
///
/// None of these are retried; the caller gets the first failure and no
/// output file is left behind.
#[derive(Error, Debug)]
pub enum CertError {
    /// The verification URL could not be encoded, or the recoloured
    /// bitmap could not be produced.
    #[error("QR generation failed: {0}")]
    QrGeneration(String),

    /// A template image is configured but the path does not exist.
    #[error("template image not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The template exists but could not be read or decoded.
    #[error("template image unusable: {0}")]
    TemplateImage(String),

    /// Writing the finished document failed.
    #[error("PDF save failed for {}: {source}", .path.display())]
    PdfWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
