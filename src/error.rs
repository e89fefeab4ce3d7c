//! Error types for the PDF writer.
//!
//! This module defines all error types that can occur while assembling a
//! document, reading a produced file back, or decoding stream payloads.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of named resource a page can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A font registered with `add_font`
    Font,
    /// An image registered with `add_image`
    Image,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Font => write!(f, "font"),
            ResourceKind::Image => write!(f, "image"),
        }
    }
}

/// Error types that can occur while building or verifying a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Built-in font selector outside the 14 standard faces
    #[error("Invalid font selector {0}: expected a value between 1 and 14")]
    InvalidFontSelector(u32),

    /// The raster decoder could not produce pixels
    #[error("Image source unreadable: {0}")]
    ImageSourceUnreadable(String),

    /// A page referred to a resource name that was never registered
    #[error("Unresolved {kind} reference: /{name}")]
    UnresolvedResource {
        /// Resource category that was searched
        kind: ResourceKind,
        /// Symbolic name that did not match
        name: String,
    },

    /// Stream decoding error
    #[error("Stream decoding error: {0}")]
    Decode(String),

    /// Unsupported stream filter
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// Invalid cross-reference section
    #[error("Invalid cross-reference table")]
    InvalidXref,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
