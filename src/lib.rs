// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::new_without_default)]

//! # PDF Folio
//!
//! Builds small PDF documents from scratch and writes them in one pass.
//!
//! ## Core Features
//!
//! - **Object model**: typed catalog, page tree, pages, content streams,
//!   fonts and images, numbered in registration order
//! - **Content streams**: text with a simple cursor, lines, boxes, colour
//!   and image placement on a 595×842 canvas
//! - **Fonts**: the 14 standard Type 1 faces
//! - **Images**: RGB rasters compressed with Flate and wrapped in ASCII85
//! - **Serializer**: byte-exact xref table and trailer
//! - **Read-back**: xref parser and stream decoders to verify the output
//!
//! ## Quick Start
//!
//! ```
//! use pdf_folio::writer::{BuiltinFont, Document, Raster};
//!
//! # fn main() -> pdf_folio::Result<()> {
//! let mut doc = Document::new();
//! doc.add_font("F1", BuiltinFont::Helvetica);
//! doc.add_image("dot", &Raster::filled(4, 4, [200, 30, 30]))?;
//!
//! doc.current_page()
//!     .set_font("F1")
//!     .println("Hello, World!")
//!     .draw_box(72.0, 600.0, 200.0, 100.0)
//!     .draw_image("dot", 300.0, 400.0);
//!
//! let bytes = doc.serialize();
//! assert!(bytes.ends_with(b"%%EOF\r\n"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Core object model
pub mod config;
pub mod object;

// Stream filters
pub mod decoders;
pub mod encoders;

// Reading produced files back
pub mod xref;

// PDF writing
pub mod writer;

pub use config::{Margins, WriterConfig};
pub use error::{Error, Result};
pub use object::{Object, ObjectRef};
pub use writer::{BuiltinFont, Document, PageWriter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
