//! PDF writing module.
//!
//! ## Architecture
//!
//! ```text
//! Document (owns everything, hands out object numbers)
//!     ├── ObjectRegistry   registration order = write order
//!     ├── Catalog, PageTree, Outlines
//!     ├── Resources        Fonts + Images, looked up by name
//!     └── Page[]           each with its own Content
//!     ↓
//! [PdfWriter] (header, objects, xref, trailer)
//!     ↓
//! [ObjectSerializer] (Object → bytes)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Example
//!
//! ```
//! use pdf_folio::writer::{BuiltinFont, Document};
//!
//! let mut doc = Document::new();
//! doc.add_font("F1", BuiltinFont::Courier);
//! doc.current_page().set_font("F1").println("Hello, World!");
//!
//! let bytes = doc.serialize();
//! assert!(bytes.starts_with(b"%PDF-1.2\r\n"));
//! ```

mod content_stream;
mod document;
mod font_manager;
mod image_handler;
mod object_serializer;
mod page;
mod pdf_writer;
mod registry;
mod resources;
mod structure;

pub use content_stream::{Buffer, Content, ContentStreamOp};
pub use document::Document;
pub use font_manager::{BuiltinFont, Font};
pub use image_handler::{
    EncodedImage, Image, ImageBytes, ImageError, ImageFile, Raster, RasterSource,
};
pub use object_serializer::ObjectSerializer;
pub use page::{Page, PageWriter};
pub use pdf_writer::{PdfWriter, XrefLayout};
pub use registry::{ObjectRegistry, RegistryEntry};
pub use resources::Resources;
pub use structure::{Catalog, Outlines, PageTree};

use crate::object::{Object, ObjectRef};

/// An entity written as one numbered indirect object.
pub trait IndirectObject {
    /// The number this entity was registered under.
    fn object_ref(&self) -> ObjectRef;

    /// Lower the entity into an object value for the serializer.
    fn to_object(&self) -> Object;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _serializer = ObjectSerializer::new();
        let _registry = ObjectRegistry::new();
        let _doc = Document::new();
    }
}
