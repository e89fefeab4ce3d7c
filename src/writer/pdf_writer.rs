//! PDF document writer.
//!
//! Writes a complete document in one linear pass: header, every
//! registered object in registration order, the xref table and the
//! trailer. Offsets are taken from the output length immediately before
//! each object is appended, so they are exact by construction.

use super::document::Document;
use super::object_serializer::ObjectSerializer;
use crate::config::EOL;
use crate::object::Object;

/// Comment bytes after the header telling readers the file is binary.
const BINARY_MARKER: &[u8] = b"%\xE2\xE3\xCF\xD3";

/// Byte positions recorded while writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefLayout {
    /// Offset of object `n` at index `n - 1`
    pub offsets: Vec<usize>,
    /// Offset of the `xref` keyword
    pub xref_offset: usize,
}

impl XrefLayout {
    /// Offset of an object by number.
    pub fn offset_of(&self, id: u32) -> Option<usize> {
        (id as usize)
            .checked_sub(1)
            .and_then(|index| self.offsets.get(index))
            .copied()
    }
}

/// Single-pass serializer for a [`Document`].
pub struct PdfWriter<'a> {
    document: &'a Document,
    serializer: ObjectSerializer,
}

impl<'a> PdfWriter<'a> {
    /// Create a writer over a document. Writing never mutates it.
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            serializer: ObjectSerializer::new(),
        }
    }

    /// Produce the file bytes.
    pub fn finish(&self) -> Vec<u8> {
        self.write().0
    }

    /// Produce the file bytes together with the recorded offsets.
    pub fn write(&self) -> (Vec<u8>, XrefLayout) {
        let mut output = Vec::new();

        // PDF Header
        push(&mut output, &format!("%PDF-{}{}", self.document.config().version, EOL));
        output.extend_from_slice(BINARY_MARKER);
        push(&mut output, EOL);

        let registry = self.document.registry();
        let mut offsets = Vec::with_capacity(registry.len());

        for (obj_ref, entry) in registry.iter() {
            let offset = output.len();
            offsets.push(offset);
            log::trace!("Object {} ({:?}) at offset {}", obj_ref.id, entry, offset);

            let obj = match self.document.resolve(entry) {
                Some(entity) => entity.to_object(),
                None => {
                    log::warn!("No entity behind object {}; writing null", obj_ref.id);
                    Object::Null
                },
            };
            output.extend_from_slice(&self.serializer.serialize_indirect(obj_ref.id, obj_ref.gen, &obj));
        }

        // Write xref table
        let xref_offset = output.len();
        push(&mut output, "xref");
        push(&mut output, EOL);
        push(&mut output, &format!("0 {}{}", offsets.len() + 1, EOL));

        // Object 0 is always free
        push(&mut output, "0000000000 65535 f");
        push(&mut output, EOL);
        for offset in &offsets {
            push(&mut output, &format!("{:010} 00000 n{}", offset, EOL));
        }

        // Write trailer
        let trailer = ObjectSerializer::dict(vec![
            ("Size", ObjectSerializer::integer(offsets.len() as i64)),
            ("Root", ObjectSerializer::reference(self.document.catalog_ref())),
        ]);
        push(&mut output, "trailer");
        push(&mut output, EOL);
        output.extend_from_slice(&self.serializer.serialize(&trailer));
        push(&mut output, EOL);
        push(&mut output, "startxref");
        push(&mut output, EOL);
        push(&mut output, &format!("{}{}", xref_offset, EOL));
        push(&mut output, "%%EOF");
        push(&mut output, EOL);

        log::debug!(
            "Wrote {} objects, {} bytes, xref at {}",
            offsets.len(),
            output.len(),
            xref_offset
        );

        (
            output,
            XrefLayout {
                offsets,
                xref_offset,
            },
        )
    }
}

fn push(w: &mut Vec<u8>, s: &str) {
    w.extend_from_slice(s.as_bytes());
}
