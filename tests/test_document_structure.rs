//! Integration tests for document structure and serialization.
//!
//! Tests object numbering, the page tree, resource lookup, text placement
//! and the byte-exact xref table and trailer.

use std::io::Cursor;

use pdf_folio::object::ObjectRef;
use pdf_folio::writer::{BuiltinFont, Document};
use pdf_folio::xref::{find_xref_offset, parse_xref};
use pdf_folio::{Error, Margins, WriterConfig};
use regex::bytes::Regex;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample_document() -> Document {
    let mut doc = Document::new();
    doc.add_font("F1", BuiltinFont::Courier);
    doc.add_font("F2", BuiltinFont::TimesRoman);
    doc.current_page()
        .set_font("F1")
        .println("Courier")
        .set_font("F2")
        .print("Times ")
        .print("Roman");
    doc.add_page().set_font("F1").set_font_size(14.0).println("Page two");
    doc
}

// =============================================================================
// PAGE TREE TESTS
// =============================================================================

mod page_tree_tests {
    use super::*;

    #[test]
    fn test_count_and_kids_follow_creation_order() {
        init_logging();
        for n in 1..=5 {
            let mut doc = Document::new();
            for _ in 1..n {
                doc.add_page();
            }
            assert_eq!(doc.page_count(), n);

            let bytes = doc.serialize();
            let re = Regex::new(r"/Count (\d+)\r\n/Kids \[([^\]]*)\]").unwrap();
            let caps = re.captures(&bytes).unwrap();
            let count: usize = std::str::from_utf8(&caps[1]).unwrap().parse().unwrap();
            assert_eq!(count, n);

            let expected: Vec<String> = doc.page_refs().iter().map(|r| r.to_string()).collect();
            assert_eq!(std::str::from_utf8(&caps[2]).unwrap(), expected.join(" "));

            let mut ids: Vec<u32> = doc.page_refs().iter().map(|r| r.id).collect();
            ids.dedup();
            assert_eq!(ids.len(), n);
        }
    }

    #[test]
    fn test_pages_are_interleaved_with_their_content() {
        let mut doc = Document::new();
        doc.add_page();
        doc.add_font("F1", BuiltinFont::Helvetica);
        doc.add_page();

        assert_eq!(
            doc.page_refs(),
            &[ObjectRef::new(5, 0), ObjectRef::new(7, 0), ObjectRef::new(10, 0)]
        );

        let bytes = doc.serialize();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("10 0 obj\r\n<<\r\n/Type /Page\r\n/Parent 2 0 R\r\n/Resources 4 0 R\r\n/Contents 11 0 R\r\n>>"));
    }

    #[test]
    fn test_first_objects_are_fixed() {
        let bytes = Document::new().serialize();
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("1 0 obj\r\n<<\r\n/Type /Catalog\r\n/Outlines 3 0 R\r\n/Pages 2 0 R\r\n>>\r\nendobj\r\n"));
        assert!(text.contains("3 0 obj\r\n<<\r\n/Type /Outlines\r\n/Count 0\r\n>>\r\nendobj\r\n"));
        assert!(text.contains("4 0 obj\r\n<<\r\n/ProcSet [/PDF]\r\n>>\r\nendobj\r\n"));
    }
}

// =============================================================================
// XREF TESTS
// =============================================================================

mod xref_tests {
    use super::*;

    #[test]
    fn test_every_offset_lands_on_its_header() {
        init_logging();
        let doc = sample_document();
        let bytes = doc.serialize();

        let mut cursor = Cursor::new(&bytes[..]);
        let xref_offset = find_xref_offset(&mut cursor).unwrap();
        let table = parse_xref(&mut cursor, xref_offset).unwrap();

        assert_eq!(table.len(), doc.object_count() + 1);
        assert_eq!(table.in_use().count(), doc.object_count());
        for (id, entry) in table.in_use() {
            let header = format!("{} 0 obj\r\n", id);
            let at = entry.offset as usize;
            assert!(bytes[at..].starts_with(header.as_bytes()), "object {} at {}", id, at);
        }
    }

    #[test]
    fn test_headers_found_in_body_match_xref() {
        let doc = sample_document();
        let (bytes, layout) = doc.serialize_with_layout();

        let re = Regex::new(r"(\d+) 0 obj\r\n").unwrap();
        let found: Vec<(u32, usize)> = re
            .captures_iter(&bytes)
            .map(|c| {
                let id = std::str::from_utf8(&c[1]).unwrap().parse().unwrap();
                (id, c.get(0).unwrap().start())
            })
            .collect();

        assert_eq!(found.len(), doc.object_count());
        for (index, (id, start)) in found.iter().enumerate() {
            assert_eq!(*id as usize, index + 1);
            assert_eq!(layout.offset_of(*id), Some(*start));
        }
    }

    #[test]
    fn test_trailer_declares_count_and_root() {
        let doc = sample_document();
        let bytes = doc.serialize();

        let mut cursor = Cursor::new(&bytes[..]);
        let offset = find_xref_offset(&mut cursor).unwrap();
        let table = parse_xref(&mut cursor, offset).unwrap();

        assert_eq!(table.trailer().size, Some(doc.object_count() as u64));
        assert_eq!(table.trailer().root, Some(doc.catalog_ref()));

        let tail = String::from_utf8_lossy(&bytes[offset as usize..]).to_string();
        let expected_head = format!("xref\r\n0 {}\r\n0000000000 65535 f\r\n", doc.object_count() + 1);
        assert!(tail.starts_with(&expected_head));
        assert!(tail.ends_with(&format!("startxref\r\n{}\r\n%%EOF\r\n", offset)));
    }

    #[test]
    fn test_serialize_twice_is_identical() {
        let doc = sample_document();
        assert_eq!(doc.serialize(), doc.serialize());
    }

    #[test]
    fn test_write_to_file() {
        let doc = sample_document();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        doc.write_to(&mut file).unwrap();

        let written = std::fs::read(file.path()).unwrap();
        assert_eq!(written, doc.serialize());
    }
}

// =============================================================================
// RESOURCE LOOKUP TESTS
// =============================================================================

mod resource_tests {
    use super::*;

    #[test]
    fn test_last_registered_font_wins() {
        init_logging();
        let mut doc = Document::new();
        doc.add_font("F1", BuiltinFont::Courier);
        let helvetica = doc.add_font("F1", BuiltinFont::Helvetica);

        let font_ref = doc.current_page().set_font("F1").font_ref();
        assert_eq!(font_ref, Some(helvetica));

        let text = String::from_utf8_lossy(&doc.serialize()).to_string();
        assert!(text.contains(&format!("/Font << /F1 {} >>", helvetica)));
    }

    #[test]
    fn test_invalid_builtin_registers_nothing() {
        let mut doc = Document::new();
        let before = doc.object_count();

        let err = doc.add_font_code("F1", 999).unwrap_err();
        assert!(matches!(err, Error::InvalidFontSelector(999)));
        assert_eq!(doc.object_count(), before);

        assert!(doc.add_font_code("F1", 0).is_err());
        assert!(doc.add_font_code("F1", 14).is_ok());
        assert_eq!(doc.object_count(), before + 1);
    }

    #[test]
    fn test_unknown_font_is_not_fatal() {
        let mut doc = Document::new();
        doc.add_font("F1", BuiltinFont::Courier);
        let mut page = doc.current_page();
        page.set_font("F1");
        let before = page.font_ref();
        page.set_font("Missing");
        assert_eq!(page.font_ref(), before);

        let strict = page.try_set_font("Missing").map(|_| ());
        assert!(matches!(strict, Err(Error::UnresolvedResource { .. })));
    }

    #[test]
    fn test_names_match_between_resources_and_content() {
        let mut doc = Document::new();
        let font = doc.add_font("My Font", BuiltinFont::Courier);
        let image = doc
            .add_image("a#b", &pdf_folio::writer::Raster::filled(2, 2, [0, 0, 0]))
            .unwrap();
        doc.current_page()
            .set_font("My Font")
            .println("x")
            .draw_image("a#b", 10.0, 10.0);

        let text = String::from_utf8_lossy(&doc.serialize()).to_string();
        assert!(text.contains(&format!("/Font << /My#20Font {} >>", font)));
        assert!(text.contains(&format!("/XObject << /a#23b {} >>", image)));
        assert!(text.contains("/My#20Font 10 Tf\r\n"));
        assert!(text.contains("/a#23b Do\r\n"));
        assert!(!text.contains("/My Font"));
    }

    #[test]
    fn test_symbol_font_keeps_builtin_encoding() {
        let mut doc = Document::new();
        doc.add_font("F1", BuiltinFont::Symbol);
        let font = doc.fonts()[0].clone();
        assert_eq!(font.builtin(), BuiltinFont::Symbol);

        let bytes = doc.serialize();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/BaseFont /Symbol\r\n>>"));
        assert!(!text.contains("/BaseFont /Symbol\r\n/Encoding"));
    }
}

// =============================================================================
// TEXT PLACEMENT TESTS
// =============================================================================

mod text_tests {
    use super::*;

    #[test]
    fn test_first_line_position() {
        let mut doc = Document::new();
        doc.current_page().output_text("X");

        let text = String::from_utf8_lossy(&doc.serialize()).to_string();
        assert!(text.contains("1 0 0 1 72 760 Tm\r\n(X) Tj\r\n"));
    }

    #[test]
    fn test_escaping_in_show_text() {
        let mut doc = Document::new();
        doc.current_page().println("(a)\\b");

        let text = String::from_utf8_lossy(&doc.serialize()).to_string();
        assert!(text.contains("(\\(a\\)\\\\b) Tj"));
    }

    #[test]
    fn test_content_stream_layout() {
        let mut doc = Document::new();
        doc.current_page()
            .set_colour(255, 0, 0)
            .draw_line(10.0, 10.0, 20.0, 20.0);

        let text = String::from_utf8_lossy(&doc.serialize()).to_string();
        let body = "BT\r\n/F1 10 Tf\r\n1 0 0 1 72 -29 Tm\r\n10 TL\r\n255 0 0 rg\r\n\r\nET\r\n\
                    10 10 m\r\n20 20 l\r\nS\r\n0.5 w\r\n";
        let framed = format!("<<\r\n/Length {}\r\n>>\r\nstream\r\n{}\r\nendstream\r\nendobj\r\n", body.len(), body);
        assert!(text.contains(&framed));
    }

    #[test]
    fn test_custom_margins_and_size() {
        let config = WriterConfig::new()
            .with_margins(Margins::uniform(36.0))
            .with_font_size(12.0);
        let mut doc = Document::with_config(config);
        let mut page = doc.current_page();
        page.println("a").print("bc");
        assert_eq!(page.cursor(), (24.0, 12.0));

        let text = String::from_utf8_lossy(&doc.serialize()).to_string();
        assert!(text.contains("1 0 0 1 36 794 Tm\r\n(a) Tj"));
        assert!(text.contains("1 0 0 1 36 782 Tm\r\n(bc) Tj"));
    }
}
