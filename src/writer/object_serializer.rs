//! PDF object serialization.
//!
//! Serializes PDF objects to their byte representation. Top-level
//! dictionaries put one entry per line; nested dictionaries are written
//! inline. Every line ends with `\r\n`.

use crate::config::EOL;
use crate::object::{Dictionary, Object, ObjectRef};

/// Serializer for PDF objects.
///
/// Converts PDF Object types to their byte representation following
/// the ISO 32000-1 syntax rules. Writing happens into an
/// in-memory buffer, so no method can fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    /// Create a new object serializer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize an object to bytes.
    pub fn serialize(&self, obj: &Object) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj, 0);
        buf
    }

    /// Serialize an object to a string (for debugging).
    pub fn serialize_to_string(&self, obj: &Object) -> String {
        String::from_utf8_lossy(&self.serialize(obj)).to_string()
    }

    /// Serialize an indirect object definition.
    ///
    /// Format: `{id} {gen} obj\r\n{object}\r\nendobj\r\n`
    pub fn serialize_indirect(&self, id: u32, gen: u16, obj: &Object) -> Vec<u8> {
        let mut buf = Vec::new();
        push(&mut buf, &format!("{} {} obj{}", id, gen, EOL));
        self.write_object(&mut buf, obj, 0);
        push(&mut buf, EOL);
        push(&mut buf, "endobj");
        push(&mut buf, EOL);
        buf
    }

    /// Write an object to a buffer.
    fn write_object(&self, w: &mut Vec<u8>, obj: &Object, depth: usize) {
        match obj {
            Object::Null => push(w, "null"),
            Object::Boolean(b) => push(w, if *b { "true" } else { "false" }),
            Object::Integer(i) => push(w, &i.to_string()),
            Object::Real(r) => self.write_real(w, *r),
            Object::String(s) => self.write_string(w, s),
            Object::Name(n) => self.write_name(w, n),
            Object::Array(arr) => self.write_array(w, arr, depth),
            Object::Dictionary(dict) => self.write_dictionary(w, dict, depth),
            Object::Stream { dict, data } => self.write_stream(w, dict, data, depth),
            Object::Reference(r) => push(w, &r.to_string()),
        }
    }

    /// Write a real number, trimming trailing zeros.
    fn write_real(&self, w: &mut Vec<u8>, value: f64) {
        if value.fract() == 0.0 {
            push(w, &(value as i64).to_string());
        } else {
            let formatted = format!("{:.5}", value);
            push(w, formatted.trim_end_matches('0').trim_end_matches('.'));
        }
    }

    /// Write a literal string, escaping delimiters and backslashes.
    fn write_string(&self, w: &mut Vec<u8>, data: &[u8]) {
        w.push(b'(');
        for &byte in data {
            match byte {
                b'(' | b')' | b'\\' => w.extend_from_slice(&[b'\\', byte]),
                _ => w.push(byte),
            }
        }
        w.push(b')');
    }

    /// Write a PDF name.
    fn write_name(&self, w: &mut Vec<u8>, name: &str) {
        w.push(b'/');
        push(w, &escape_name(name));
    }

    /// Write a PDF array.
    fn write_array(&self, w: &mut Vec<u8>, arr: &[Object], depth: usize) {
        w.push(b'[');
        for (i, obj) in arr.iter().enumerate() {
            if i > 0 {
                w.push(b' ');
            }
            self.write_object(w, obj, depth + 1);
        }
        w.push(b']');
    }

    /// Write a PDF dictionary in insertion order.
    fn write_dictionary(&self, w: &mut Vec<u8>, dict: &Dictionary, depth: usize) {
        if depth == 0 {
            push(w, "<<");
            push(w, EOL);
            for (key, value) in dict {
                self.write_name(w, key);
                w.push(b' ');
                self.write_object(w, value, depth + 1);
                push(w, EOL);
            }
            push(w, ">>");
        } else {
            push(w, "<< ");
            for (key, value) in dict {
                self.write_name(w, key);
                w.push(b' ');
                self.write_object(w, value, depth + 1);
                w.push(b' ');
            }
            push(w, ">>");
        }
    }

    /// Write a PDF stream.
    ///
    /// `/Length` always reflects the exact number of bytes between the
    /// `stream` and `endstream` line terminators.
    fn write_stream(&self, w: &mut Vec<u8>, dict: &Dictionary, data: &[u8], depth: usize) {
        let mut dict_with_length = dict.clone();
        dict_with_length.insert("Length".to_string(), Object::Integer(data.len() as i64));

        self.write_dictionary(w, &dict_with_length, depth);
        push(w, EOL);
        push(w, "stream");
        push(w, EOL);
        w.extend_from_slice(data);
        push(w, EOL);
        push(w, "endstream");
    }
}

fn push(w: &mut Vec<u8>, s: &str) {
    w.extend_from_slice(s.as_bytes());
}

/// Escape the body of a PDF name (without the leading `/`).
///
/// Regular characters pass through; whitespace, delimiters, `#` and
/// non-ASCII bytes become `#xx`. Dictionaries and content stream
/// operators both go through here so a resource name is spelled the same
/// way in each.
pub(crate) fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'!'
            | b'"'
            | b'$'..=b'&'
            | b'\''
            | b'*'..=b'.'
            | b'0'..=b'9'
            | b';'
            | b'='
            | b'?'
            | b'@'
            | b'A'..=b'Z'
            | b'^'..=b'z'
            | b'|'
            | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("#{:02X}", byte)),
        }
    }
    out
}

/// Helper functions for building PDF objects.
impl ObjectSerializer {
    /// Create a Name object.
    pub fn name(s: &str) -> Object {
        Object::Name(s.to_string())
    }

    /// Create an Integer object.
    pub fn integer(i: i64) -> Object {
        Object::Integer(i)
    }

    /// Create an Array object.
    pub fn array(items: Vec<Object>) -> Object {
        Object::Array(items)
    }

    /// Create a Dictionary object, keeping the given entry order.
    pub fn dict(entries: Vec<(&str, Object)>) -> Object {
        Object::Dictionary(Self::dict_entries(entries))
    }

    /// Build the raw dictionary map, keeping the given entry order.
    pub fn dict_entries(entries: Vec<(&str, Object)>) -> Dictionary {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// Create a Reference object.
    pub fn reference(r: ObjectRef) -> Object {
        Object::Reference(r)
    }

    /// Create a rectangle array [x, y, width, height] -> [llx, lly, urx, ury].
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Object {
        Object::Array(vec![
            Object::Real(x),
            Object::Real(y),
            Object::Real(x + width),
            Object::Real(y + height),
        ])
    }
}
