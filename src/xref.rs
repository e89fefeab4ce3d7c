//! Cross-reference table reader.
//!
//! Reads the traditional xref section and trailer of a produced file
//! back, so the recorded offsets can be checked against the bytes they
//! index.

use std::collections::BTreeMap;
use std::io::{Read, Seek, SeekFrom};

use crate::error::{Error, Result};
use crate::object::ObjectRef;

/// Cross-reference table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRefEntry {
    /// Byte offset of the object (next free object number for free entries)
    pub offset: u64,
    /// Generation number
    pub generation: u16,
    /// Whether the object is in use
    pub in_use: bool,
}

impl XRefEntry {
    /// Create a new cross-reference entry.
    pub fn new(offset: u64, generation: u16, in_use: bool) -> Self {
        Self {
            offset,
            generation,
            in_use,
        }
    }
}

/// Trailer values this crate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Trailer {
    /// Declared `/Size`
    pub size: Option<u64>,
    /// Declared `/Root`
    pub root: Option<ObjectRef>,
}

/// Cross-reference table that maps object numbers to their locations.
#[derive(Debug, Clone, Default)]
pub struct CrossRefTable {
    entries: BTreeMap<u32, XRefEntry>,
    trailer: Trailer,
}

impl CrossRefTable {
    /// Create a new empty cross-reference table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to the cross-reference table.
    pub fn add_entry(&mut self, object_number: u32, entry: XRefEntry) {
        self.entries.insert(object_number, entry);
    }

    /// Get an entry by object number.
    pub fn get(&self, object_number: u32) -> Option<&XRefEntry> {
        self.entries.get(&object_number)
    }

    /// In-use entries in object-number order.
    pub fn in_use(&self) -> impl Iterator<Item = (u32, &XRefEntry)> + '_ {
        self.entries
            .iter()
            .filter(|(_, e)| e.in_use)
            .map(|(n, e)| (*n, e))
    }

    /// The parsed trailer.
    pub fn trailer(&self) -> &Trailer {
        &self.trailer
    }

    /// Get the number of entries in the table (free entries included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Find the byte offset of the xref table by scanning from the end of the file.
///
/// # Errors
///
/// Returns `Error::InvalidXref` if the "startxref" keyword is missing or
/// not followed by a number.
pub fn find_xref_offset<R: Read + Seek>(reader: &mut R) -> Result<u64> {
    let file_size = reader.seek(SeekFrom::End(0))?;

    // The pointer sits in the last few lines
    let read_size = std::cmp::min(1024, file_size);
    reader.seek(SeekFrom::End(-(read_size as i64)))?;

    let mut buf = Vec::new();
    reader.take(read_size).read_to_end(&mut buf)?;
    let content = String::from_utf8_lossy(&buf);

    let startxref_pos = content.rfind("startxref").ok_or(Error::InvalidXref)?;
    let after_keyword = &content[startxref_pos + "startxref".len()..];

    split_lines(after_keyword)
        .into_iter()
        .map(|line| line.trim().to_string())
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse::<u64>().ok())
        .ok_or(Error::InvalidXref)
}

/// Parse the xref section and trailer starting at `offset`.
///
/// # Errors
///
/// Returns `Error::InvalidXref` if the section does not start with the
/// `xref` keyword or contains malformed subsection headers or entries.
pub fn parse_xref<R: Read + Seek>(reader: &mut R, offset: u64) -> Result<CrossRefTable> {
    log::debug!("parse_xref: starting at offset {}", offset);
    reader.seek(SeekFrom::Start(offset))?;

    let mut content = Vec::new();
    reader.read_to_end(&mut content)?;
    let text = String::from_utf8_lossy(&content);
    let lines = split_lines(&text);

    let mut lines = lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty());
    if lines.next() != Some("xref") {
        return Err(Error::InvalidXref);
    }

    let mut xref = CrossRefTable::new();

    // Subsections until the trailer keyword
    loop {
        let header = lines.next().ok_or(Error::InvalidXref)?;
        if header.starts_with("trailer") {
            break;
        }

        let (start, count) = parse_pair::<u32, u32>(header)?;
        for i in 0..count {
            let line = lines.next().ok_or(Error::InvalidXref)?;
            let number = start.checked_add(i).ok_or(Error::InvalidXref)?;
            xref.add_entry(number, parse_entry(line)?);
        }
    }

    // Trailer dictionary, one key per line
    for line in lines {
        if line.starts_with(">>") {
            break;
        }
        if let Some(value) = line.strip_prefix("/Size") {
            xref.trailer.size = value.trim().parse().ok();
        } else if let Some(value) = line.strip_prefix("/Root") {
            xref.trailer.root = parse_reference(value.trim());
        }
    }

    log::debug!("parse_xref: read {} entries", xref.len());
    Ok(xref)
}

fn parse_pair<A: std::str::FromStr, B: std::str::FromStr>(line: &str) -> Result<(A, B)> {
    let mut parts = line.split_whitespace();
    let a = parts.next().and_then(|p| p.parse().ok());
    let b = parts.next().and_then(|p| p.parse().ok());
    match (a, b, parts.next()) {
        (Some(a), Some(b), None) => Ok((a, b)),
        _ => Err(Error::InvalidXref),
    }
}

/// Parse entry: "nnnnnnnnnn ggggg f/n"
fn parse_entry(line: &str) -> Result<XRefEntry> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 3 || parts[0].len() != 10 || parts[1].len() != 5 {
        log::warn!("Malformed xref entry: {:?}", line);
        return Err(Error::InvalidXref);
    }

    let offset: u64 = parts[0].parse().map_err(|_| Error::InvalidXref)?;
    let generation: u16 = parts[1].parse().map_err(|_| Error::InvalidXref)?;
    let in_use = match parts[2] {
        "n" => true,
        "f" => false,
        _ => return Err(Error::InvalidXref),
    };
    Ok(XRefEntry::new(offset, generation, in_use))
}

fn parse_reference(value: &str) -> Option<ObjectRef> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [id, gen, "R"] => Some(ObjectRef::new(id.parse().ok()?, gen.parse().ok()?)),
        _ => None,
    }
}

/// Split text into lines, accepting CR, LF and CRLF endings.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current_line));
            },
            '\n' => lines.push(std::mem::take(&mut current_line)),
            ch => current_line.push(ch),
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }
    lines
}
