//! PDF content stream for one page.
//!
//! A page's drawing program is kept in three append-only buffers of
//! operators (ISO 32000-1 Sections 8-9):
//! - text: font selection, positioning and shown strings (inside `BT`/`ET`)
//! - lines: path construction, stroked once at the end
//! - graphics: image painting and state changes
//!
//! Rendering concatenates them as
//! `BT`, text, `ET`, lines, `S`, graphics, with `\r\n` after every operator.

use std::fmt::Write;

use super::IndirectObject;
use super::object_serializer::{escape_name, ObjectSerializer};
use crate::config::{WriterConfig, EOL};
use crate::object::{Object, ObjectRef};

/// Vertical offset of the text matrix set by the page preamble.
const PREAMBLE_TEXT_RISE: f32 = -29.0;

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font and size (Tf)
    SetFont(String, f32),
    /// Set text matrix (Tm)
    SetTextMatrix(f32, f32, f32, f32, f32, f32),
    /// Show text (Tj) - literal string
    ShowText(String),
    /// Set text leading (TL)
    SetTextLeading(f32),
    /// Set fill color RGB (rg)
    SetFillColorRGB(f32, f32, f32),
    /// Set line width (w)
    SetLineWidth(f32),
    /// Move to (m)
    MoveTo(f32, f32),
    /// Line to (l)
    LineTo(f32, f32),
    /// Rectangle (re)
    Rectangle(f32, f32, f32, f32),
    /// Stroke (S)
    Stroke,
    /// Paint XObject (Do)
    PaintXObject(String),
}

impl std::fmt::Display for ContentStreamOp {
    fn fmt(&self, w: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentStreamOp::SaveState => write!(w, "q"),
            ContentStreamOp::RestoreState => write!(w, "Q"),
            ContentStreamOp::Transform(a, b, c, d, e, f) => {
                write!(w, "{} {} {} {} {} {} cm", a, b, c, d, e, f)
            },
            ContentStreamOp::BeginText => write!(w, "BT"),
            ContentStreamOp::EndText => write!(w, "ET"),
            ContentStreamOp::SetFont(name, size) => {
                write!(w, "/{} {} Tf", escape_name(name), size)
            },
            ContentStreamOp::SetTextMatrix(a, b, c, d, e, f) => {
                write!(w, "{} {} {} {} {} {} Tm", a, b, c, d, e, f)
            },
            ContentStreamOp::ShowText(text) => {
                write!(w, "(")?;
                write_escaped_string(w, text)?;
                write!(w, ") Tj")
            },
            ContentStreamOp::SetTextLeading(leading) => write!(w, "{} TL", leading),
            ContentStreamOp::SetFillColorRGB(r, g, b) => write!(w, "{} {} {} rg", r, g, b),
            ContentStreamOp::SetLineWidth(width) => write!(w, "{} w", width),
            ContentStreamOp::MoveTo(x, y) => write!(w, "{} {} m", x, y),
            ContentStreamOp::LineTo(x, y) => write!(w, "{} {} l", x, y),
            ContentStreamOp::Rectangle(x, y, width, height) => {
                write!(w, "{} {} {} {} re", x, y, width, height)
            },
            ContentStreamOp::Stroke => write!(w, "S"),
            ContentStreamOp::PaintXObject(name) => write!(w, "/{} Do", escape_name(name)),
        }
    }
}

/// Escape the string delimiters and the escape character itself.
///
/// Every other character is written as-is.
fn write_escaped_string<W: Write>(w: &mut W, text: &str) -> std::fmt::Result {
    for ch in text.chars() {
        match ch {
            '(' => w.write_str("\\(")?,
            ')' => w.write_str("\\)")?,
            '\\' => w.write_str("\\\\")?,
            _ => w.write_char(ch)?,
        }
    }
    Ok(())
}

/// Which of the three buffers an operator goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
    /// Text operators, inside the `BT`/`ET` block
    Text,
    /// Path construction, stroked by the trailing `S`
    Lines,
    /// Everything painted after the stroke
    Graphics,
}

/// The drawing program of a single page.
#[derive(Debug, Clone)]
pub struct Content {
    obj_ref: ObjectRef,
    text: Vec<ContentStreamOp>,
    lines: Vec<ContentStreamOp>,
    graphics: Vec<ContentStreamOp>,
}

impl Content {
    /// Create a content stream with the page preamble already applied.
    pub(crate) fn new(obj_ref: ObjectRef, config: &WriterConfig) -> Self {
        let mut content = Self::empty(obj_ref);
        content.push(
            Buffer::Text,
            ContentStreamOp::SetFont(config.default_font.clone(), config.font_size),
        );
        content.push(
            Buffer::Text,
            ContentStreamOp::SetTextMatrix(
                1.0,
                0.0,
                0.0,
                1.0,
                config.margins.left,
                PREAMBLE_TEXT_RISE,
            ),
        );
        content.push(Buffer::Text, ContentStreamOp::SetTextLeading(config.font_size));
        content.push(Buffer::Graphics, ContentStreamOp::SetLineWidth(config.line_width));
        content
    }

    /// Create a content stream with no operators at all.
    pub(crate) fn empty(obj_ref: ObjectRef) -> Self {
        Self {
            obj_ref,
            text: Vec::new(),
            lines: Vec::new(),
            graphics: Vec::new(),
        }
    }

    /// Append an operator to one of the buffers.
    pub fn push(&mut self, buffer: Buffer, op: ContentStreamOp) {
        self.buffer_mut(buffer).push(op);
    }

    /// Operators appended to a buffer so far.
    pub fn ops(&self, buffer: Buffer) -> &[ContentStreamOp] {
        match buffer {
            Buffer::Text => &self.text,
            Buffer::Lines => &self.lines,
            Buffer::Graphics => &self.graphics,
        }
    }

    fn buffer_mut(&mut self, buffer: Buffer) -> &mut Vec<ContentStreamOp> {
        match buffer {
            Buffer::Text => &mut self.text,
            Buffer::Lines => &mut self.lines,
            Buffer::Graphics => &mut self.graphics,
        }
    }

    /// Render the full stream body.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_body(&mut out);
        out
    }

    fn write_body<W: Write>(&self, w: &mut W) -> std::fmt::Result {
        write!(w, "{}{}", ContentStreamOp::BeginText, EOL)?;
        write_ops(w, &self.text)?;
        write!(w, "{}{}{}", EOL, ContentStreamOp::EndText, EOL)?;
        write_ops(w, &self.lines)?;
        write!(w, "{}{}", ContentStreamOp::Stroke, EOL)?;
        write_ops(w, &self.graphics)
    }
}

fn write_ops<W: Write>(w: &mut W, ops: &[ContentStreamOp]) -> std::fmt::Result {
    for op in ops {
        write!(w, "{}{}", op, EOL)?;
    }
    Ok(())
}

impl IndirectObject for Content {
    fn object_ref(&self) -> ObjectRef {
        self.obj_ref
    }

    fn to_object(&self) -> Object {
        let data = bytes::Bytes::from(self.render().into_bytes());
        let dict = ObjectSerializer::dict_entries(vec![(
            "Length",
            ObjectSerializer::integer(data.len() as i64),
        )]);
        Object::Stream { dict, data }
    }
}
