//! Font resources for PDF generation.
//!
//! Only the 14 standard Type 1 faces every conforming reader provides are
//! supported. Text layout uses a fixed advance of one font size per
//! character, so no metrics are carried.

use super::IndirectObject;
use super::object_serializer::ObjectSerializer;
use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef};

/// One of the 14 standard fonts.
///
/// The discriminants are the numeric selectors accepted by
/// [`BuiltinFont::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BuiltinFont {
    /// Courier
    Courier = 1,
    /// Courier-Bold
    CourierBold = 2,
    /// Courier-BoldOblique
    CourierBoldOblique = 3,
    /// Courier-Oblique
    CourierOblique = 4,
    /// Helvetica
    Helvetica = 5,
    /// Helvetica-Bold
    HelveticaBold = 6,
    /// Helvetica-BoldOblique
    HelveticaBoldOblique = 7,
    /// Helvetica-Oblique
    HelveticaOblique = 8,
    /// Times-Roman
    TimesRoman = 9,
    /// Times-Bold
    TimesBold = 10,
    /// Times-Italic
    TimesItalic = 11,
    /// Times-BoldItalic
    TimesBoldItalic = 12,
    /// Symbol
    Symbol = 13,
    /// ZapfDingbats
    ZapfDingbats = 14,
}

impl BuiltinFont {
    /// All 14 faces in selector order.
    pub const ALL: [BuiltinFont; 14] = [
        BuiltinFont::Courier,
        BuiltinFont::CourierBold,
        BuiltinFont::CourierBoldOblique,
        BuiltinFont::CourierOblique,
        BuiltinFont::Helvetica,
        BuiltinFont::HelveticaBold,
        BuiltinFont::HelveticaBoldOblique,
        BuiltinFont::HelveticaOblique,
        BuiltinFont::TimesRoman,
        BuiltinFont::TimesBold,
        BuiltinFont::TimesItalic,
        BuiltinFont::TimesBoldItalic,
        BuiltinFont::Symbol,
        BuiltinFont::ZapfDingbats,
    ];

    /// Resolve a numeric selector (1..=14).
    pub fn from_code(code: u32) -> Result<Self> {
        code.checked_sub(1)
            .and_then(|index| Self::ALL.get(index as usize))
            .copied()
            .ok_or(Error::InvalidFontSelector(code))
    }

    /// Numeric selector of this face.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Canonical `/BaseFont` name.
    pub fn base_font(self) -> &'static str {
        match self {
            BuiltinFont::Courier => "Courier",
            BuiltinFont::CourierBold => "Courier-Bold",
            BuiltinFont::CourierBoldOblique => "Courier-BoldOblique",
            BuiltinFont::CourierOblique => "Courier-Oblique",
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
            BuiltinFont::TimesRoman => "Times-Roman",
            BuiltinFont::TimesBold => "Times-Bold",
            BuiltinFont::TimesItalic => "Times-Italic",
            BuiltinFont::TimesBoldItalic => "Times-BoldItalic",
            BuiltinFont::Symbol => "Symbol",
            BuiltinFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Font `/Subtype`; all standard faces are Type 1.
    pub fn subtype(self) -> &'static str {
        "Type1"
    }

    /// Font `/Encoding`, if one should be declared.
    ///
    /// Symbol and ZapfDingbats use their built-in encodings.
    pub fn encoding(self) -> Option<&'static str> {
        match self {
            BuiltinFont::Symbol | BuiltinFont::ZapfDingbats => None,
            _ => Some("WinAnsiEncoding"),
        }
    }
}

impl TryFrom<u32> for BuiltinFont {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self> {
        Self::from_code(code)
    }
}

/// A registered font resource.
#[derive(Debug, Clone)]
pub struct Font {
    obj_ref: ObjectRef,
    name: String,
    builtin: BuiltinFont,
}

impl Font {
    pub(crate) fn new(obj_ref: ObjectRef, name: impl Into<String>, builtin: BuiltinFont) -> Self {
        Self {
            obj_ref,
            name: name.into(),
            builtin,
        }
    }

    /// Symbolic resource name (without the leading slash).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The standard face this font maps to.
    pub fn builtin(&self) -> BuiltinFont {
        self.builtin
    }
}

impl IndirectObject for Font {
    fn object_ref(&self) -> ObjectRef {
        self.obj_ref
    }

    fn to_object(&self) -> Object {
        let mut entries = vec![
            ("Type", ObjectSerializer::name("Font")),
            ("Subtype", ObjectSerializer::name(self.builtin.subtype())),
            ("Name", ObjectSerializer::name(&self.name)),
            ("BaseFont", ObjectSerializer::name(self.builtin.base_font())),
        ];
        if let Some(encoding) = self.builtin.encoding() {
            entries.push(("Encoding", ObjectSerializer::name(encoding)));
        }
        ObjectSerializer::dict(entries)
    }
}
