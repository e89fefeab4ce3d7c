//! Configuration for document generation.

/// Canvas width in points (A4).
pub const PAGE_WIDTH: f32 = 595.0;

/// Canvas height in points (A4).
pub const PAGE_HEIGHT: f32 = 842.0;

/// Line terminator used throughout the file body.
pub const EOL: &str = "\r\n";

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    /// Left margin
    pub left: f32,
    /// Right margin
    pub right: f32,
    /// Top margin
    pub top: f32,
    /// Bottom margin
    pub bottom: f32,
}

impl Margins {
    /// Same margin on all four sides.
    pub fn uniform(value: f32) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(72.0)
    }
}

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// PDF version written in the header (e.g., "1.2")
    pub version: String,
    /// Margins applied to every new page
    pub margins: Margins,
    /// Initial font size of every new page
    pub font_size: f32,
    /// Stroke width set at the start of every page
    pub line_width: f32,
    /// Resource name the page preamble selects before any `set_font`
    pub default_font: String,
    /// Deflate level used by the image pipeline (0-9)
    pub compression: u32,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            version: "1.2".to_string(),
            margins: Margins::default(),
            font_size: 10.0,
            line_width: 0.5,
            default_font: "F1".to_string(),
            compression: 9,
        }
    }
}

impl WriterConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the PDF header version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the page margins.
    ///
    /// Margins that are NaN or infinite are ignored.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        let Margins { left, right, top, bottom } = margins;
        if [left, right, top, bottom].iter().all(|v| v.is_finite()) {
            self.margins = margins;
        } else {
            log::warn!("Ignoring non-finite margins {:?}", margins);
        }
        self
    }

    /// Set the initial font size for new pages.
    ///
    /// A NaN or infinite size is ignored.
    pub fn with_font_size(mut self, size: f32) -> Self {
        if size.is_finite() {
            self.font_size = size;
        } else {
            log::warn!("Ignoring non-finite font size {}", size);
        }
        self
    }

    /// Set the initial stroke width for new pages.
    ///
    /// A NaN or infinite width is ignored.
    pub fn with_line_width(mut self, width: f32) -> Self {
        if width.is_finite() {
            self.line_width = width;
        } else {
            log::warn!("Ignoring non-finite line width {}", width);
        }
        self
    }

    /// Set the font resource name selected by the page preamble.
    pub fn with_default_font(mut self, name: impl Into<String>) -> Self {
        self.default_font = name.into();
        self
    }

    /// Set the image compression level.
    ///
    /// Values above 9 are clamped to 9.
    pub fn with_compression(mut self, level: u32) -> Self {
        self.compression = level.min(9);
        self
    }
}
