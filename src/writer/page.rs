//! Pages and the per-page drawing API.
//!
//! A [`Page`] owns its content stream and the text cursor. Drawing goes
//! through a [`PageWriter`], which borrows the page mutably together with
//! the document's shared [`Resources`] so font and image names can be
//! resolved without the page holding a pointer back to its document.
//!
//! Text coordinates are measured from the top-left corner of the area
//! inside the margins, with y growing downwards; they are converted to
//! PDF user space (origin bottom-left) when a string is shown.

use super::IndirectObject;
use super::content_stream::{Buffer, Content, ContentStreamOp};
use super::object_serializer::ObjectSerializer;
use super::resources::Resources;
use crate::config::{Margins, WriterConfig, PAGE_HEIGHT, PAGE_WIDTH};
use crate::error::{Error, ResourceKind, Result};
use crate::object::{Object, ObjectRef};

/// One page of the document.
#[derive(Debug, Clone)]
pub struct Page {
    obj_ref: ObjectRef,
    parent: ObjectRef,
    resources: ObjectRef,
    content: Content,
    margins: Margins,
    x: f32,
    y: f32,
    font_size: f32,
    font_name: String,
    font_ref: Option<ObjectRef>,
    image_binding: Option<String>,
}

impl Page {
    pub(crate) fn new(
        obj_ref: ObjectRef,
        parent: ObjectRef,
        resources: ObjectRef,
        content: Content,
        config: &WriterConfig,
    ) -> Self {
        Self {
            obj_ref,
            parent,
            resources,
            content,
            margins: config.margins,
            x: 0.0,
            y: 0.0,
            font_size: config.font_size,
            font_name: config.default_font.clone(),
            font_ref: None,
            image_binding: None,
        }
    }

    /// The page's content stream.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Canvas width in points.
    pub fn width(&self) -> f32 {
        PAGE_WIDTH
    }

    /// Canvas height in points.
    pub fn height(&self) -> f32 {
        PAGE_HEIGHT
    }

    /// Margins of this page.
    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Text cursor `(x, y)` relative to the top-left margin corner.
    pub fn cursor(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Current font size.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Resource name of the selected font.
    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    /// Font object selected by the last successful `set_font`.
    pub fn font_ref(&self) -> Option<ObjectRef> {
        self.font_ref
    }
}

impl IndirectObject for Page {
    fn object_ref(&self) -> ObjectRef {
        self.obj_ref
    }

    fn to_object(&self) -> Object {
        ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Page")),
            ("Parent", ObjectSerializer::reference(self.parent)),
            ("Resources", ObjectSerializer::reference(self.resources)),
            ("Contents", ObjectSerializer::reference(self.content.object_ref())),
        ])
    }
}

/// Drawing handle for one page.
///
/// Every method appends operators to the page's content stream; nothing
/// already written is ever changed.
pub struct PageWriter<'a> {
    page: &'a mut Page,
    resources: &'a Resources,
}

impl<'a> PageWriter<'a> {
    pub(crate) fn new(page: &'a mut Page, resources: &'a Resources) -> Self {
        Self { page, resources }
    }

    /// The page being drawn on.
    pub fn page(&self) -> &Page {
        self.page
    }

    /// Reference to the page object.
    pub fn page_ref(&self) -> ObjectRef {
        self.page.obj_ref
    }

    /// Text cursor `(x, y)`.
    pub fn cursor(&self) -> (f32, f32) {
        self.page.cursor()
    }

    /// Current font size.
    pub fn font_size(&self) -> f32 {
        self.page.font_size
    }

    /// Font object selected by the last successful `set_font`.
    pub fn font_ref(&self) -> Option<ObjectRef> {
        self.page.font_ref
    }

    /// Select a font by resource name at the current size.
    ///
    /// An unknown name keeps the previous font; the selection is written
    /// either way.
    pub fn set_font(&mut self, name: &str) -> &mut Self {
        match self.resources.find_font(name) {
            Some(font) => {
                self.page.font_name = font.name().to_string();
                self.page.font_ref = Some(font.object_ref());
            },
            None => {
                log::warn!("Font /{} is not registered; keeping /{}", name, self.page.font_name);
            },
        }
        self.emit_font();
        self
    }

    /// Like [`set_font`](Self::set_font), but fails on an unknown name
    /// without writing anything.
    pub fn try_set_font(&mut self, name: &str) -> Result<&mut Self> {
        if self.resources.find_font(name).is_none() {
            return Err(Error::UnresolvedResource {
                kind: ResourceKind::Font,
                name: name.to_string(),
            });
        }
        Ok(self.set_font(name))
    }

    /// Change the font size and re-select the current font.
    ///
    /// A NaN or infinite size is ignored and nothing is written.
    pub fn set_font_size(&mut self, size: f32) -> &mut Self {
        if !all_finite(&[size]) {
            log::warn!("Ignoring non-finite font size {}", size);
            return self;
        }
        self.page.font_size = size;
        self.emit_font();
        self
    }

    fn emit_font(&mut self) {
        let op = ContentStreamOp::SetFont(self.page.font_name.clone(), self.page.font_size);
        self.page.content.push(Buffer::Text, op);
    }

    /// Show a string at the cursor without moving it.
    pub fn output_text(&mut self, text: &str) -> &mut Self {
        let page = &mut *self.page;
        let x = page.margins.left + page.x;
        let y = PAGE_HEIGHT - page.margins.top - page.y - page.font_size;

        page.content
            .push(Buffer::Text, ContentStreamOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, x, y));
        page.content
            .push(Buffer::Text, ContentStreamOp::ShowText(text.to_string()));
        self
    }

    /// Show a string and advance the cursor by one font size per byte.
    ///
    /// The shown bytes are UTF-8 under a single-byte font encoding, so
    /// each byte is drawn as one glyph.
    pub fn print(&mut self, text: &str) -> &mut Self {
        self.output_text(text);
        self.page.x += text.len() as f32 * self.page.font_size;
        self
    }

    /// Show a string and move the cursor to the start of the next line.
    pub fn println(&mut self, text: &str) -> &mut Self {
        self.output_text(text);
        self.page.x = 0.0;
        self.page.y += self.page.font_size;
        self
    }

    /// Paint an image at its natural pixel size with its lower-left corner
    /// at `(x, y)` in user space.
    ///
    /// An unknown name paints the previously drawn image instead, or
    /// nothing if no image has been drawn on this page yet. Non-finite
    /// coordinates draw nothing.
    pub fn draw_image(&mut self, name: &str, x: f32, y: f32) -> &mut Self {
        if !all_finite(&[x, y]) {
            log::warn!("Ignoring image /{} at non-finite position ({}, {})", name, x, y);
            return self;
        }
        let resources = self.resources;
        if resources.find_image(name).is_some() {
            self.page.image_binding = Some(name.to_string());
        } else {
            log::warn!("Image /{} is not registered", name);
        }

        let bound = self
            .page
            .image_binding
            .as_deref()
            .and_then(|bound| resources.find_image(bound));

        if let Some(image) = bound {
            let (w, h) = (image.width() as f32, image.height() as f32);
            let ops = [
                ContentStreamOp::SaveState,
                ContentStreamOp::Transform(w, 0.0, 0.0, h, x, y),
                ContentStreamOp::PaintXObject(image.name().to_string()),
                ContentStreamOp::RestoreState,
            ];
            for op in ops {
                self.page.content.push(Buffer::Graphics, op);
            }
        }
        self
    }

    /// Like [`draw_image`](Self::draw_image), but fails on an unknown name
    /// without writing anything.
    pub fn try_draw_image(&mut self, name: &str, x: f32, y: f32) -> Result<&mut Self> {
        if self.resources.find_image(name).is_none() {
            return Err(Error::UnresolvedResource {
                kind: ResourceKind::Image,
                name: name.to_string(),
            });
        }
        Ok(self.draw_image(name, x, y))
    }

    /// Add a rectangle outline to the stroked path.
    ///
    /// Non-finite operands are ignored.
    pub fn draw_box(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        if !all_finite(&[x, y, width, height]) {
            log::warn!("Ignoring box with non-finite operands");
            return self;
        }
        self.page
            .content
            .push(Buffer::Lines, ContentStreamOp::Rectangle(x, y, width, height));
        self
    }

    /// Add a straight segment to the stroked path.
    ///
    /// Non-finite operands are ignored.
    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> &mut Self {
        if !all_finite(&[x1, y1, x2, y2]) {
            log::warn!("Ignoring line with non-finite operands");
            return self;
        }
        self.page.content.push(Buffer::Lines, ContentStreamOp::MoveTo(x1, y1));
        self.page.content.push(Buffer::Lines, ContentStreamOp::LineTo(x2, y2));
        self
    }

    /// Set the fill colour for subsequent text.
    ///
    /// Components are written as given (0-255), not scaled to 0-1.
    pub fn set_colour(&mut self, r: u8, g: u8, b: u8) -> &mut Self {
        let op = ContentStreamOp::SetFillColorRGB(r as f32, g as f32, b as f32);
        self.page.content.push(Buffer::Text, op);
        self
    }
}

/// Content stream numbers cannot express NaN or infinity.
fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::font_manager::{BuiltinFont, Font};
    use crate::writer::image_handler::{EncodedImage, Image, Raster};

    fn fixture() -> (Page, Resources) {
        let config = WriterConfig::default();
        let content = Content::empty(ObjectRef::new(6, 0));
        let page = Page::new(
            ObjectRef::new(5, 0),
            ObjectRef::new(2, 0),
            ObjectRef::new(4, 0),
            content,
            &config,
        );
        let mut resources = Resources::new(ObjectRef::new(4, 0));
        resources.push_font(Font::new(ObjectRef::new(7, 0), "F1", BuiltinFont::Courier));
        resources.push_font(Font::new(ObjectRef::new(8, 0), "F2", BuiltinFont::TimesRoman));
        let encoded = EncodedImage::encode(&Raster::filled(40, 30, [1, 2, 3])).unwrap();
        resources.push_image(Image::new(ObjectRef::new(9, 0), "logo", encoded));
        (page, resources)
    }

    fn text_ops(page: &Page) -> Vec<String> {
        page.content().ops(Buffer::Text).iter().map(|op| op.to_string()).collect()
    }

    #[test]
    fn test_output_text_position() {
        let (mut page, resources) = fixture();
        PageWriter::new(&mut page, &resources).output_text("X");
        assert_eq!(text_ops(&page), vec!["1 0 0 1 72 760 Tm", "(X) Tj"]);
        assert_eq!(page.cursor(), (0.0, 0.0));
    }

    #[test]
    fn test_print_advances_by_utf8_length() {
        let (mut page, resources) = fixture();
        let mut writer = PageWriter::new(&mut page, &resources);
        writer.print("\u{e9}");
        assert_eq!(writer.cursor(), (20.0, 0.0));
        writer.print("a\u{20ac}");
        assert_eq!(writer.cursor(), (60.0, 0.0));
    }

    #[test]
    fn test_non_finite_operands_write_nothing() {
        let (mut page, resources) = fixture();
        let mut writer = PageWriter::new(&mut page, &resources);
        writer
            .set_font_size(f32::NAN)
            .draw_box(0.0, f32::INFINITY, 10.0, 10.0)
            .draw_line(f32::NAN, 0.0, 1.0, 1.0)
            .draw_image("logo", f32::NEG_INFINITY, 0.0);
        assert_eq!(writer.font_size(), 10.0);

        assert!(text_ops(&page).is_empty());
        assert!(page.content().ops(Buffer::Lines).is_empty());
        assert!(page.content().ops(Buffer::Graphics).is_empty());
    }

    #[test]
    fn test_print_advances_cursor() {
        let (mut page, resources) = fixture();
        let mut writer = PageWriter::new(&mut page, &resources);
        writer.print("abc");
        assert_eq!(writer.cursor(), (30.0, 0.0));
        writer.print("d");
        assert_eq!(text_ops(&page)[2], "1 0 0 1 102 760 Tm");
    }

    #[test]
    fn test_println_moves_to_next_line() {
        let (mut page, resources) = fixture();
        let mut writer = PageWriter::new(&mut page, &resources);
        writer.print("ab").println("cd").print("e");
        assert_eq!(writer.cursor(), (10.0, 10.0));
        assert_eq!(text_ops(&page)[4], "1 0 0 1 72 750 Tm");
    }

    #[test]
    fn test_set_font_resolves_and_emits() {
        let (mut page, resources) = fixture();
        let mut writer = PageWriter::new(&mut page, &resources);
        writer.set_font("F2");
        assert_eq!(writer.font_ref(), Some(ObjectRef::new(8, 0)));
        writer.set_font_size(14.0);
        assert_eq!(text_ops(&page), vec!["/F2 10 Tf", "/F2 14 Tf"]);
    }

    #[test]
    fn test_unknown_font_keeps_binding() {
        let (mut page, resources) = fixture();
        let mut writer = PageWriter::new(&mut page, &resources);
        writer.set_font("F2").set_font("Nope");
        assert_eq!(writer.font_ref(), Some(ObjectRef::new(8, 0)));
        assert_eq!(text_ops(&page), vec!["/F2 10 Tf", "/F2 10 Tf"]);
    }

    #[test]
    fn test_try_set_font_unknown() {
        let (mut page, resources) = fixture();
        let result = PageWriter::new(&mut page, &resources).try_set_font("Nope").map(|_| ());
        assert!(matches!(
            result,
            Err(Error::UnresolvedResource {
                kind: ResourceKind::Font,
                ..
            })
        ));
        assert!(text_ops(&page).is_empty());
    }

    #[test]
    fn test_draw_image_sequence() {
        let (mut page, resources) = fixture();
        PageWriter::new(&mut page, &resources).draw_image("logo", 100.0, 200.0);
        let ops: Vec<String> = page
            .content()
            .ops(Buffer::Graphics)
            .iter()
            .map(|op| op.to_string())
            .collect();
        assert_eq!(ops, vec!["q", "40 0 0 30 100 200 cm", "/logo Do", "Q"]);
    }

    #[test]
    fn test_draw_unknown_image_without_binding_is_noop() {
        let (mut page, resources) = fixture();
        PageWriter::new(&mut page, &resources).draw_image("missing", 0.0, 0.0);
        assert!(page.content().ops(Buffer::Graphics).is_empty());

        let result = PageWriter::new(&mut page, &resources)
            .try_draw_image("missing", 0.0, 0.0)
            .map(|_| ());
        assert!(result.is_err());
    }

    #[test]
    fn test_lines_and_colour() {
        let (mut page, resources) = fixture();
        PageWriter::new(&mut page, &resources)
            .draw_box(10.0, 20.0, 30.0, 40.0)
            .draw_line(0.0, 0.0, 595.0, 842.0)
            .set_colour(255, 0, 0);

        let lines: Vec<String> = page
            .content()
            .ops(Buffer::Lines)
            .iter()
            .map(|op| op.to_string())
            .collect();
        assert_eq!(lines, vec!["10 20 30 40 re", "0 0 m", "595 842 l"]);
        assert_eq!(text_ops(&page), vec!["255 0 0 rg"]);
    }

    #[test]
    fn test_page_dictionary() {
        let (page, _) = fixture();
        let bytes = ObjectSerializer::new().serialize_to_string(&page.to_object());
        assert_eq!(
            bytes,
            "<<\r\n/Type /Page\r\n/Parent 2 0 R\r\n/Resources 4 0 R\r\n/Contents 6 0 R\r\n>>"
        );
    }
}
