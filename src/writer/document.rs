//! The document: owner of every object and entry point of the API.
//!
//! Construction eagerly registers the catalog, page tree, outline root
//! and shared resources (objects 1 to 4, in that order) and then adds
//! the first page. Everything else is registered as it is added, and the
//! registration order is the order objects are written.

use rayon::prelude::*;

use super::IndirectObject;
use super::content_stream::Content;
use super::font_manager::{BuiltinFont, Font};
use super::image_handler::{EncodedImage, Image, RasterSource};
use super::page::{Page, PageWriter};
use super::pdf_writer::{PdfWriter, XrefLayout};
use super::registry::{ObjectRegistry, RegistryEntry};
use super::resources::Resources;
use super::structure::{Catalog, Outlines, PageTree};
use crate::config::WriterConfig;
use crate::error::Result;
use crate::object::ObjectRef;

/// A document under construction.
#[derive(Debug, Clone)]
pub struct Document {
    config: WriterConfig,
    registry: ObjectRegistry,
    catalog: Catalog,
    page_tree: PageTree,
    outlines: Outlines,
    resources: Resources,
    pages: Vec<Page>,
    current: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a single-page document with default settings.
    pub fn new() -> Self {
        Self::with_config(WriterConfig::default())
    }

    /// Create a single-page document with custom settings.
    pub fn with_config(config: WriterConfig) -> Self {
        let mut registry = ObjectRegistry::new();
        let catalog_ref = registry.register(RegistryEntry::Catalog);
        let pages_ref = registry.register(RegistryEntry::PageTree);
        let outlines_ref = registry.register(RegistryEntry::Outlines);
        let resources_ref = registry.register(RegistryEntry::Resources);

        let mut doc = Self {
            config,
            registry,
            catalog: Catalog::new(catalog_ref, outlines_ref, pages_ref),
            page_tree: PageTree::new(pages_ref),
            outlines: Outlines::new(outlines_ref),
            resources: Resources::new(resources_ref),
            pages: Vec::new(),
            current: 0,
        };
        doc.add_page();
        doc
    }

    /// Settings this document was created with.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Append a new page and make it the current page.
    pub fn add_page(&mut self) -> PageWriter<'_> {
        let index = self.pages.len();
        let page_ref = self.registry.register(RegistryEntry::Page(index));
        let content_ref = self.registry.register(RegistryEntry::Content(index));

        let content = Content::new(content_ref, &self.config);
        let page = Page::new(
            page_ref,
            self.page_tree.object_ref(),
            self.resources.object_ref(),
            content,
            &self.config,
        );
        self.pages.push(page);
        self.page_tree.push(page_ref);
        self.current = index;

        log::debug!("Added page {} as object {}", index + 1, page_ref.id);
        self.current_page()
    }

    /// Register one of the standard fonts under a resource name.
    pub fn add_font(&mut self, name: &str, builtin: BuiltinFont) -> ObjectRef {
        let index = self.resources.fonts().len();
        let obj_ref = self.registry.register(RegistryEntry::Font(index));
        self.resources.push_font(Font::new(obj_ref, name, builtin));

        log::debug!("Added font /{} ({}) as object {}", name, builtin.base_font(), obj_ref.id);
        obj_ref
    }

    /// Register a standard font by numeric selector (1 to 14).
    ///
    /// An invalid selector fails without registering anything.
    pub fn add_font_code(&mut self, name: &str, code: u32) -> Result<ObjectRef> {
        let builtin = BuiltinFont::from_code(code)?;
        Ok(self.add_font(name, builtin))
    }

    /// Decode, encode and register an image under a resource name.
    ///
    /// A decoder failure surfaces as
    /// [`Error::ImageSourceUnreadable`](crate::error::Error::ImageSourceUnreadable)
    /// and registers nothing.
    pub fn add_image(&mut self, name: &str, source: &dyn RasterSource) -> Result<ObjectRef> {
        let encoded = encode_source(source, self.config.compression)?;
        Ok(self.register_image(name, encoded))
    }

    /// Add several images, decoding and encoding them in parallel.
    ///
    /// Images are registered in the order given once all of them have
    /// been encoded. If any source fails, nothing is registered.
    pub fn add_images(&mut self, batch: &[(&str, &dyn RasterSource)]) -> Result<Vec<ObjectRef>> {
        let level = self.config.compression;
        let mut results: Vec<(usize, Result<EncodedImage>)> = batch
            .par_iter()
            .enumerate()
            .map(|(idx, (_, source))| (idx, encode_source(*source, level)))
            .collect();
        results.sort_by_key(|(idx, _)| *idx);

        let mut encoded = Vec::with_capacity(results.len());
        for (_, res) in results {
            encoded.push(res?);
        }

        Ok(batch
            .iter()
            .zip(encoded)
            .map(|((name, _), image)| self.register_image(name, image))
            .collect())
    }

    fn register_image(&mut self, name: &str, encoded: EncodedImage) -> ObjectRef {
        let index = self.resources.images().len();
        let obj_ref = self.registry.register(RegistryEntry::Image(index));

        log::debug!(
            "Added image /{} ({}x{}) as object {}",
            name,
            encoded.width(),
            encoded.height(),
            obj_ref.id
        );
        self.resources.push_image(Image::new(obj_ref, name, encoded));
        obj_ref
    }

    /// Drawing handle for the current (most recently added) page.
    pub fn current_page(&mut self) -> PageWriter<'_> {
        let Self {
            pages,
            resources,
            current,
            ..
        } = self;
        PageWriter::new(&mut pages[*current], &*resources)
    }

    /// Drawing handle for a page by zero-based index.
    pub fn page(&mut self, index: usize) -> Option<PageWriter<'_>> {
        let Self {
            pages, resources, ..
        } = self;
        let resources = &*resources;
        pages
            .get_mut(index)
            .map(move |page| PageWriter::new(page, resources))
    }

    /// All pages in creation order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page object references in creation order.
    pub fn page_refs(&self) -> &[ObjectRef] {
        self.page_tree.kids()
    }

    /// Number of registered objects, which is also the highest object number.
    pub fn object_count(&self) -> usize {
        self.registry.len()
    }

    /// Reference to the document catalog.
    pub fn catalog_ref(&self) -> ObjectRef {
        self.catalog.object_ref()
    }

    /// Registered fonts in registration order.
    pub fn fonts(&self) -> &[Font] {
        self.resources.fonts()
    }

    /// Registered images in registration order.
    pub fn images(&self) -> &[Image] {
        self.resources.images()
    }

    /// The shared resources dictionary.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub(crate) fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Entity registered under an entry.
    pub(crate) fn resolve(&self, entry: RegistryEntry) -> Option<&dyn IndirectObject> {
        match entry {
            RegistryEntry::Catalog => Some(&self.catalog),
            RegistryEntry::PageTree => Some(&self.page_tree),
            RegistryEntry::Outlines => Some(&self.outlines),
            RegistryEntry::Resources => Some(&self.resources),
            RegistryEntry::Page(i) => self.pages.get(i).map(|p| p as &dyn IndirectObject),
            RegistryEntry::Content(i) => self.pages.get(i).map(|p| p.content() as &dyn IndirectObject),
            RegistryEntry::Font(i) => self.resources.fonts().get(i).map(|f| f as &dyn IndirectObject),
            RegistryEntry::Image(i) => self.resources.images().get(i).map(|img| img as &dyn IndirectObject),
        }
    }

    /// Serialize the whole document.
    ///
    /// Serialization does not change the document, so calling this twice
    /// yields identical bytes.
    pub fn serialize(&self) -> Vec<u8> {
        PdfWriter::new(self).finish()
    }

    /// Serialize and also return the recorded object offsets.
    pub fn serialize_with_layout(&self) -> (Vec<u8>, XrefLayout) {
        PdfWriter::new(self).write()
    }

    /// Serialize into a sink.
    pub fn write_to<W: std::io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.serialize())?;
        writer.flush()?;
        Ok(())
    }
}

fn encode_source(source: &dyn RasterSource, level: u32) -> Result<EncodedImage> {
    let raster = source.decode()?;
    EncodedImage::encode_with_level(&raster, level)
}
