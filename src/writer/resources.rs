//! Shared resources dictionary.
//!
//! One Resources object is shared by every page. It owns the registered
//! fonts and images and resolves symbolic names to them. When a name is
//! registered more than once the most recent registration wins, both for
//! lookups and in the written `/Font` and `/XObject` maps.

use indexmap::IndexMap;

use super::IndirectObject;
use super::font_manager::Font;
use super::image_handler::Image;
use super::object_serializer::ObjectSerializer;
use crate::object::{Object, ObjectRef};

/// Fonts and images available to every page.
#[derive(Debug, Clone)]
pub struct Resources {
    obj_ref: ObjectRef,
    fonts: Vec<Font>,
    images: Vec<Image>,
}

impl Resources {
    pub(crate) fn new(obj_ref: ObjectRef) -> Self {
        Self {
            obj_ref,
            fonts: Vec::new(),
            images: Vec::new(),
        }
    }

    pub(crate) fn push_font(&mut self, font: Font) -> usize {
        if self.find_font(font.name()).is_some() {
            log::warn!("Font /{} registered again; the newer font takes over", font.name());
        }
        self.fonts.push(font);
        self.fonts.len() - 1
    }

    pub(crate) fn push_image(&mut self, image: Image) -> usize {
        if self.find_image(image.name()).is_some() {
            log::warn!("Image /{} registered again; the newer image takes over", image.name());
        }
        self.images.push(image);
        self.images.len() - 1
    }

    /// All fonts in registration order, including overridden ones.
    pub fn fonts(&self) -> &[Font] {
        &self.fonts
    }

    /// All images in registration order, including overridden ones.
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Look up a font by symbolic name; the last registration wins.
    pub fn find_font(&self, name: &str) -> Option<&Font> {
        self.fonts.iter().rev().find(|font| font.name() == name)
    }

    /// Look up an image by symbolic name; the last registration wins.
    pub fn find_image(&self, name: &str) -> Option<&Image> {
        self.images.iter().rev().find(|image| image.name() == name)
    }

    /// Procedure sets advertised to readers.
    pub fn proc_set(&self) -> Vec<&'static str> {
        let mut procs = vec!["PDF"];
        if !self.fonts.is_empty() {
            procs.push("Text");
        }
        if !self.images.is_empty() {
            procs.push("ImageC");
        }
        procs
    }

    fn name_map<'a>(entries: impl Iterator<Item = (&'a str, ObjectRef)>) -> Object {
        // Re-inserting a key keeps its first position but takes the new value
        let mut map: IndexMap<&str, ObjectRef> = IndexMap::new();
        for (name, obj_ref) in entries {
            map.insert(name, obj_ref);
        }
        ObjectSerializer::dict(
            map.into_iter()
                .map(|(name, obj_ref)| (name, ObjectSerializer::reference(obj_ref)))
                .collect(),
        )
    }
}

impl IndirectObject for Resources {
    fn object_ref(&self) -> ObjectRef {
        self.obj_ref
    }

    fn to_object(&self) -> Object {
        let proc_set = self
            .proc_set()
            .into_iter()
            .map(ObjectSerializer::name)
            .collect();

        let mut entries = vec![("ProcSet", ObjectSerializer::array(proc_set))];
        if !self.fonts.is_empty() {
            entries.push((
                "Font",
                Self::name_map(self.fonts.iter().map(|f| (f.name(), f.object_ref()))),
            ));
        }
        if !self.images.is_empty() {
            entries.push((
                "XObject",
                Self::name_map(self.images.iter().map(|i| (i.name(), i.object_ref()))),
            ));
        }
        ObjectSerializer::dict(entries)
    }
}
