//! Document structure objects: catalog, page tree and outline root.

use super::IndirectObject;
use super::object_serializer::ObjectSerializer;
use crate::config::{PAGE_HEIGHT, PAGE_WIDTH};
use crate::object::{Object, ObjectRef};

/// Document catalog (ISO 32000-1 Section 7.7.2).
#[derive(Debug, Clone)]
pub struct Catalog {
    obj_ref: ObjectRef,
    outlines: ObjectRef,
    pages: ObjectRef,
}

impl Catalog {
    pub(crate) fn new(obj_ref: ObjectRef, outlines: ObjectRef, pages: ObjectRef) -> Self {
        Self {
            obj_ref,
            outlines,
            pages,
        }
    }

    /// Reference to the page tree root.
    pub fn pages(&self) -> ObjectRef {
        self.pages
    }

    /// Reference to the outline root.
    pub fn outlines(&self) -> ObjectRef {
        self.outlines
    }
}

impl IndirectObject for Catalog {
    fn object_ref(&self) -> ObjectRef {
        self.obj_ref
    }

    fn to_object(&self) -> Object {
        ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Catalog")),
            ("Outlines", ObjectSerializer::reference(self.outlines)),
            ("Pages", ObjectSerializer::reference(self.pages)),
        ])
    }
}

/// Page tree root holding every page in creation order.
#[derive(Debug, Clone)]
pub struct PageTree {
    obj_ref: ObjectRef,
    kids: Vec<ObjectRef>,
}

impl PageTree {
    pub(crate) fn new(obj_ref: ObjectRef) -> Self {
        Self {
            obj_ref,
            kids: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, page: ObjectRef) {
        self.kids.push(page);
    }

    /// Page references in creation order.
    pub fn kids(&self) -> &[ObjectRef] {
        &self.kids
    }

    /// Number of pages.
    pub fn count(&self) -> usize {
        self.kids.len()
    }
}

impl IndirectObject for PageTree {
    fn object_ref(&self) -> ObjectRef {
        self.obj_ref
    }

    fn to_object(&self) -> Object {
        let kids = self
            .kids
            .iter()
            .map(|r| ObjectSerializer::reference(*r))
            .collect();

        ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Pages")),
            (
                "MediaBox",
                ObjectSerializer::rect(0.0, 0.0, PAGE_WIDTH as f64, PAGE_HEIGHT as f64),
            ),
            ("Count", ObjectSerializer::integer(self.kids.len() as i64)),
            ("Kids", ObjectSerializer::array(kids)),
        ])
    }
}

/// Outline root. Bookmarks are not supported, so it is always empty.
#[derive(Debug, Clone)]
pub struct Outlines {
    obj_ref: ObjectRef,
}

impl Outlines {
    pub(crate) fn new(obj_ref: ObjectRef) -> Self {
        Self { obj_ref }
    }
}

impl IndirectObject for Outlines {
    fn object_ref(&self) -> ObjectRef {
        self.obj_ref
    }

    fn to_object(&self) -> Object {
        ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Outlines")),
            ("Count", ObjectSerializer::integer(0)),
        ])
    }
}
