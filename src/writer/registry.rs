//! Identity registry for indirect objects.
//!
//! Hands out object numbers in registration order, starting at 1. The
//! registration order is also the order objects are written, so the
//! registry is the single source of truth for both identity and layout.

use crate::object::ObjectRef;

/// What kind of entity a registered object number belongs to.
///
/// Per-kind variants carry the index into the document's arena for that
/// kind, so the serializer can dispatch without inspecting types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEntry {
    /// Document catalog
    Catalog,
    /// Page tree root
    PageTree,
    /// Empty outline dictionary
    Outlines,
    /// Shared resources dictionary
    Resources,
    /// Page at the given index
    Page(usize),
    /// Content stream of the page at the given index
    Content(usize),
    /// Font at the given index
    Font(usize),
    /// Image at the given index
    Image(usize),
}

/// Registry of indirect objects in registration order.
#[derive(Debug, Clone, Default)]
pub struct ObjectRegistry {
    entries: Vec<RegistryEntry>,
}

impl ObjectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity and return its reference.
    pub fn register(&mut self, entry: RegistryEntry) -> ObjectRef {
        self.entries.push(entry);
        let obj_ref = ObjectRef::new(self.entries.len() as u32, 0);
        log::trace!("Registered {:?} as object {}", entry, obj_ref.id);
        obj_ref
    }

    /// Object number the next registration will receive.
    pub fn next_id(&self) -> u32 {
        self.entries.len() as u32 + 1
    }

    /// Highest object number issued so far (0 when empty).
    pub fn last_id(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Entry registered under an object number.
    pub fn get(&self, id: u32) -> Option<RegistryEntry> {
        (id as usize)
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .copied()
    }

    /// Iterate `(reference, entry)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectRef, RegistryEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (ObjectRef::new(index as u32 + 1, 0), *entry))
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
