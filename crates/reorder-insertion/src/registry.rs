#![forbid(unsafe_code)]

//! Collection and item bookkeeping.
//!
//! The registry answers "is this a registered collection/item, and what is
//! its record". Item records are a projection of the collection's value
//! sequence onto the nodes the host rendered: the node at child position `p`
//! carries `values[p]`, and only draggable nodes become enabled items with
//! dense indices `0..n-1`.

use std::collections::BTreeMap;
use std::fmt;

use reorder_core::id::{CollectionId, ItemId};

use crate::config::{CollectionHooks, CollectionOptions};
use crate::host::RenderedNode;
use crate::zone::ItemZones;

/// One enabled item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord<V> {
    pub id: ItemId,
    /// Position among the enabled items of its collection.
    pub index: usize,
    pub value: V,
    /// Last computed zones; empty until the collection is zoned.
    pub zones: ItemZones,
}

/// One registered collection.
pub struct CollectionRecord<V> {
    pub id: CollectionId,
    pub options: CollectionOptions,
    pub hooks: CollectionHooks<V>,
    /// Enabled items in index order.
    pub items: Vec<ItemRecord<V>>,
    /// Item this collection is rendered inside, for tree-group checks.
    pub owner_item: Option<ItemId>,
}

impl<V> CollectionRecord<V> {
    /// Create an empty record.
    pub fn new(id: CollectionId, options: CollectionOptions, hooks: CollectionHooks<V>) -> Self {
        Self {
            id,
            options,
            hooks,
            items: Vec::new(),
            owner_item: None,
        }
    }

    /// Enabled item by id.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&ItemRecord<V>> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Drop all computed zones.
    pub fn clear_zones(&mut self) {
        for item in &mut self.items {
            item.zones = ItemZones::NONE;
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for CollectionRecord<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionRecord")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("hooks", &self.hooks)
            .field("items", &self.items)
            .field("owner_item", &self.owner_item)
            .finish()
    }
}

/// Registry of collections and their enabled items.
pub struct Registry<V> {
    collections: BTreeMap<CollectionId, CollectionRecord<V>>,
    item_owner: BTreeMap<ItemId, CollectionId>,
}

impl<V> Default for Registry<V> {
    fn default() -> Self {
        Self {
            collections: BTreeMap::new(),
            item_owner: BTreeMap::new(),
        }
    }
}

impl<V> Registry<V> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection.
    pub fn register(
        &mut self,
        id: CollectionId,
        options: CollectionOptions,
        hooks: CollectionHooks<V>,
    ) -> Result<(), RegistryError> {
        if self.collections.contains_key(&id) {
            return Err(RegistryError::DuplicateCollection { id });
        }
        self.collections
            .insert(id, CollectionRecord::new(id, options, hooks));
        Ok(())
    }

    /// Remove a collection and forget its items.
    pub fn unregister(&mut self, id: CollectionId) -> Option<CollectionRecord<V>> {
        let record = self.collections.remove(&id)?;
        self.item_owner.retain(|_, owner| *owner != id);
        Some(record)
    }

    /// Record that `collection` is rendered inside `item`.
    pub fn set_owner_item(
        &mut self,
        collection: CollectionId,
        item: Option<ItemId>,
    ) -> Result<(), RegistryError> {
        let record = self
            .collections
            .get_mut(&collection)
            .ok_or(RegistryError::UnknownCollection { id: collection })?;
        record.owner_item = item;
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, id: CollectionId) -> bool {
        self.collections.contains_key(&id)
    }

    #[must_use]
    pub fn get(&self, id: CollectionId) -> Option<&CollectionRecord<V>> {
        self.collections.get(&id)
    }

    pub fn get_mut(&mut self, id: CollectionId) -> Option<&mut CollectionRecord<V>> {
        self.collections.get_mut(&id)
    }

    /// Collection owning an enabled item.
    #[must_use]
    pub fn collection_of(&self, item: ItemId) -> Option<CollectionId> {
        self.item_owner.get(&item).copied()
    }

    /// Enabled item record by id.
    #[must_use]
    pub fn item(&self, item: ItemId) -> Option<&ItemRecord<V>> {
        let owner = self.collection_of(item)?;
        self.collections.get(&owner)?.item(item)
    }

    /// Registered collection ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = CollectionId> + '_ {
        self.collections.keys().copied()
    }

    /// Whether any registered collection is sortable.
    #[must_use]
    pub fn any_sortable(&self) -> bool {
        self.collections.values().any(|record| record.options.sortable)
    }

    /// Whether `collection` is rendered inside `item`, directly or through
    /// a chain of owning items.
    #[must_use]
    pub fn item_contains_collection(&self, item: ItemId, collection: CollectionId) -> bool {
        let mut current = Some(collection);
        let mut hops = 0usize;
        while let Some(id) = current {
            let Some(record) = self.collections.get(&id) else {
                return false;
            };
            match record.owner_item {
                Some(owner) if owner == item => return true,
                Some(owner) => current = self.collection_of(owner),
                None => return false,
            }
            hops += 1;
            if hops > self.collections.len() {
                return false;
            }
        }
        false
    }
}

impl<V: Clone> Registry<V> {
    /// Rebuild the enabled items of `collection` from the host's rendered
    /// nodes and the collection's current values.
    ///
    /// Nodes beyond the end of `values` are skipped. Zones are reset and must
    /// be recomputed.
    pub fn remap(
        &mut self,
        collection: CollectionId,
        nodes: &[RenderedNode],
        values: &[V],
    ) -> Result<(), RegistryError> {
        let record = self
            .collections
            .get_mut(&collection)
            .ok_or(RegistryError::UnknownCollection { id: collection })?;

        for item in &record.items {
            self.item_owner.remove(&item.id);
        }

        let mut items = Vec::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if !node.draggable {
                continue;
            }
            let Some(value) = values.get(position) else {
                tracing::warn!(
                    target: "reorder.registry",
                    collection = %collection,
                    item = %node.id,
                    position,
                    "rendered node has no backing value"
                );
                continue;
            };
            items.push(ItemRecord {
                id: node.id,
                index: items.len(),
                value: value.clone(),
                zones: ItemZones::NONE,
            });
        }

        for item in &items {
            self.item_owner.insert(item.id, collection);
        }
        record.items = items;
        Ok(())
    }
}

impl<V: fmt::Debug> fmt::Debug for Registry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("collections", &self.collections)
            .finish()
    }
}

/// Registry errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateCollection { id: CollectionId },
    UnknownCollection { id: CollectionId },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateCollection { id } => write!(f, "{id} is already registered"),
            Self::UnknownCollection { id } => write!(f, "{id} is not registered"),
        }
    }
}

impl std::error::Error for RegistryError {}
