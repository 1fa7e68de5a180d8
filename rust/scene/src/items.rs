// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The parser's geometry item table.
//!
//! Each parsed geometry item may reference a mesh node in the scene graph.
//! Loaders occasionally leave those nodes detached from the model root; the
//! table is then the only place the geometry can still be found.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::keys::NodeKey;

/// Opaque identifier of a parsed geometry item (an IFC express ID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A leaf unit of renderable geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryItem {
    pub id: ItemId,
    /// Mesh node produced for this item, if the parser emitted one
    pub mesh: Option<NodeKey>,
}

/// Item ID → geometry item. Iteration order is unspecified.
#[derive(Debug, Clone, Default)]
pub struct ItemTable {
    items: FxHashMap<ItemId, GeometryItem>,
}

impl ItemTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item, replacing any previous entry with the same ID.
    pub fn insert(&mut self, id: ItemId, mesh: Option<NodeKey>) -> Option<GeometryItem> {
        self.items.insert(id, GeometryItem { id, mesh })
    }

    pub fn get(&self, id: ItemId) -> Option<&GeometryItem> {
        self.items.get(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeometryItem> {
        self.items.values()
    }

    /// Number of items that carry a mesh
    pub fn mesh_count(&self) -> usize {
        self.items.values().filter(|i| i.mesh.is_some()).count()
    }
}

impl FromIterator<(ItemId, Option<NodeKey>)> for ItemTable {
    fn from_iter<I: IntoIterator<Item = (ItemId, Option<NodeKey>)>>(iter: I) -> Self {
        let mut table = ItemTable::new();
        for (id, mesh) in iter {
            table.insert(id, mesh);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeData, SceneGraph};

    #[test]
    fn insert_replaces_same_id() {
        let mut graph = SceneGraph::new();
        let a = graph.add_node(NodeData::group());
        let mut table = ItemTable::new();
        assert!(table.insert(ItemId(7), None).is_none());
        let previous = table.insert(ItemId(7), Some(a)).unwrap();
        assert_eq!(previous.mesh, None);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(ItemId(7)).unwrap().mesh, Some(a));
    }

    #[test]
    fn mesh_count_skips_empty_items() {
        let mut graph = SceneGraph::new();
        let a = graph.add_node(NodeData::group());
        let table: ItemTable = [(ItemId(1), Some(a)), (ItemId(2), None)].into_iter().collect();
        assert_eq!(table.len(), 2);
        assert_eq!(table.mesh_count(), 1);
    }

    #[test]
    fn item_id_display() {
        assert_eq!(ItemId(42).to_string(), "#42");
    }
}
