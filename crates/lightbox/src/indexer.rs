//! Partition marked-up anchors into named groups.

use crate::config::LightboxConfig;
use crate::item::{GalleryItem, Group};
use html::{DOM, NodeKey};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// All groups found in one scan of the document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupTable {
    groups: HashMap<String, Group>,
    /// Group names in the order they first appear in the document.
    order: Vec<String>,
}

#[derive(Serialize)]
struct GroupSnapshot<'table> {
    groups: Vec<&'table Group>,
}

impl GroupTable {
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Groups in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.order.iter().filter_map(|name| self.groups.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.groups.values().map(Group::len).sum()
    }

    /// Every indexed item with the name of its group, groups in
    /// first-appearance order and items in document order.
    pub fn anchors(&self) -> impl Iterator<Item = (&str, &GalleryItem)> {
        self.iter().flat_map(|group| {
            group
                .items
                .iter()
                .map(move |item| (group.name.as_str(), item))
        })
    }

    fn push(&mut self, name: &str, item: GalleryItem) {
        if !self.groups.contains_key(name) {
            self.order.push(name.to_owned());
        }
        self.groups
            .entry(name.to_owned())
            .or_insert_with(|| Group::new(name))
            .items
            .push(item);
    }

    /// Deterministic JSON of the groups and their items.
    pub fn to_json_value(&self) -> serde_json::Value {
        let snapshot = GroupSnapshot {
            groups: self.iter().collect(),
        };
        serde_json::to_value(snapshot).unwrap_or_default()
    }
}

/// Scans a document for elements carrying the group marker attribute.
#[derive(Clone, Debug)]
pub struct GroupIndexer {
    config: LightboxConfig,
}

impl GroupIndexer {
    pub const fn new(config: LightboxConfig) -> Self {
        Self { config }
    }

    /// Group name declared by `anchor`, verbatim. Only an empty value falls
    /// back to the default group; whitespace is significant.
    pub fn group_name_of<'dom>(&'dom self, dom: &'dom DOM, anchor: NodeKey) -> &'dom str {
        dom.attr(anchor, &self.config.group_attr)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.config.default_group)
    }

    /// Build a fresh table from the current markup. Document order is kept
    /// within each group; calling this twice on unchanged markup yields equal
    /// tables.
    pub fn index(&self, dom: &DOM) -> GroupTable {
        let mut table = GroupTable::default();
        for anchor in dom.elements_with_attr(&self.config.group_attr) {
            let name = self.group_name_of(dom, anchor);
            let item = GalleryItem::from_anchor(dom, anchor, &self.config);
            table.push(name, item);
        }
        debug!(
            "indexed {} lightbox items into {} groups",
            table.item_count(),
            table.len()
        );
        table
    }
}
