//! The document tree.
//!
//! Nodes live in an indextree arena and are addressed from the outside only
//! through stable [`NodeKey`]s. Every mutation goes through a [`DOMUpdate`],
//! so subscribers observe exactly what changed.

mod printing;
mod updating;

pub use updating::{DOMSubscriber, DOMUpdate};

use anyhow::{Error, anyhow};
use indextree::{Arena, Node, NodeId};
use smallvec::SmallVec;
use std::collections::HashMap;

/// A 64-bit stable key for DOM nodes, valid until the node is removed.
/// The default key is the document root.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

impl NodeKey {
    /// The document node key (always present).
    pub const ROOT: Self = Self(0);
}

#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DOMNode {
    pub key: NodeKey,
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
}

impl DOMNode {
    /// Lowercased tag name for elements.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            NodeKind::Document | NodeKind::Text { .. } => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr_name, _)| attr_name == name)
            .map(|(_, value)| value.as_str())
    }

    pub const fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }
}

pub struct DOM {
    dom: Arena<DOMNode>,
    root: NodeId,
    nodes: HashMap<NodeKey, NodeId>,
    /// Next key handed out by [`DOM::mint_key`]; shared with the parser.
    pub(crate) next_key: u64,
    focused: Option<NodeKey>,
    subscribers: Vec<Box<dyn DOMSubscriber>>,
}

impl Default for DOM {
    fn default() -> Self {
        Self::new()
    }
}

impl DOM {
    pub fn new() -> Self {
        let mut dom = Arena::new();
        let root = dom.new_node(DOMNode::default());
        let mut nodes = HashMap::new();
        nodes.insert(NodeKey::ROOT, root);
        Self {
            dom,
            root,
            nodes,
            next_key: 1,
            focused: None,
            subscribers: Vec::new(),
        }
    }

    pub const fn root(&self) -> NodeKey {
        NodeKey::ROOT
    }

    /// Mint a key for a node that is about to be inserted.
    pub fn mint_key(&mut self) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        key
    }

    pub(crate) fn id_of(&self, key: NodeKey) -> Result<NodeId, Error> {
        self.nodes
            .get(&key)
            .copied()
            .ok_or_else(|| anyhow!("unknown node key {}", key.0))
    }

    fn key_at(&self, id: NodeId) -> Option<NodeKey> {
        self.dom
            .get(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get().key)
    }

    pub fn node(&self, key: NodeKey) -> Option<&DOMNode> {
        let id = self.nodes.get(&key)?;
        self.dom.get(*id).map(Node::get)
    }

    pub fn contains_key(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        let id = self.nodes.get(&key)?;
        let parent = self.dom.get(*id)?.parent()?;
        self.key_at(parent)
    }

    pub fn children(&self, key: NodeKey) -> Vec<NodeKey> {
        self.nodes.get(&key).map_or_else(Vec::new, |id| {
            id.children(&self.dom)
                .filter_map(|child| self.key_at(child))
                .collect()
        })
    }

    /// The node followed by all of its descendants, in document order.
    pub fn subtree(&self, key: NodeKey) -> Vec<NodeKey> {
        self.nodes.get(&key).map_or_else(Vec::new, |id| {
            id.descendants(&self.dom)
                .filter_map(|node| self.key_at(node))
                .collect()
        })
    }

    /// The node followed by its ancestors up to the document.
    pub fn ancestors(&self, key: NodeKey) -> Vec<NodeKey> {
        self.nodes.get(&key).map_or_else(Vec::new, |id| {
            id.ancestors(&self.dom)
                .filter_map(|node| self.key_at(node))
                .collect()
        })
    }

    /// True when `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        self.ancestors(node).contains(&ancestor)
    }

    pub fn tag_name(&self, key: NodeKey) -> Option<&str> {
        self.node(key).and_then(DOMNode::tag)
    }

    pub fn attr(&self, key: NodeKey, name: &str) -> Option<&str> {
        self.node(key).and_then(|node| node.attr(name))
    }

    pub fn has_attr(&self, key: NodeKey, name: &str) -> bool {
        self.attr(key, name).is_some()
    }

    pub fn has_class(&self, key: NodeKey, class: &str) -> bool {
        self.attr(key, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|token| token == class))
    }

    /// Elements carrying the attribute `name`, in document order.
    pub fn elements_with_attr(&self, name: &str) -> Vec<NodeKey> {
        self.root
            .descendants(&self.dom)
            .filter_map(|id| self.dom.get(id))
            .filter(|node| !node.is_removed())
            .map(Node::get)
            .filter(|node| node.is_element() && node.attr(name).is_some())
            .map(|node| node.key)
            .collect()
    }

    /// First element below `key` (excluding `key` itself) with the given tag.
    pub fn first_descendant_by_tag(&self, key: NodeKey, tag: &str) -> Option<NodeKey> {
        let needle = tag.to_ascii_lowercase();
        self.subtree(key)
            .into_iter()
            .skip(1)
            .find(|candidate| self.tag_name(*candidate) == Some(needle.as_str()))
    }

    /// Element with the given id attribute (case-sensitive); the first one wins.
    pub fn element_by_id(&self, id: &str) -> Option<NodeKey> {
        self.subtree(NodeKey::ROOT)
            .into_iter()
            .find(|key| self.attr(*key, "id") == Some(id))
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> Option<NodeKey> {
        self.children(NodeKey::ROOT)
            .into_iter()
            .find(|key| self.tag_name(*key) == Some("html"))
    }

    pub fn body(&self) -> Option<NodeKey> {
        let html = self.document_element()?;
        self.children(html)
            .into_iter()
            .find(|key| self.tag_name(*key) == Some("body"))
    }

    /// Return the `<body>` element, creating `<html>` and `<body>` when the
    /// document lacks them.
    ///
    /// # Errors
    /// Returns an error if inserting the missing elements fails.
    pub fn ensure_body(&mut self) -> Result<NodeKey, Error> {
        if let Some(body) = self.body() {
            return Ok(body);
        }
        let html = match self.document_element() {
            Some(html) => html,
            None => self.create_element(NodeKey::ROOT, "html", &[])?,
        };
        self.create_element(html, "body", &[])
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, key: NodeKey) -> String {
        let mut out = String::new();
        for node in self.subtree(key) {
            if let Some(DOMNode {
                kind: NodeKind::Text { text },
                ..
            }) = self.node(node)
            {
                out.push_str(text);
            }
        }
        out
    }

    pub const fn active_element(&self) -> Option<NodeKey> {
        self.focused
    }

    /// Move focus to `key`.
    ///
    /// # Errors
    /// Returns an error if the node does not exist or is not an element.
    pub fn focus(&mut self, key: NodeKey) -> Result<(), Error> {
        match self.node(key) {
            Some(node) if node.is_element() => {
                self.focused = Some(key);
                Ok(())
            }
            Some(_) => Err(anyhow!("node {} is not focusable", key.0)),
            None => Err(anyhow!("unknown node key {}", key.0)),
        }
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }
}

/// Mutation helpers. Each one is expressed as one or more `DOMUpdate`s.
impl DOM {
    /// Append a new element under `parent` and return its key.
    ///
    /// # Errors
    /// Returns an error if `parent` does not exist.
    pub fn create_element(
        &mut self,
        parent: NodeKey,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> Result<NodeKey, Error> {
        let node = self.mint_key();
        let mut batch = Vec::with_capacity(attrs.len() + 1);
        batch.push(DOMUpdate::InsertElement {
            parent,
            node,
            tag: tag.to_ascii_lowercase(),
            pos: usize::MAX,
        });
        for (name, value) in attrs {
            batch.push(DOMUpdate::SetAttr {
                node,
                name: (*name).to_owned(),
                value: (*value).to_owned(),
            });
        }
        self.apply_batch(batch)?;
        Ok(node)
    }

    /// Append a text node under `parent` and return its key.
    ///
    /// # Errors
    /// Returns an error if `parent` does not exist.
    pub fn append_text(&mut self, parent: NodeKey, text: &str) -> Result<NodeKey, Error> {
        let node = self.mint_key();
        self.apply_update(DOMUpdate::InsertText {
            parent,
            node,
            text: text.to_owned(),
            pos: usize::MAX,
        })?;
        Ok(node)
    }

    /// # Errors
    /// Returns an error if the node does not exist or is not an element.
    pub fn set_attr(&mut self, node: NodeKey, name: &str, value: &str) -> Result<(), Error> {
        self.apply_update(DOMUpdate::SetAttr {
            node,
            name: name.to_owned(),
            value: value.to_owned(),
        })
    }

    /// # Errors
    /// Returns an error if the node does not exist.
    pub fn remove_attr(&mut self, node: NodeKey, name: &str) -> Result<(), Error> {
        if !self.has_attr(node, name) {
            self.id_of(node)?;
            return Ok(());
        }
        self.apply_update(DOMUpdate::RemoveAttr {
            node,
            name: name.to_owned(),
        })
    }

    /// # Errors
    /// Returns an error if the node does not exist or is the document.
    pub fn remove_node(&mut self, node: NodeKey) -> Result<(), Error> {
        self.apply_update(DOMUpdate::RemoveNode { node })
    }

    /// Replace all children of `node` with a single text node.
    /// An empty string leaves the node without children.
    ///
    /// # Errors
    /// Returns an error if the node does not exist.
    pub fn set_text_content(&mut self, node: NodeKey, text: &str) -> Result<(), Error> {
        self.id_of(node)?;
        let mut batch: Vec<DOMUpdate> = self
            .children(node)
            .into_iter()
            .map(|child| DOMUpdate::RemoveNode { node: child })
            .collect();
        if !text.is_empty() {
            let text_key = self.mint_key();
            batch.push(DOMUpdate::InsertText {
                parent: node,
                node: text_key,
                text: text.to_owned(),
                pos: 0,
            });
        }
        self.apply_batch(batch)
    }

    /// Add a class token if it is not already present.
    ///
    /// # Errors
    /// Returns an error if the node does not exist or is not an element.
    pub fn add_class(&mut self, node: NodeKey, class: &str) -> Result<(), Error> {
        if self.has_class(node, class) {
            return Ok(());
        }
        let value = match self.attr(node, "class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {class}", existing.trim())
            }
            _ => class.to_owned(),
        };
        self.set_attr(node, "class", &value)
    }

    /// Remove every occurrence of a class token.
    ///
    /// # Errors
    /// Returns an error if the node does not exist or is not an element.
    pub fn remove_class(&mut self, node: NodeKey, class: &str) -> Result<(), Error> {
        if !self.has_class(node, class) {
            return Ok(());
        }
        let value = self
            .attr(node, "class")
            .unwrap_or_default()
            .split_whitespace()
            .filter(|token| *token != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(node, "class", &value)
    }
}
