//! HTML parsing on top of html5ever.
//!
//! html5ever builds an `RcDom`, which is then walked and turned into a batch
//! of `DOMUpdate`s. Applying the batch is left to the caller, so parsed
//! markup reaches subscribers the same way any other mutation does.

use crate::dom::{DOM, DOMUpdate, NodeKey};
use anyhow::{Error, Result};
use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use log::debug;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::collections::HashMap;

/// Which part of the parsed document is turned into updates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParseScope {
    /// The whole document (`<html>` and everything below it).
    Document,
    /// Only the children of the implied `<body>`; used for markup injected
    /// into an existing element.
    Fragment,
}

struct ParserState<'parser_state> {
    updates: &'parser_state mut Vec<DOMUpdate>,
    position_map: HashMap<NodeKey, usize>,
    next_key: &'parser_state mut u64,
}

impl ParserState<'_> {
    fn mint(&mut self) -> NodeKey {
        let key = NodeKey(*self.next_key);
        *self.next_key += 1;
        key
    }

    fn next_pos(&mut self, parent: NodeKey) -> usize {
        let slot = self.position_map.entry(parent).or_insert(0);
        let pos = *slot;
        *slot += 1;
        pos
    }
}

fn walk_tree(handle: &Handle, parent_key: NodeKey, state: &mut ParserState<'_>) {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let node_key = state.mint();
            let pos = state.next_pos(parent_key);
            state.updates.push(DOMUpdate::InsertElement {
                parent: parent_key,
                node: node_key,
                tag: name.local.to_string(),
                pos,
            });
            for attr in attrs.borrow().iter() {
                state.updates.push(DOMUpdate::SetAttr {
                    node: node_key,
                    name: attr.name.local.to_string(),
                    value: attr.value.to_string(),
                });
            }
            for child in handle.children.borrow().iter() {
                walk_tree(child, node_key, state);
            }
        }
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            if !text.trim().is_empty() {
                let node_key = state.mint();
                let pos = state.next_pos(parent_key);
                state.updates.push(DOMUpdate::InsertText {
                    parent: parent_key,
                    node: node_key,
                    text,
                    pos,
                });
            }
        }
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                walk_tree(child, parent_key, state);
            }
        }
        NodeData::Doctype { .. }
        | NodeData::Comment { .. }
        | NodeData::ProcessingInstruction { .. } => {}
    }
}

fn element_child(handle: &Handle, tag: &str) -> Option<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, NodeData::Element { name, .. } if &*name.local == tag))
        .cloned()
}

/// Parse `html` into updates inserting under `parent`, starting at child
/// position `first_pos`. Keys are minted from `next_key`.
///
/// # Errors
/// Returns an error if html5ever fails to read the input.
pub fn parse_html_to_updates(
    html: &str,
    parent: NodeKey,
    first_pos: usize,
    scope: ParseScope,
    next_key: &mut u64,
) -> Result<Vec<DOMUpdate>> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };

    let parsed = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())?;

    let mut updates = Vec::new();
    let mut state = ParserState {
        updates: &mut updates,
        position_map: HashMap::from([(parent, first_pos)]),
        next_key,
    };
    match scope {
        ParseScope::Document => walk_tree(&parsed.document, parent, &mut state),
        ParseScope::Fragment => {
            let body = element_child(&parsed.document, "html")
                .and_then(|html_el| element_child(&html_el, "body"));
            if let Some(body) = body {
                for child in body.children.borrow().iter() {
                    walk_tree(child, parent, &mut state);
                }
            }
        }
    }
    Ok(updates)
}

impl DOM {
    /// Parse a complete document.
    ///
    /// # Errors
    /// Returns an error if parsing or applying the resulting updates fails.
    pub fn parse(html: &str) -> Result<Self, Error> {
        let mut dom = Self::new();
        let mut updates = parse_html_to_updates(
            html,
            NodeKey::ROOT,
            0,
            ParseScope::Document,
            &mut dom.next_key,
        )?;
        updates.push(DOMUpdate::EndOfDocument);
        debug!("parsed document into {} updates", updates.len());
        dom.apply_batch(updates)?;
        Ok(dom)
    }

    /// Parse a markup fragment and append it to `parent`, returning the keys
    /// of the top-level nodes that were inserted.
    ///
    /// # Errors
    /// Returns an error if `parent` is unknown or parsing fails.
    pub fn inject_html(&mut self, parent: NodeKey, html: &str) -> Result<Vec<NodeKey>, Error> {
        self.id_of(parent)?;
        let first_pos = self.children(parent).len();
        let updates = parse_html_to_updates(
            html,
            parent,
            first_pos,
            ParseScope::Fragment,
            &mut self.next_key,
        )?;
        let top_level: Vec<NodeKey> = updates
            .iter()
            .filter_map(|update| match update {
                DOMUpdate::InsertElement {
                    parent: target,
                    node,
                    ..
                }
                | DOMUpdate::InsertText {
                    parent: target,
                    node,
                    ..
                } if *target == parent => Some(*node),
                _ => None,
            })
            .collect();
        debug!(
            "injecting {} nodes under node {}",
            top_level.len(),
            parent.0
        );
        self.apply_batch(updates)?;
        Ok(top_level)
    }
}
