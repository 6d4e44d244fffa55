use super::{DOM, DOMNode, NodeKey, NodeKind};
use anyhow::{Error, anyhow, bail};
use log::trace;
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DOMUpdate {
    /// Insert an element as child number `pos` of `parent`; positions past
    /// the end append.
    InsertElement {
        parent: NodeKey,
        node: NodeKey,
        tag: String,
        pos: usize,
    },
    InsertText {
        parent: NodeKey,
        node: NodeKey,
        text: String,
        pos: usize,
    },
    SetAttr {
        node: NodeKey,
        name: String,
        value: String,
    },
    RemoveAttr {
        node: NodeKey,
        name: String,
    },
    RemoveNode {
        node: NodeKey,
    },
    EndOfDocument,
}

/// Observes every update after the DOM has applied it.
pub trait DOMSubscriber {
    /// # Errors
    /// Implementations may fail; the error is returned from `DOM::apply_update`.
    fn apply_update(&mut self, update: &DOMUpdate) -> Result<(), Error>;
}

impl DOM {
    /// Register a subscriber for all future updates.
    pub fn subscribe(&mut self, subscriber: Box<dyn DOMSubscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Apply a batch in order, stopping at the first failing update.
    ///
    /// # Errors
    /// Returns the first error produced by [`DOM::apply_update`].
    pub fn apply_batch(&mut self, batch: Vec<DOMUpdate>) -> Result<(), Error> {
        for update in batch {
            self.apply_update(update)?;
        }
        Ok(())
    }

    /// Apply one update, then forward it to the subscribers.
    ///
    /// # Errors
    /// Returns an error if the update references an unknown node, inserts a
    /// key twice, sets attributes on a non-element or removes the document.
    pub fn apply_update(&mut self, update: DOMUpdate) -> Result<(), Error> {
        match &update {
            DOMUpdate::InsertElement {
                parent,
                node,
                tag,
                pos,
            } => {
                let kind = NodeKind::Element {
                    tag: tag.to_ascii_lowercase(),
                };
                self.insert(*parent, *node, kind, *pos)?;
            }
            DOMUpdate::InsertText {
                parent,
                node,
                text,
                pos,
            } => {
                let kind = NodeKind::Text { text: text.clone() };
                self.insert(*parent, *node, kind, *pos)?;
            }
            DOMUpdate::SetAttr { node, name, value } => {
                let data = self.element_mut(*node)?;
                let name_lc = name.to_ascii_lowercase();
                if let Some(slot) = data
                    .attrs
                    .iter_mut()
                    .find(|(attr_name, _)| *attr_name == name_lc)
                {
                    slot.1.clone_from(value);
                } else {
                    data.attrs.push((name_lc, value.clone()));
                }
            }
            DOMUpdate::RemoveAttr { node, name } => {
                let data = self.element_mut(*node)?;
                let name_lc = name.to_ascii_lowercase();
                data.attrs.retain(|(attr_name, _)| *attr_name != name_lc);
            }
            DOMUpdate::RemoveNode { node } => self.remove(*node)?,
            DOMUpdate::EndOfDocument => trace!("end of document"),
        }
        for subscriber in &mut self.subscribers {
            subscriber.apply_update(&update)?;
        }
        Ok(())
    }

    fn insert(
        &mut self,
        parent: NodeKey,
        node: NodeKey,
        kind: NodeKind,
        pos: usize,
    ) -> Result<(), Error> {
        if self.nodes.contains_key(&node) {
            bail!("node key {} already inserted", node.0);
        }
        let parent_id = self.id_of(parent)?;
        let id = self.dom.new_node(DOMNode {
            key: node,
            kind,
            attrs: SmallVec::new(),
        });
        let sibling = parent_id.children(&self.dom).nth(pos);
        let attached = match sibling {
            Some(sibling) => sibling.checked_insert_before(id, &mut self.dom),
            None => parent_id.checked_append(id, &mut self.dom),
        };
        attached.map_err(|err| anyhow!("cannot insert node {}: {err}", node.0))?;
        self.nodes.insert(node, id);
        // Keep minted keys ahead of keys supplied by the caller.
        self.next_key = self.next_key.max(node.0 + 1);
        Ok(())
    }

    fn element_mut(&mut self, key: NodeKey) -> Result<&mut DOMNode, Error> {
        let id = self.id_of(key)?;
        let data = self
            .dom
            .get_mut(id)
            .ok_or_else(|| anyhow!("node {} missing from arena", key.0))?
            .get_mut();
        if !data.is_element() {
            bail!("node {} is not an element", key.0);
        }
        Ok(data)
    }

    fn remove(&mut self, key: NodeKey) -> Result<(), Error> {
        if key == NodeKey::ROOT {
            bail!("the document node cannot be removed");
        }
        let id = self.id_of(key)?;
        for removed in self.subtree(key) {
            self.nodes.remove(&removed);
            if self.focused == Some(removed) {
                self.focused = None;
            }
        }
        id.remove_subtree(&mut self.dom);
        Ok(())
    }
}
