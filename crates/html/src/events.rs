//! Input events delivered by the host and the listener registry that routes
//! them.
//!
//! Listeners are plain values (`H`), not closures: a widget registers route
//! tokens against nodes, asks for the bubbling path of an event and runs its
//! own transition for each token it gets back.

use crate::dom::{DOM, NodeKey};
use std::collections::HashMap;

/// Keyboard modifier flags carried by key and mouse events.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyMods {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyMods {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const fn any(self) -> bool {
        self.ctrl || self.alt || self.shift || self.meta
    }
}

/// Mouse button, numbered as in `MouseEvent.button`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MouseButton {
    #[default]
    Primary,
    Auxiliary,
    Secondary,
    Other(u16),
}

impl MouseButton {
    pub const fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// Logical key of a keydown event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    /// Map a `KeyboardEvent.key` value, including the legacy `Esc`/`Left`/`Right` names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            other => Self::Other(other.to_owned()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: NodeKey,
    pub button: MouseButton,
    pub mods: KeyMods,
}

impl ClickEvent {
    /// An unmodified primary-button click.
    pub const fn primary(target: NodeKey) -> Self {
        Self {
            target,
            button: MouseButton::Primary,
            mods: KeyMods::NONE,
        }
    }

    #[must_use]
    pub const fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    #[must_use]
    pub const fn with_mods(mut self, mods: KeyMods) -> Self {
        self.mods = mods;
        self
    }

    /// True for clicks the browser would turn into "open in new tab/window"
    /// or similar instead of plain navigation.
    pub const fn is_modified(&self) -> bool {
        !matches!(self.button, MouseButton::Primary) || self.mods.any()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub mods: KeyMods,
}

impl KeyEvent {
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            mods: KeyMods::NONE,
        }
    }

    pub fn named(name: &str) -> Self {
        Self::new(Key::from_name(name))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
}

/// What a dispatch did, reported back to the host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The host must not perform the default action (e.g. follow a link).
    pub default_prevented: bool,
    /// At least one listener acted on the event.
    pub handled: bool,
}

impl DispatchOutcome {
    pub fn merge(&mut self, other: Self) {
        self.default_prevented |= other.default_prevented;
        self.handled |= other.handled;
    }
}

/// Registry of listener values keyed by the node they are attached to.
/// Document-level listeners are attached to [`NodeKey::ROOT`].
#[derive(Clone, Debug)]
pub struct Listeners<H> {
    by_node: HashMap<(NodeKey, EventKind), Vec<H>>,
}

impl<H> Default for Listeners<H> {
    fn default() -> Self {
        Self {
            by_node: HashMap::new(),
        }
    }
}

impl<H: Clone> Listeners<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: NodeKey, kind: EventKind, handler: H) {
        self.by_node.entry((node, kind)).or_default().push(handler);
    }

    pub fn add_document(&mut self, kind: EventKind, handler: H) {
        self.add(NodeKey::ROOT, kind, handler);
    }

    /// Keep only the listeners for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeKey, &H) -> bool) {
        for ((node, _), handlers) in &mut self.by_node {
            handlers.retain(|handler| keep(*node, handler));
        }
        self.by_node.retain(|_, handlers| !handlers.is_empty());
    }

    pub fn clear(&mut self) {
        self.by_node.clear();
    }

    pub fn len(&self) -> usize {
        self.by_node.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    pub fn listeners_on(&self, node: NodeKey, kind: EventKind) -> &[H] {
        self.by_node
            .get(&(node, kind))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Listeners an event of `kind` at `target` reaches while bubbling,
    /// innermost first and the document last, paired with the node each one
    /// is attached to (the event's current target). Registration order is
    /// kept within a node.
    pub fn dispatch_path(&self, dom: &DOM, target: NodeKey, kind: EventKind) -> Vec<(NodeKey, H)> {
        let mut path: Vec<(NodeKey, H)> = Vec::new();
        let mut chain = dom.ancestors(target);
        if chain.is_empty() {
            // Detached or stale targets still reach document listeners.
            chain.push(NodeKey::ROOT);
        }
        for node in chain {
            for handler in self.listeners_on(node, kind) {
                path.push((node, handler.clone()));
            }
        }
        path
    }
}
