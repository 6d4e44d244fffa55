//! Document substrate: an html5ever-parsed DOM held in an indextree arena,
//! mutated through `DOMUpdate` batches, plus the input-event vocabulary used
//! by widgets that live inside the document.

#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod dom;
pub mod events;
pub mod parser;

pub use dom::{DOM, DOMNode, DOMSubscriber, DOMUpdate, NodeKey, NodeKind};
pub use events::{
    ClickEvent, DispatchOutcome, EventKind, Key, KeyEvent, KeyMods, Listeners, MouseButton,
};
