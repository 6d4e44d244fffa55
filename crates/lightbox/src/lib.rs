//! Image-gallery overlay for documents held in an [`html::DOM`].
//!
//! Anchors carrying a group marker attribute are indexed into named groups.
//! Clicking one opens a shared overlay on that group; prev/next controls and
//! the arrow keys browse it circularly, and the close control, the backdrop
//! or Escape dismiss it.
//!
//! ```no_run
//! use html::{ClickEvent, DOM, KeyEvent};
//! use lightbox::{Lightbox, LightboxConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut dom = DOM::parse(r#"<a data-lightbox="trip" href="/a.jpg">A</a>"#)?;
//! let mut lightbox = Lightbox::attach(&dom, LightboxConfig::default());
//! let anchor = dom.elements_with_attr("data-lightbox")[0];
//! let outcome = lightbox.handle_click(&mut dom, &ClickEvent::primary(anchor));
//! assert!(outcome.default_prevented);
//! lightbox.handle_key(&mut dom, &KeyEvent::named("Escape"));
//! # Ok(())
//! # }
//! ```

#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod config;
pub mod controller;
pub mod gallery;
pub mod indexer;
pub mod item;
pub mod overlay;

pub use config::LightboxConfig;
pub use controller::{OverlayController, SessionState};
pub use gallery::{Lightbox, Route};
pub use indexer::{GroupIndexer, GroupTable};
pub use item::{GalleryItem, Group, resolve_caption};
pub use overlay::OverlayHandles;
