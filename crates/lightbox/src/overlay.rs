//! The overlay surface: one subtree appended to `<body>` on first use.

use crate::config::LightboxConfig;
use crate::item::Group;
use anyhow::Error;
use html::{DOM, NodeKey};
use log::{debug, trace};

/// Keys of the overlay's parts. Built once, reused for every open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverlayHandles {
    /// The full-page backdrop; clicks landing on it directly dismiss.
    pub root: NodeKey,
    pub close: NodeKey,
    pub prev: NodeKey,
    pub next: NodeKey,
    pub stage: NodeKey,
    pub image: NodeKey,
    pub caption: NodeKey,
    pub counter: NodeKey,
}

impl OverlayHandles {
    /// Build the overlay subtree under `<body>`, hidden.
    ///
    /// # Errors
    /// Returns an error if any part cannot be inserted.
    pub fn build(dom: &mut DOM, config: &LightboxConfig) -> Result<Self, Error> {
        let body = dom.ensure_body()?;
        let root = dom.create_element(
            body,
            "div",
            &[
                ("class", config.overlay_class.as_str()),
                ("role", "dialog"),
                ("aria-modal", "true"),
                ("aria-hidden", "true"),
                ("aria-label", "Image viewer"),
            ],
        )?;
        let close_class = config.part_class("close");
        let close = dom.create_element(
            root,
            "button",
            &[
                ("class", close_class.as_str()),
                ("type", "button"),
                ("aria-label", "Close"),
            ],
        )?;
        dom.append_text(close, "\u{d7}")?;
        let prev_class = config.part_class("prev");
        let prev = dom.create_element(
            root,
            "button",
            &[
                ("class", prev_class.as_str()),
                ("type", "button"),
                ("aria-label", "Previous image"),
            ],
        )?;
        dom.append_text(prev, "\u{2039}")?;
        let next_class = config.part_class("next");
        let next = dom.create_element(
            root,
            "button",
            &[
                ("class", next_class.as_str()),
                ("type", "button"),
                ("aria-label", "Next image"),
            ],
        )?;
        dom.append_text(next, "\u{203a}")?;
        let stage_class = config.part_class("stage");
        let stage = dom.create_element(root, "figure", &[("class", stage_class.as_str())])?;
        let image_class = config.part_class("image");
        let image = dom.create_element(
            stage,
            "img",
            &[("class", image_class.as_str()), ("src", ""), ("alt", "")],
        )?;
        let caption_class = config.part_class("caption");
        let caption = dom.create_element(stage, "figcaption", &[("class", caption_class.as_str())])?;
        let counter_class = config.part_class("counter");
        let counter = dom.create_element(
            stage,
            "span",
            &[("class", counter_class.as_str()), ("aria-live", "polite")],
        )?;
        debug!("built lightbox overlay at node {}", root.0);
        Ok(Self {
            root,
            close,
            prev,
            next,
            stage,
            image,
            caption,
            counter,
        })
    }

    /// True while every part is still in the document.
    pub fn is_attached(&self, dom: &DOM) -> bool {
        [
            self.root,
            self.close,
            self.prev,
            self.next,
            self.stage,
            self.image,
            self.caption,
            self.counter,
        ]
        .into_iter()
        .all(|key| dom.contains_key(key))
    }

    /// Visibility is read from the document, not from session state.
    pub fn is_visible(&self, dom: &DOM, config: &LightboxConfig) -> bool {
        dom.has_class(self.root, &config.visible_class)
    }

    /// # Errors
    /// Returns an error if the overlay or `<html>` element is gone.
    pub fn show(&self, dom: &mut DOM, config: &LightboxConfig) -> Result<(), Error> {
        dom.add_class(self.root, &config.visible_class)?;
        dom.set_attr(self.root, "aria-hidden", "false")?;
        if let Some(html) = dom.document_element() {
            dom.add_class(html, &config.scroll_lock_class)?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if the overlay is gone.
    pub fn hide(&self, dom: &mut DOM, config: &LightboxConfig) -> Result<(), Error> {
        if let Some(html) = dom.document_element() {
            dom.remove_class(html, &config.scroll_lock_class)?;
        }
        dom.remove_class(self.root, &config.visible_class)?;
        dom.set_attr(self.root, "aria-hidden", "true")
    }

    /// Show item `index` of `group`. Touches only the image source and alt,
    /// the caption and counter text, and the navigation controls' `hidden`
    /// attribute.
    ///
    /// # Errors
    /// Returns an error if an overlay part is gone.
    pub fn render(&self, dom: &mut DOM, group: &Group, index: usize) -> Result<(), Error> {
        let Some(item) = group.get(index) else {
            return Ok(());
        };
        trace!(
            "render {}[{index}] of {}: {}",
            group.name,
            group.len(),
            item.source
        );
        dom.set_attr(self.image, "src", &item.source)?;
        dom.set_attr(self.image, "alt", &item.caption)?;
        dom.set_text_content(self.caption, &item.caption)?;
        let counter = if group.len() > 1 {
            format!("{} / {}", index + 1, group.len())
        } else {
            String::new()
        };
        dom.set_text_content(self.counter, &counter)?;
        for control in [self.prev, self.next] {
            if group.len() > 1 {
                dom.remove_attr(control, "hidden")?;
            } else {
                dom.set_attr(control, "hidden", "")?;
            }
        }
        Ok(())
    }
}
