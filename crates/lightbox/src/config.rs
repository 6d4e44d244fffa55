//! Attribute and class names the lightbox reads from and writes to the
//! document.
//!
//! Configuration can be constructed programmatically, deserialized from JSON
//! or loaded from environment variables. Empty values fall back to the
//! defaults so a partially filled config never produces unusable selectors.

use anyhow::{Context as _, Error};
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_GROUP_ATTR: &str = "data-lightbox";
pub const DEFAULT_TITLE_ATTR: &str = "data-title";
pub const DEFAULT_GROUP: &str = "default";
pub const DEFAULT_OVERLAY_CLASS: &str = "lightbox";
pub const DEFAULT_VISIBLE_CLASS: &str = "is-visible";
pub const DEFAULT_SCROLL_LOCK_CLASS: &str = "lightbox-open";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightboxConfig {
    /// Marker attribute whose value names the group.
    pub group_attr: String,
    /// Explicit caption attribute, checked before `title`.
    pub title_attr: String,
    /// Group used when the marker attribute is empty.
    pub default_group: String,
    /// Class of the overlay root; also the prefix of its parts' classes.
    pub overlay_class: String,
    /// Class toggled on the overlay root while it is shown.
    pub visible_class: String,
    /// Class toggled on `<html>` to lock page scrolling.
    pub scroll_lock_class: String,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            group_attr: DEFAULT_GROUP_ATTR.to_owned(),
            title_attr: DEFAULT_TITLE_ATTR.to_owned(),
            default_group: DEFAULT_GROUP.to_owned(),
            overlay_class: DEFAULT_OVERLAY_CLASS.to_owned(),
            visible_class: DEFAULT_VISIBLE_CLASS.to_owned(),
            scroll_lock_class: DEFAULT_SCROLL_LOCK_CLASS.to_owned(),
        }
    }
}

fn or_default(value: &mut String, default: &str) {
    if value.trim().is_empty() {
        default.clone_into(value);
    }
}

/// A class name must be a single token: surrounding whitespace is dropped,
/// and a value that is still blank or holds inner whitespace is replaced.
fn class_or_default(value: &mut String, default: &str) {
    let token = value.trim();
    if token.is_empty() {
        default.clone_into(value);
    } else if token.contains(char::is_whitespace) {
        warn!("class name {value:?} is not a single token; using {default:?}");
        default.clone_into(value);
    } else {
        *value = token.to_owned();
    }
}

impl LightboxConfig {
    /// Parse a JSON object; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error if `json` is not a valid config object.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).context("invalid lightbox configuration")?;
        Ok(config.normalized())
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `LIGHTBOX_GROUP_ATTR`: marker attribute (default: `data-lightbox`)
    /// - `LIGHTBOX_DEFAULT_GROUP`: sentinel group name (default: `default`)
    /// - `LIGHTBOX_SCROLL_LOCK_CLASS`: class put on `<html>` while open
    ///   (default: `lightbox-open`)
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(val) = env::var("LIGHTBOX_GROUP_ATTR") {
            config.group_attr = val;
        }
        if let Ok(val) = env::var("LIGHTBOX_DEFAULT_GROUP") {
            config.default_group = val;
        }
        if let Ok(val) = env::var("LIGHTBOX_SCROLL_LOCK_CLASS") {
            config.scroll_lock_class = val;
        }
        config.normalized()
    }

    /// Replace blank values and multi-token class names with defaults, and
    /// lowercase attribute names.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        or_default(&mut self.group_attr, DEFAULT_GROUP_ATTR);
        or_default(&mut self.title_attr, DEFAULT_TITLE_ATTR);
        or_default(&mut self.default_group, DEFAULT_GROUP);
        class_or_default(&mut self.overlay_class, DEFAULT_OVERLAY_CLASS);
        class_or_default(&mut self.visible_class, DEFAULT_VISIBLE_CLASS);
        class_or_default(&mut self.scroll_lock_class, DEFAULT_SCROLL_LOCK_CLASS);
        self.group_attr = self.group_attr.trim().to_ascii_lowercase();
        self.title_attr = self.title_attr.trim().to_ascii_lowercase();
        self
    }

    /// Class of an overlay part, e.g. `lightbox__close`.
    pub fn part_class(&self, part: &str) -> String {
        format!("{}__{part}", self.overlay_class)
    }
}
