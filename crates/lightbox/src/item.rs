use crate::config::LightboxConfig;
use html::{DOM, NodeKey};
use serde::Serialize;

/// One browsable image, captured from its anchor at index time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GalleryItem {
    /// The anchor the item was indexed from.
    #[serde(skip)]
    pub link: NodeKey,
    /// Full-size image URI; empty when the anchor has no `href`.
    pub source: String,
    pub caption: String,
}

impl GalleryItem {
    pub fn from_anchor(dom: &DOM, anchor: NodeKey, config: &LightboxConfig) -> Self {
        Self {
            link: anchor,
            source: dom.attr(anchor, "href").unwrap_or_default().to_owned(),
            caption: resolve_caption(dom, anchor, config),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

/// Caption precedence: explicit title attribute, then `title`, then the
/// `alt` of the first image inside the anchor. Empty values fall through.
pub fn resolve_caption(dom: &DOM, anchor: NodeKey, config: &LightboxConfig) -> String {
    non_empty(dom.attr(anchor, &config.title_attr))
        .or_else(|| non_empty(dom.attr(anchor, "title")))
        .or_else(|| {
            let img = dom.first_descendant_by_tag(anchor, "img")?;
            non_empty(dom.attr(img, "alt"))
        })
        .unwrap_or_default()
        .to_owned()
}

/// Ordered items sharing a group name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Group {
    pub name: String,
    pub items: Vec<GalleryItem>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GalleryItem> {
        self.items.get(index)
    }

    /// Index of the first item showing `source`, or 0 when none does.
    pub fn position_of(&self, source: &str) -> usize {
        self.items
            .iter()
            .position(|item| item.source == source)
            .unwrap_or(0)
    }

    /// Wrap a signed index into `0..len`: below zero goes to the last item,
    /// at or past the end goes to the first. `None` for an empty group.
    pub fn wrap(&self, index: isize) -> Option<usize> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        if index < 0 {
            Some(len - 1)
        } else if index as usize >= len {
            Some(0)
        } else {
            Some(index as usize)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_of(sources: &[&str]) -> Group {
        let mut group = Group::new("g");
        for (offset, source) in sources.iter().enumerate() {
            group.items.push(GalleryItem {
                link: NodeKey(offset as u64 + 1),
                source: (*source).to_owned(),
                caption: String::new(),
            });
        }
        group
    }

    #[test]
    fn wrap_is_circular_at_both_ends() {
        let group = group_of(&["/a", "/b", "/c"]);
        assert_eq!(group.wrap(-1), Some(2));
        assert_eq!(group.wrap(3), Some(0));
        assert_eq!(group.wrap(1), Some(1));
        assert_eq!(group_of(&["/a"]).wrap(-1), Some(0));
        assert_eq!(group_of(&["/a"]).wrap(1), Some(0));
        assert_eq!(Group::new("empty").wrap(0), None);
    }

    #[test]
    fn position_prefers_first_duplicate_and_defaults_to_zero() {
        let group = group_of(&["/a", "/b", "/b"]);
        assert_eq!(group.position_of("/b"), 1);
        assert_eq!(group.position_of("/missing"), 0);
    }
}
