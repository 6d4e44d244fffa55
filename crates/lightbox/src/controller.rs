//! Session state machine: `Closed` or `Open(group, index)`.
//!
//! Transitions never fail from the caller's point of view. DOM errors (a
//! part of the overlay removed behind our back, for instance) are logged and
//! the transition degrades instead.

use crate::config::LightboxConfig;
use crate::indexer::GroupTable;
use crate::overlay::OverlayHandles;
use anyhow::Error;
use html::{DOM, NodeKey};
use log::{debug, trace, warn};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Closed,
    Open {
        group: String,
        index: usize,
    },
}

#[derive(Debug)]
pub struct OverlayController {
    config: LightboxConfig,
    overlay: Option<OverlayHandles>,
    state: SessionState,
    /// Element that had focus before opening; focus returns there on hide.
    opener: Option<NodeKey>,
}

impl OverlayController {
    pub const fn new(config: LightboxConfig) -> Self {
        Self {
            config,
            overlay: None,
            state: SessionState::Closed,
            opener: None,
        }
    }

    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_group(&self) -> Option<&str> {
        match &self.state {
            SessionState::Open { group, .. } => Some(group.as_str()),
            SessionState::Closed => None,
        }
    }

    /// `None` is the unset index of a closed session.
    pub const fn current_index(&self) -> Option<usize> {
        match &self.state {
            SessionState::Open { index, .. } => Some(*index),
            SessionState::Closed => None,
        }
    }

    pub const fn overlay(&self) -> Option<&OverlayHandles> {
        self.overlay.as_ref()
    }

    /// Whether the overlay is shown, as recorded in the document.
    pub fn is_visible(&self, dom: &DOM) -> bool {
        self.overlay
            .is_some_and(|overlay| overlay.is_visible(dom, &self.config))
    }

    /// Build the overlay unless it already exists. Building twice is a no-op.
    ///
    /// # Errors
    /// Returns an error if the overlay cannot be inserted into the document.
    pub fn ensure_overlay(&mut self, dom: &mut DOM) -> Result<OverlayHandles, Error> {
        if let Some(overlay) = self.overlay {
            if overlay.is_attached(dom) {
                return Ok(overlay);
            }
            warn!("lightbox overlay was removed from the document; rebuilding it");
        }
        let overlay = OverlayHandles::build(dom, &self.config)?;
        self.overlay = Some(overlay);
        Ok(overlay)
    }

    /// Open `group` at the first item whose source is `source`, or at the
    /// first item when none matches. Returns whether the overlay is now
    /// showing. An unknown or empty group displays nothing.
    pub fn open(
        &mut self,
        dom: &mut DOM,
        groups: &GroupTable,
        group: &str,
        source: &str,
        opener: Option<NodeKey>,
    ) -> bool {
        match self.try_open(dom, groups, group, source, opener) {
            Ok(shown) => shown,
            Err(err) => {
                warn!("failed to open lightbox group {group:?}: {err:#}");
                false
            }
        }
    }

    fn try_open(
        &mut self,
        dom: &mut DOM,
        groups: &GroupTable,
        group: &str,
        source: &str,
        opener: Option<NodeKey>,
    ) -> Result<bool, Error> {
        let overlay = self.ensure_overlay(dom)?;
        let Some(items) = groups.get(group).filter(|items| !items.is_empty()) else {
            debug!("lightbox group {group:?} has no items; nothing to show");
            return Ok(false);
        };
        let index = items.position_of(source);
        debug!("opening lightbox group {group:?} at {index}");
        if matches!(self.state, SessionState::Closed) {
            self.opener = opener.or_else(|| dom.active_element());
        }
        self.state = SessionState::Open {
            group: group.to_owned(),
            index,
        };
        overlay.show(dom, &self.config)?;
        overlay.render(dom, items, index)?;
        dom.focus(overlay.close)?;
        Ok(true)
    }

    /// Show item `index` of the open group, wrapping at both ends. Does
    /// nothing while closed or when the open group has no items.
    pub fn show_index(&mut self, dom: &mut DOM, groups: &GroupTable, index: isize) -> bool {
        let (Some(overlay), SessionState::Open { group, .. }) = (self.overlay, &self.state) else {
            return false;
        };
        let Some(items) = groups.get(group) else {
            return false;
        };
        let Some(wrapped) = items.wrap(index) else {
            return false;
        };
        trace!("lightbox {group:?}: {index} -> {wrapped}");
        let group = group.clone();
        if let Err(err) = overlay.render(dom, items, wrapped) {
            warn!("failed to render lightbox item {wrapped}: {err:#}");
            return false;
        }
        self.state = SessionState::Open {
            group,
            index: wrapped,
        };
        true
    }

    pub fn next(&mut self, dom: &mut DOM, groups: &GroupTable) -> bool {
        self.step(dom, groups, 1)
    }

    pub fn prev(&mut self, dom: &mut DOM, groups: &GroupTable) -> bool {
        self.step(dom, groups, -1)
    }

    fn step(&mut self, dom: &mut DOM, groups: &GroupTable, delta: isize) -> bool {
        let Some(current) = self.current_index() else {
            return false;
        };
        self.show_index(dom, groups, current as isize + delta)
    }

    /// Close the session: hide the overlay, release the scroll lock, reset
    /// the index and hand focus back to the opener. Returns whether a
    /// session was open.
    pub fn hide(&mut self, dom: &mut DOM) -> bool {
        let was_open = matches!(self.state, SessionState::Open { .. });
        self.state = SessionState::Closed;
        if let Some(overlay) = self.overlay
            && let Err(err) = overlay.hide(dom, &self.config)
        {
            warn!("failed to hide lightbox overlay: {err:#}");
        }
        if let Some(opener) = self.opener.take() {
            if dom.focus(opener).is_err() {
                dom.blur();
            }
        } else if was_open {
            dom.blur();
        }
        if was_open {
            debug!("lightbox closed");
        }
        was_open
    }

    /// Remove the overlay from the document entirely.
    pub fn teardown(&mut self, dom: &mut DOM) {
        self.hide(dom);
        if let Some(overlay) = self.overlay.take()
            && dom.contains_key(overlay.root)
            && let Err(err) = dom.remove_node(overlay.root)
        {
            warn!("failed to remove lightbox overlay: {err:#}");
        }
    }
}
