//! The lightbox instance: owns the group table, the listener registry and the
//! overlay controller, and routes host events to state transitions.

use crate::config::LightboxConfig;
use crate::controller::{OverlayController, SessionState};
use crate::indexer::{GroupIndexer, GroupTable};
use crate::overlay::OverlayHandles;
use html::{ClickEvent, DOM, DispatchOutcome, EventKind, Key, KeyEvent, Listeners, NodeKey};
use log::{debug, trace};

/// What a registered listener does when an event reaches it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Click interceptor on an indexed anchor, with the values captured at
    /// index time.
    Open { group: String, source: String },
    /// The overlay backdrop; only clicks targeting it directly count.
    Backdrop,
    Close,
    Prev,
    Next,
    /// Document-level keydown listener.
    Keyboard,
}

pub struct Lightbox {
    indexer: GroupIndexer,
    groups: GroupTable,
    listeners: Listeners<Route>,
    controller: OverlayController,
    /// Overlay whose controls currently have listeners.
    wired_overlay: Option<OverlayHandles>,
}

impl Lightbox {
    /// Index `dom`, intercept clicks on its anchors and start listening for
    /// keyboard input.
    pub fn attach(dom: &DOM, config: LightboxConfig) -> Self {
        let config = config.normalized();
        let mut listeners = Listeners::new();
        listeners.add_document(EventKind::KeyDown, Route::Keyboard);
        let mut lightbox = Self {
            indexer: GroupIndexer::new(config.clone()),
            groups: GroupTable::default(),
            listeners,
            controller: OverlayController::new(config),
            wired_overlay: None,
        };
        lightbox.refresh(dom);
        lightbox
    }

    /// Rebuild all groups from the current markup and replace every anchor
    /// interceptor. Safe to call any number of times.
    pub fn refresh(&mut self, dom: &DOM) {
        self.groups = self.indexer.index(dom);
        self.listeners
            .retain(|_, route| !matches!(route, Route::Open { .. }));
        for (group, item) in self.groups.anchors() {
            self.listeners.add(
                item.link,
                EventKind::Click,
                Route::Open {
                    group: group.to_owned(),
                    source: item.source.clone(),
                },
            );
        }
    }

    pub const fn groups(&self) -> &GroupTable {
        &self.groups
    }

    /// Pretty JSON of the current group table.
    pub fn groups_json(&self) -> String {
        serde_json::to_string_pretty(&self.groups.to_json_value())
            .unwrap_or_else(|_| String::from("{}"))
    }

    pub const fn state(&self) -> &SessionState {
        self.controller.state()
    }

    pub const fn controller(&self) -> &OverlayController {
        &self.controller
    }

    pub const fn overlay(&self) -> Option<&OverlayHandles> {
        self.controller.overlay()
    }

    pub fn is_visible(&self, dom: &DOM) -> bool {
        self.controller.is_visible(dom)
    }

    /// Open `group` at `source` (first item when not found).
    pub fn open(&mut self, dom: &mut DOM, group: &str, source: &str) -> bool {
        self.open_from(dom, group, source, None)
    }

    fn open_from(
        &mut self,
        dom: &mut DOM,
        group: &str,
        source: &str,
        opener: Option<NodeKey>,
    ) -> bool {
        let shown = self.controller.open(dom, &self.groups, group, source, opener);
        self.wire_overlay();
        shown
    }

    pub fn show_index(&mut self, dom: &mut DOM, index: isize) -> bool {
        self.controller.show_index(dom, &self.groups, index)
    }

    pub fn next(&mut self, dom: &mut DOM) -> bool {
        self.controller.next(dom, &self.groups)
    }

    pub fn prev(&mut self, dom: &mut DOM) -> bool {
        self.controller.prev(dom, &self.groups)
    }

    pub fn hide(&mut self, dom: &mut DOM) -> bool {
        self.controller.hide(dom)
    }

    /// Page teardown: close, remove the overlay and drop every listener.
    pub fn detach(&mut self, dom: &mut DOM) {
        self.controller.teardown(dom);
        self.listeners.clear();
        self.groups = GroupTable::default();
        self.wired_overlay = None;
    }

    /// Register listeners on the overlay's controls once per built overlay.
    fn wire_overlay(&mut self) {
        let current = self.controller.overlay().copied();
        if current == self.wired_overlay {
            return;
        }
        self.listeners.retain(|_, route| {
            !matches!(
                route,
                Route::Backdrop | Route::Close | Route::Prev | Route::Next
            )
        });
        if let Some(overlay) = current {
            self.listeners
                .add(overlay.root, EventKind::Click, Route::Backdrop);
            self.listeners
                .add(overlay.close, EventKind::Click, Route::Close);
            self.listeners.add(overlay.prev, EventKind::Click, Route::Prev);
            self.listeners.add(overlay.next, EventKind::Click, Route::Next);
        }
        self.wired_overlay = current;
    }

    /// Deliver a click. The returned outcome tells the host whether to skip
    /// the default action (following the link).
    pub fn handle_click(&mut self, dom: &mut DOM, event: &ClickEvent) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let path = self.listeners.dispatch_path(dom, event.target, EventKind::Click);
        for (current_target, route) in path {
            let step = match route {
                Route::Open { group, source } => {
                    if event.is_modified() {
                        debug!("ignoring modified click on lightbox anchor {}", current_target.0);
                        continue;
                    }
                    self.open_from(dom, &group, &source, Some(current_target));
                    DispatchOutcome {
                        default_prevented: true,
                        handled: true,
                    }
                }
                Route::Backdrop if event.target == current_target => handled(self.hide(dom)),
                Route::Close => handled(self.hide(dom)),
                Route::Prev => handled(self.prev(dom)),
                Route::Next => handled(self.next(dom)),
                Route::Backdrop | Route::Keyboard => continue,
            };
            outcome.merge(step);
        }
        outcome
    }

    /// Deliver a keydown. Only acts while the overlay is visible.
    pub fn handle_key(&mut self, dom: &mut DOM, event: &KeyEvent) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let target = dom.active_element().unwrap_or(NodeKey::ROOT);
        let path = self.listeners.dispatch_path(dom, target, EventKind::KeyDown);
        for (_, route) in path {
            if route != Route::Keyboard || !self.controller.is_visible(dom) {
                continue;
            }
            trace!("lightbox key {:?}", event.key);
            let step = match event.key {
                Key::Escape => handled(self.hide(dom)),
                Key::ArrowLeft => handled(self.prev(dom)),
                Key::ArrowRight => handled(self.next(dom)),
                Key::Other(_) => continue,
            };
            outcome.merge(step);
        }
        outcome
    }
}

const fn handled(acted: bool) -> DispatchOutcome {
    DispatchOutcome {
        default_prevented: acted,
        handled: acted,
    }
}
