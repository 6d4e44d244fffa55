#![allow(dead_code, reason = "each test binary uses a different subset")]

use anyhow::{Context as _, Result};
use html::{ClickEvent, DOM, KeyEvent, NodeKey};
use lightbox::{Lightbox, LightboxConfig, OverlayHandles};
use std::fs;
use std::path::PathBuf;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Returns the directory containing HTML fixtures for integration tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

pub fn load_fixture(name: &str) -> Result<DOM> {
    let path = fixtures_dir().join(name);
    let html = fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    DOM::parse(&html)
}

/// Parse `html` and attach a lightbox with the default configuration.
pub fn setup(html: &str) -> Result<(DOM, Lightbox)> {
    init_logger();
    let dom = DOM::parse(html)?;
    let lightbox = Lightbox::attach(&dom, LightboxConfig::default());
    Ok((dom, lightbox))
}

pub fn by_id(dom: &DOM, id: &str) -> Result<NodeKey> {
    dom.element_by_id(id)
        .with_context(|| format!("no element with id {id:?}"))
}

pub fn click_id(dom: &mut DOM, lightbox: &mut Lightbox, id: &str) -> Result<bool> {
    let target = by_id(dom, id)?;
    Ok(lightbox
        .handle_click(dom, &ClickEvent::primary(target))
        .default_prevented)
}

pub fn press(dom: &mut DOM, lightbox: &mut Lightbox, key: &str) -> bool {
    lightbox.handle_key(dom, &KeyEvent::named(key)).handled
}

pub fn overlay(lightbox: &Lightbox) -> Result<OverlayHandles> {
    lightbox.overlay().copied().context("overlay not built")
}

pub fn shown_source(dom: &DOM, lightbox: &Lightbox) -> Result<String> {
    let image = overlay(lightbox)?.image;
    Ok(dom.attr(image, "src").unwrap_or_default().to_owned())
}

pub fn scroll_locked(dom: &DOM) -> bool {
    dom.document_element()
        .is_some_and(|html| dom.has_class(html, "lightbox-open"))
}
