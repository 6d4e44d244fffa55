use anyhow::Result;
use html::{ClickEvent, DOM, KeyEvent, KeyMods};
use lightbox::{Lightbox, LightboxConfig, SessionState};

mod common;

fn opened_on_v1() -> Result<(DOM, Lightbox)> {
    common::init_logger();
    let mut dom = common::load_fixture("gallery.html")?;
    let mut lightbox = Lightbox::attach(&dom, LightboxConfig::default());
    assert!(common::click_id(&mut dom, &mut lightbox, "v1")?);
    Ok((dom, lightbox))
}

#[test]
fn escape_closes_and_releases_scroll_lock() -> Result<()> {
    let (mut dom, mut lightbox) = opened_on_v1()?;
    assert!(lightbox.is_visible(&dom));
    assert!(common::scroll_locked(&dom));
    let overlay = common::overlay(&lightbox)?;
    assert_eq!(dom.attr(overlay.root, "aria-hidden"), Some("false"));

    assert!(common::press(&mut dom, &mut lightbox, "Escape"));
    assert!(!lightbox.is_visible(&dom));
    assert!(!common::scroll_locked(&dom));
    assert_eq!(lightbox.state(), &SessionState::Closed);
    assert_eq!(lightbox.controller().current_index(), None);
    assert_eq!(dom.attr(overlay.root, "aria-hidden"), Some("true"));
    Ok(())
}

#[test]
fn keys_are_ignored_once_hidden() -> Result<()> {
    let (mut dom, mut lightbox) = opened_on_v1()?;
    assert!(lightbox.hide(&mut dom));
    let shown = common::shown_source(&dom, &lightbox)?;

    assert!(!common::press(&mut dom, &mut lightbox, "ArrowRight"));
    assert!(!common::press(&mut dom, &mut lightbox, "ArrowLeft"));
    assert!(!common::press(&mut dom, &mut lightbox, "Escape"));
    assert_eq!(lightbox.state(), &SessionState::Closed);
    assert_eq!(common::shown_source(&dom, &lightbox)?, shown);
    Ok(())
}

#[test]
fn keys_before_any_open_do_nothing() -> Result<()> {
    let (mut dom, mut lightbox) = common::setup(r#"<a data-lightbox="g" href="/1.jpg"></a>"#)?;
    assert!(!common::press(&mut dom, &mut lightbox, "Escape"));
    assert!(!common::press(&mut dom, &mut lightbox, "ArrowRight"));
    assert!(lightbox.overlay().is_none());
    Ok(())
}

#[test]
fn other_keys_pass_through() -> Result<()> {
    let (mut dom, mut lightbox) = opened_on_v1()?;
    let outcome = lightbox.handle_key(&mut dom, &KeyEvent::named("Enter"));
    assert!(!outcome.handled);
    assert!(!outcome.default_prevented);
    assert!(lightbox.is_visible(&dom));
    Ok(())
}

#[test]
fn escape_with_modifiers_still_closes() -> Result<()> {
    let (mut dom, mut lightbox) = opened_on_v1()?;
    let mut event = KeyEvent::named("Esc");
    event.mods = KeyMods {
        shift: true,
        ..KeyMods::default()
    };
    assert!(lightbox.handle_key(&mut dom, &event).handled);
    assert!(!lightbox.is_visible(&dom));
    Ok(())
}

#[test]
fn backdrop_click_closes_but_stage_click_does_not() -> Result<()> {
    let (mut dom, mut lightbox) = opened_on_v1()?;
    let overlay = common::overlay(&lightbox)?;

    for inner in [overlay.stage, overlay.image, overlay.caption] {
        let outcome = lightbox.handle_click(&mut dom, &ClickEvent::primary(inner));
        assert!(!outcome.handled);
        assert!(lightbox.is_visible(&dom));
    }

    let outcome = lightbox.handle_click(&mut dom, &ClickEvent::primary(overlay.root));
    assert!(outcome.handled);
    assert!(!lightbox.is_visible(&dom));
    assert!(!common::scroll_locked(&dom));
    Ok(())
}

#[test]
fn close_control_closes() -> Result<()> {
    let (mut dom, mut lightbox) = opened_on_v1()?;
    let overlay = common::overlay(&lightbox)?;
    let outcome = lightbox.handle_click(&mut dom, &ClickEvent::primary(overlay.close));
    assert!(outcome.default_prevented);
    assert_eq!(lightbox.state(), &SessionState::Closed);

    // Closing twice is harmless.
    assert!(!lightbox.hide(&mut dom));
    assert!(!common::scroll_locked(&dom));
    Ok(())
}

#[test]
fn focus_moves_into_overlay_and_back_to_the_opener() -> Result<()> {
    let (mut dom, mut lightbox) = opened_on_v1()?;
    let overlay = common::overlay(&lightbox)?;
    assert_eq!(dom.active_element(), Some(overlay.close));

    // Browsing keeps the first opener.
    assert!(common::press(&mut dom, &mut lightbox, "ArrowRight"));
    assert!(common::press(&mut dom, &mut lightbox, "Escape"));
    assert_eq!(dom.active_element(), Some(common::by_id(&dom, "v1")?));
    Ok(())
}

#[test]
fn programmatic_open_returns_focus_to_previous_element() -> Result<()> {
    let (mut dom, mut lightbox) = common::setup(
        r#"<button id="trigger">show</button><a data-lightbox="g" href="/1.jpg"></a>"#,
    )?;
    let trigger = common::by_id(&dom, "trigger")?;
    dom.focus(trigger)?;
    assert!(lightbox.open(&mut dom, "g", "/1.jpg"));
    assert!(lightbox.hide(&mut dom));
    assert_eq!(dom.active_element(), Some(trigger));
    Ok(())
}

#[test]
fn overlay_is_built_once_and_reused() -> Result<()> {
    let (mut dom, mut lightbox) = opened_on_v1()?;
    let first = common::overlay(&lightbox)?;
    assert!(lightbox.hide(&mut dom));
    assert!(common::click_id(&mut dom, &mut lightbox, "f1")?);
    assert_eq!(common::overlay(&lightbox)?, first);

    let dialogs: Vec<_> = dom
        .elements_with_attr("class")
        .into_iter()
        .filter(|key| dom.has_class(*key, "lightbox"))
        .collect();
    assert_eq!(dialogs, [first.root]);
    assert_eq!(dom.parent(first.root), dom.body());
    Ok(())
}

#[test]
fn overlay_removed_externally_is_rebuilt() -> Result<()> {
    let (mut dom, mut lightbox) = opened_on_v1()?;
    let first = common::overlay(&lightbox)?;
    assert!(lightbox.hide(&mut dom));
    dom.remove_node(first.root)?;

    assert!(common::click_id(&mut dom, &mut lightbox, "v3")?);
    let second = common::overlay(&lightbox)?;
    assert_ne!(second.root, first.root);
    assert!(lightbox.is_visible(&dom));

    // The rebuilt controls are wired.
    let outcome = lightbox.handle_click(&mut dom, &ClickEvent::primary(second.next));
    assert!(outcome.handled);
    assert_eq!(common::shown_source(&dom, &lightbox)?, "/a.jpg");
    Ok(())
}

#[test]
fn detach_removes_overlay_and_listeners() -> Result<()> {
    let (mut dom, mut lightbox) = opened_on_v1()?;
    let overlay = common::overlay(&lightbox)?;
    lightbox.detach(&mut dom);

    assert!(!dom.contains_key(overlay.root));
    assert!(!common::scroll_locked(&dom));
    assert!(lightbox.groups().is_empty());
    assert!(!common::click_id(&mut dom, &mut lightbox, "v1")?);
    assert!(lightbox.overlay().is_none());
    Ok(())
}

#[test]
fn custom_classes_come_from_config() -> Result<()> {
    common::init_logger();
    let mut dom = DOM::parse(r#"<a id="one" data-lightbox="g" href="/1.jpg"></a>"#)?;
    let config = LightboxConfig::from_json(
        r#"{"overlay_class":"viewer","visible_class":"on","scroll_lock_class":"frozen"}"#,
    )?;
    let mut lightbox = Lightbox::attach(&dom, config);
    assert!(common::click_id(&mut dom, &mut lightbox, "one")?);

    let overlay = common::overlay(&lightbox)?;
    assert!(dom.has_class(overlay.root, "viewer"));
    assert!(dom.has_class(overlay.root, "on"));
    assert!(dom.has_class(overlay.image, "viewer__image"));
    let html = dom.document_element().map(|key| dom.has_class(key, "frozen"));
    assert_eq!(html, Some(true));
    Ok(())
}

#[test]
fn multi_token_visible_class_still_gates_keys() -> Result<()> {
    common::init_logger();
    let mut dom = DOM::parse(
        r#"<a id="one" data-lightbox="g" href="/1.jpg"></a><a data-lightbox="g" href="/2.jpg"></a>"#,
    )?;
    let config = LightboxConfig {
        visible_class: String::from("shown now"),
        ..LightboxConfig::default()
    };
    let mut lightbox = Lightbox::attach(&dom, config);
    assert!(common::click_id(&mut dom, &mut lightbox, "one")?);
    let overlay = common::overlay(&lightbox)?;
    assert!(dom.has_class(overlay.root, "is-visible"));
    assert!(lightbox.is_visible(&dom));

    assert!(common::press(&mut dom, &mut lightbox, "ArrowRight"));
    assert_eq!(common::shown_source(&dom, &lightbox)?, "/2.jpg");
    assert!(common::press(&mut dom, &mut lightbox, "Escape"));
    assert!(!lightbox.is_visible(&dom));
    Ok(())
}
