use anyhow::Result;
use lightbox::SessionState;

mod common;

#[test]
fn vacation_group_wraps_forward() -> Result<()> {
    let (mut dom, mut lightbox) = common::setup(
        r#"<body>
          <a id="first" data-lightbox="vacation" href="/a.jpg"></a>
          <a id="second" data-lightbox="vacation" href="/b.jpg"></a>
          <a id="third" data-lightbox="vacation" href="/c.jpg"></a>
        </body>"#,
    )?;

    assert!(common::click_id(&mut dom, &mut lightbox, "second")?);
    assert!(lightbox.is_visible(&dom));
    assert_eq!(common::shown_source(&dom, &lightbox)?, "/b.jpg");
    assert_eq!(lightbox.controller().current_index(), Some(1));

    assert!(common::press(&mut dom, &mut lightbox, "ArrowRight"));
    assert_eq!(common::shown_source(&dom, &lightbox)?, "/c.jpg");

    assert!(common::press(&mut dom, &mut lightbox, "ArrowRight"));
    assert_eq!(common::shown_source(&dom, &lightbox)?, "/a.jpg");
    assert_eq!(lightbox.controller().current_index(), Some(0));
    Ok(())
}

#[test]
fn unnamed_anchor_opens_default_group_and_escape_closes() -> Result<()> {
    let (mut dom, mut lightbox) =
        common::setup(r#"<a id="only" data-lightbox href="/only.jpg">only</a>"#)?;
    assert_eq!(lightbox.groups().names(), ["default"]);

    assert!(common::click_id(&mut dom, &mut lightbox, "only")?);
    assert_eq!(
        lightbox.state(),
        &SessionState::Open {
            group: String::from("default"),
            index: 0
        }
    );
    let overlay = common::overlay(&lightbox)?;
    assert!(dom.has_attr(overlay.prev, "hidden"));
    assert!(dom.has_attr(overlay.next, "hidden"));
    assert!(common::scroll_locked(&dom));

    assert!(common::press(&mut dom, &mut lightbox, "Escape"));
    assert!(!lightbox.is_visible(&dom));
    assert!(!common::scroll_locked(&dom));
    Ok(())
}

#[test]
fn anchor_without_caption_sources_renders_empty_caption() -> Result<()> {
    let (mut dom, mut lightbox) =
        common::setup(r#"<a id="bare" data-lightbox="g" href="/bare.jpg"><img src="/t.jpg"></a>"#)?;
    assert!(common::click_id(&mut dom, &mut lightbox, "bare")?);

    let overlay = common::overlay(&lightbox)?;
    assert_eq!(dom.text_content(overlay.caption), "");
    assert_eq!(dom.attr(overlay.image, "alt"), Some(""));
    assert_eq!(common::shown_source(&dom, &lightbox)?, "/bare.jpg");
    Ok(())
}
