//! End-to-end component scenarios through the public API.

use picture_atom::attributes::Attributes;
use picture_atom::component::{HostElement, Picture};
use picture_atom::config::PictureConfig;
use picture_atom::events::{Detail, HostEvent, Notification};
use picture_atom::gate::{IntersectionEntry, IntersectionObserver, NoopObserver};
use picture_atom::hover::NodeId;
use picture_atom::load::{ImageSlot, LoadState, Outcome};
use picture_atom::resolve::{ChildElement, Warning};
use picture_atom::styles::FsStylesheets;
use picture_atom::types::{LoadingHint, SourceCandidate};
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

const COMPONENT: NodeId = NodeId(42);

#[derive(Clone, Default)]
struct SharedObserver {
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl IntersectionObserver for SharedObserver {
    fn observe(&mut self) {
        self.calls.lock().unwrap().push("observe");
    }

    fn unobserve(&mut self) {
        self.calls.lock().unwrap().push("unobserve");
    }
}

fn element(attributes: Attributes) -> HostElement {
    HostElement {
        id: COMPONENT,
        attributes,
        children: Vec::new(),
        natural_width: None,
    }
}

fn connect(element: HostElement) -> Picture {
    Picture::connect(
        element,
        &PictureConfig::default(),
        Box::new(NoopObserver),
        &FsStylesheets,
    )
}

fn upper_bound(media: Option<&str>) -> Option<u32> {
    let media = media?;
    let at = media.find("max-width: ")? + "max-width: ".len();
    media[at..].trim_end_matches("px)").parse().ok()
}

// ---------------------------------------------------------------------------
// Scenario A: malformed explicit source
// ---------------------------------------------------------------------------

#[test]
fn malformed_source_is_dropped_and_warned() {
    let attrs = Attributes::new()
        .with("defaultSource", "img.jpg")
        .with("alt", "A cat")
        .with(
            "sources",
            r#"[
                {"source": "s.webp", "type": "image/webp", "size": "small"},
                {"source": "l.webp", "type": "", "size": "large"}
            ]"#,
        );
    let picture = connect(element(attrs));

    assert_eq!(picture.resolved().loading(), LoadingHint::Lazy);
    assert_eq!(picture.attributes().get("loading"), Some("lazy"));
    assert_eq!(
        picture.picture().sources,
        vec![SourceCandidate {
            srcset: "http://localhost/s.webp".into(),
            mime_type: Some("image/webp".into()),
            media: Some("(max-width: 400px)".into()),
        }]
    );
    assert!(matches!(
        picture.warnings(),
        [Warning::IncompleteSource { index: 1, .. }]
    ));

    let html = picture.render().into_string();
    assert!(html.contains(r#"srcset="http://localhost/s.webp""#));
    assert!(!html.contains("l.webp"));
}

// ---------------------------------------------------------------------------
// Scenario B: synthesis from the width parameter
// ---------------------------------------------------------------------------

#[test]
fn width_300_synthesizes_six_candidates() {
    let attrs = Attributes::new()
        .with("defaultSource", "img.jpg?width=300")
        .with("alt", "A cat");
    let picture = connect(HostElement {
        natural_width: Some(300),
        ..element(attrs)
    });

    let bounds: Vec<Option<u32>> = picture
        .picture()
        .sources
        .iter()
        .map(|s| upper_bound(s.media.as_deref()))
        .collect();
    assert_eq!(
        bounds,
        vec![Some(50), Some(100), Some(150), Some(200), Some(250), None]
    );
    let last = picture.picture().sources.last().unwrap();
    assert_eq!(last.srcset, "http://localhost/img.jpg");
    assert_eq!(last.media.as_deref(), Some("(min-width: 251px)"));
}

#[test]
fn rerender_is_identical() {
    let attrs = Attributes::new()
        .with("defaultSource", "img.jpg?width=640&format=jpg")
        .with("alt", "A cat");
    let first = connect(element(attrs.clone())).render().into_string();
    let second = connect(element(attrs)).render().into_string();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Scenario C: load notification
// ---------------------------------------------------------------------------

#[test]
fn picture_load_fires_once() {
    let attrs = Attributes::new()
        .with("defaultSource", "img.jpg")
        .with("alt", "A cat")
        .with("picture-load", "done");
    let mut picture = connect(element(attrs));
    let mut sink: Vec<Notification> = Vec::new();

    let load = HostEvent::new("load", None);
    picture.on_image_load(ImageSlot::Target, load.clone(), &mut sink);
    picture.on_image_load(ImageSlot::Target, load.clone(), &mut sink);

    assert_eq!(sink.len(), 1);
    let notification = &sink[0];
    assert_eq!(notification.name, "done");
    assert!(notification.bubbles && notification.cancelable && notification.composed);
    match &notification.detail {
        Detail::Loaded {
            orig_event,
            child,
            img,
            ..
        } => {
            assert_eq!(orig_event, &load);
            assert_eq!(*child, COMPONENT);
            let img = img.as_ref().unwrap();
            assert_eq!(img.src.as_deref(), Some("http://localhost/img.jpg"));
        }
        other => panic!("expected a load detail, got {other:?}"),
    }
    assert_eq!(picture.attributes().get("loaded"), Some("true"));
    assert!(picture.render().into_string().contains(r#"loaded="true""#));
}

// ---------------------------------------------------------------------------
// Scenario D: click interception
// ---------------------------------------------------------------------------

#[test]
fn click_opens_modal_and_stops_propagation() {
    let attrs = Attributes::new()
        .with("defaultSource", "img.jpg")
        .with("alt", "A cat")
        .with("open-modal", "");
    let mut picture = connect(element(attrs));
    let mut sink: Vec<Notification> = Vec::new();

    let click = HostEvent::new("click", Some(COMPONENT));
    let outcome = picture.on_click(click.clone(), &mut sink).unwrap();

    assert!(outcome.stop_propagation);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].name, "open-modal");
    assert!(sink[0].bubbles);
    assert_eq!(
        sink[0].detail,
        Detail::ModalOpen {
            orig_event: click,
            child: COMPONENT,
        }
    );
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn lazy_image_fetches_only_after_visibility() {
    let observer = SharedObserver::default();
    let attrs = Attributes::new()
        .with("defaultSource", "img.jpg")
        .with("alt", "A cat");
    let mut picture = Picture::connect(
        element(attrs),
        &PictureConfig::default(),
        Box::new(observer.clone()),
        &FsStylesheets,
    );
    assert!(!picture.render().into_string().contains(" src="));

    picture.on_intersection(&[IntersectionEntry {
        is_intersecting: false,
    }]);
    assert_eq!(picture.load_state(), Some(LoadState::Pending));

    picture.on_intersection(&[IntersectionEntry {
        is_intersecting: true,
    }]);
    assert_eq!(picture.load_state(), Some(LoadState::Triggered));
    assert!(
        picture
            .render()
            .into_string()
            .contains(r#" src="http://localhost/img.jpg""#)
    );
    assert_eq!(*observer.calls.lock().unwrap(), vec!["observe", "unobserve"]);
}

#[test]
fn completion_after_disconnect_is_dropped() {
    let attrs = Attributes::new()
        .with("defaultSource", "img.jpg")
        .with("alt", "A cat")
        .with("picture-load", "done");
    let mut picture = connect(element(attrs));
    picture.disconnect();

    let mut sink: Vec<Notification> = Vec::new();
    picture.on_image_load(ImageSlot::Target, HostEvent::new("load", None), &mut sink);
    assert!(sink.is_empty());
    assert_ne!(picture.load_state(), Some(LoadState::Settled(Outcome::Success)));
}

#[test]
fn child_sources_suppress_synthesis() {
    let attrs = Attributes::new().with("alt", "ignored without defaultSource");
    let picture = connect(HostElement {
        children: vec![
            ChildElement::Source(SourceCandidate {
                srcset: "pre.avif".into(),
                mime_type: Some("image/avif".into()),
                media: None,
            }),
            ChildElement::Img {
                src: "child.jpg?width=400".into(),
                alt: Some("Child".into()),
            },
        ],
        natural_width: Some(400),
        ..element(attrs)
    });
    assert_eq!(picture.picture().sources.len(), 1);
    assert_eq!(picture.picture().sources[0].srcset, "http://localhost/pre.avif");
    let img = picture.target().unwrap();
    assert_eq!(img.data_src, "http://localhost/child.jpg?width=400");
    assert_eq!(img.alt, "Child");
}
