//! The picture component.
//!
//! Ties the pieces together for one host element and one render pass:
//!
//! ```text
//! attributes ─▶ resolve ─▶ synth ─▶ render tree ─┬─▶ render()
//!                                                 │
//!          visibility gate / eager ─▶ LoadController ─▶ effects, notifications
//! ```
//!
//! Host callbacks map onto methods: `on_intersection`, `on_image_load`,
//! `on_image_error`, `on_click`, `on_pointer_over`/`on_pointer_out`,
//! `attribute_changed`, and `disconnect`. After `disconnect` every callback
//! is a no-op; a new render pass needs a new [`Picture::connect`].

use crate::attributes::Attributes;
use crate::config::PictureConfig;
use crate::events::{ClickOutcome, Detail, EventSink, HostEvent, Notification, intercept_click};
use crate::gate::{IntersectionEntry, IntersectionObserver, VisibilityGate};
use crate::hover::{self, DocumentTree, NodeId, ScopeLookup};
use crate::load::{Effect, ImageSlot, LoadController, LoadMode, LoadState, LoadTicket, Outcome};
use crate::render::{self, Host, ImageElement, PictureElement};
use crate::resolve::{self, ChildElement, ResolvedPicture, Warning};
use crate::styles::{self, StylesheetSource};
use crate::synth;
use crate::types::{DecodingHint, LoadingHint};
use maud::Markup;
use std::path::Path;

/// A host element as handed to [`Picture::connect`].
#[derive(Debug, Clone, Default)]
pub struct HostElement {
    pub id: NodeId,
    pub attributes: Attributes,
    pub children: Vec<ChildElement>,
    /// Rendered/natural width of the image, when the host knows it.
    pub natural_width: Option<u32>,
}

#[derive(Debug)]
pub struct Picture {
    id: NodeId,
    attributes: Attributes,
    resolved: ResolvedPicture,
    warnings: Vec<Warning>,
    styles: Vec<String>,
    /// The visible tree.
    picture: PictureElement,
    /// Full-quality tree built off-screen in progressive mode.
    replacement: Option<PictureElement>,
    controller: Option<LoadController>,
    ticket: Option<LoadTicket>,
    gate: VisibilityGate,
    scope: ScopeLookup,
    connected: bool,
}

impl Picture {
    /// Build the render tree for a host element and start its load cycle.
    ///
    /// Lazy images wait for the visibility gate; eager ones are triggered
    /// before this returns.
    pub fn connect(
        element: HostElement,
        config: &PictureConfig,
        observer: Box<dyn IntersectionObserver>,
        stylesheets: &dyn StylesheetSource,
    ) -> Self {
        let HostElement {
            id,
            mut attributes,
            children,
            natural_width,
        } = element;
        let resolution = resolve::resolve(&attributes, &children, config);
        let resolved = resolution.picture;
        let loading = resolved.loading();

        attributes.set("role", "img");
        attributes.set("loading", loading.as_str());
        if resolved.open_modal_event.is_some() {
            attributes.set("aria-haspopup", "true");
        }

        let mut styles = vec![styles::base_css(
            resolved.aspect_ratio,
            &config.breakpoints.mobile_max_width,
        )];
        if let Some(namespace) = resolved.namespace {
            let dir = Path::new(&config.stylesheet_dir);
            match styles::variant_stylesheet(namespace, dir, stylesheets) {
                Ok(css) => styles.push(css.to_string()),
                Err(err) => tracing::warn!("a-picture namespace stylesheet skipped: {err}"),
            }
        }
        if let Some(css) = resolved.pointer_events.as_deref().and_then(styles::pointer_events_css) {
            styles.push(css);
        }

        let sources = synth::candidates_for(&resolved, natural_width, &config.synthesis);
        let mut picture = PictureElement {
            sources,
            img: None,
            hover: false,
        };
        let mut replacement = None;
        let mut controller = None;

        if let Some(image) = &resolved.image {
            let mut target = ImageElement {
                data_src: image.raw_source.clone(),
                src: None,
                alt: image.alt.clone(),
                decoding: image.decoding,
                loading,
            };
            let progressive = loading == LoadingHint::Eager && synth::has_quality(&image.raw_source);
            if progressive {
                // Placeholder shows immediately; the target waits off-tree.
                let quality = config.quality.placeholder;
                let placeholder_url = synth::with_quality(&image.raw_source, quality);
                target.decoding = DecodingHint::Sync;
                let placeholder = ImageElement {
                    data_src: placeholder_url.clone(),
                    src: Some(placeholder_url),
                    ..target.clone()
                };
                let full_sources = std::mem::take(&mut picture.sources);
                picture.sources = synth::degrade_quality(&full_sources, quality);
                picture.img = Some(placeholder);
                replacement = Some(PictureElement {
                    sources: full_sources,
                    img: Some(target),
                    hover: false,
                });
                controller = Some(LoadController::new(&image.raw_source, LoadMode::Progressive));
            } else {
                picture.img = Some(target);
                controller = Some(LoadController::new(&image.raw_source, LoadMode::Single));
            }
        }

        let mut component = Self {
            id,
            attributes,
            resolved,
            warnings: resolution.warnings,
            styles,
            picture,
            replacement,
            controller,
            ticket: None,
            gate: VisibilityGate::new(observer),
            scope: ScopeLookup::default(),
            connected: true,
        };
        if component.controller.is_some() {
            component.gate.observe();
            if loading == LoadingHint::Eager {
                component.trigger();
            }
        }
        component
    }

    /// Pending → Triggered, at most once per render pass.
    fn trigger(&mut self) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        if let Some((effects, ticket)) = controller.advance() {
            self.gate.close();
            self.ticket = Some(ticket);
            self.apply(effects);
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SetSource(url) => {
                    if let Some(img) = self.target_mut() {
                        img.src = Some(url);
                    }
                }
                Effect::SuppressReveal => self.styles.push(styles::SUPPRESS_REVEAL_CSS.to_string()),
                Effect::SwapPicture => {
                    if let Some(mut full) = self.replacement.take() {
                        full.hover = self.picture.hover;
                        self.picture = full;
                    }
                }
            }
        }
    }

    /// The image whose completion settles the load.
    fn target_mut(&mut self) -> Option<&mut ImageElement> {
        match self.replacement.as_mut() {
            Some(replacement) => replacement.img.as_mut(),
            None => self.picture.img.as_mut(),
        }
    }

    /// The image whose completion settles the load.
    pub fn target(&self) -> Option<&ImageElement> {
        match &self.replacement {
            Some(replacement) => replacement.img.as_ref(),
            None => self.picture.img.as_ref(),
        }
    }

    // ========================================================================
    // Host callbacks
    // ========================================================================

    pub fn on_intersection(&mut self, entries: &[IntersectionEntry]) {
        if self.connected && self.gate.on_entries(entries) {
            self.trigger();
        }
    }

    pub fn on_image_load(&mut self, slot: ImageSlot, event: HostEvent, sink: &mut dyn EventSink) {
        self.settle(slot, Outcome::Success, event, sink);
    }

    pub fn on_image_error(&mut self, slot: ImageSlot, event: HostEvent, sink: &mut dyn EventSink) {
        self.settle(slot, Outcome::Failure, event, sink);
    }

    fn settle(
        &mut self,
        slot: ImageSlot,
        outcome: Outcome,
        event: HostEvent,
        sink: &mut dyn EventSink,
    ) {
        if !self.connected || slot != ImageSlot::Target {
            return;
        }
        // Taking the ticket makes the completion one-shot.
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        let Some(effects) = self
            .controller
            .as_mut()
            .and_then(|controller| controller.settle(ticket, outcome))
        else {
            return;
        };
        self.apply(effects);

        let Some(name) = self.resolved.load_event.clone() else {
            return;
        };
        let loaded = outcome == Outcome::Success;
        self.attributes.set("loaded", loaded.to_string());
        let detail = match outcome {
            Outcome::Success => Detail::Loaded {
                orig_event: event,
                child: self.id,
                img: self.target().cloned(),
                picture: self.picture.clone(),
            },
            Outcome::Failure => Detail::Failed { error: event },
        };
        sink.dispatch(Notification::new(name, detail));
    }

    /// Returns `None` when click interception is off or the component is
    /// detached. The notification has already been dispatched to `sink`.
    pub fn on_click(&mut self, event: HostEvent, sink: &mut dyn EventSink) -> Option<ClickOutcome> {
        if !self.connected {
            return None;
        }
        let name = self.resolved.open_modal_event.as_deref()?;
        let outcome = intercept_click(name, self.attributes.has("open"), event, self.id);
        sink.dispatch(outcome.notification.clone());
        Some(outcome)
    }

    pub fn on_pointer_over(&mut self, tree: &dyn DocumentTree, node: NodeId) {
        if self.is_hover_target(tree, node) {
            self.picture.hover = true;
        }
    }

    pub fn on_pointer_out(&mut self, tree: &dyn DocumentTree, node: NodeId) {
        if self.is_hover_target(tree, node) {
            self.picture.hover = false;
        }
    }

    fn is_hover_target(&mut self, tree: &dyn DocumentTree, node: NodeId) -> bool {
        self.connected
            && hover::hover_target(self.resolved.hover_scope, tree, self.id, &mut self.scope)
                == Some(node)
    }

    /// React to observed attribute changes after the first render.
    pub fn attribute_changed(&mut self, name: &str, value: &str) {
        self.attributes.set(name, value);
        match name {
            "loading" => {
                let hint = LoadingHint::parse(value);
                if let Some(img) = self.target_mut() {
                    img.loading = hint;
                }
            }
            "pointer-events" if self.target().is_some() => match styles::pointer_events_css(value) {
                Some(css) => self.styles.push(css),
                None => tracing::warn!(value, "a-picture pointer-events ignored: not a CSS keyword"),
            },
            _ => {}
        }
    }

    /// Detach from the document: unsubscribe, drop the pending completion,
    /// forget the cached hover scope.
    pub fn disconnect(&mut self) {
        self.gate.disconnect();
        self.scope.clear();
        self.ticket = None;
        if let Some(controller) = self.controller.as_mut() {
            controller.teardown();
        }
        self.connected = false;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn render(&self) -> Markup {
        render::render_fragment(Host {
            attributes: &self.attributes,
            styles: &self.styles,
            picture: &self.picture,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn resolved(&self) -> &ResolvedPicture {
        &self.resolved
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    pub fn picture(&self) -> &PictureElement {
        &self.picture
    }

    pub fn replacement(&self) -> Option<&PictureElement> {
        self.replacement.as_ref()
    }

    pub fn load_state(&self) -> Option<LoadState> {
        self.controller.as_ref().map(LoadController::state)
    }

    pub fn is_intersecting(&self) -> bool {
        self.gate.is_intersecting()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_hover_scope_cached(&self) -> bool {
        self.scope.is_cached()
    }
}
