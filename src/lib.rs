//! # Picture Atom
//!
//! A responsive, lazily loading picture component. A host element described
//! by its attributes becomes an encapsulated `<picture>` fragment with
//! breakpoint-aware sources, deferred fetching, and an optional
//! low-quality-first reveal.
//!
//! # Architecture
//!
//! Rendering is a pipeline of pure steps; loading is an explicit state
//! machine driven by host callbacks:
//!
//! ```text
//! attributes ─▶ resolve ─▶ synth ─▶ render        (pure, idempotent)
//!
//! connect ─▶ gate ─▶ LoadController ─▶ Effect ─▶ component applies
//!                        │
//!                        └─▶ Notification ─▶ EventSink
//! ```
//!
//! The host (a browser binding, a server-side renderer, or a test) owns the
//! document and supplies the platform primitives through traits:
//! [`gate::IntersectionObserver`], [`hover::DocumentTree`],
//! [`events::EventSink`], and [`styles::StylesheetSource`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`attributes`] | Raw host attributes and lenient JSON attribute parsing |
//! | [`resolve`] | Attribute resolver: descriptors, flags, and authoring warnings |
//! | [`breakpoints`] | Fixed size-class → media-condition table |
//! | [`synth`] | Source synthesizer: width variants and quality downgrade |
//! | [`gate`] | Visibility gate over the host intersection primitive |
//! | [`load`] | Progressive load controller with one-shot completion tickets |
//! | [`hover`] | Hover scope resolution across shadow boundaries |
//! | [`events`] | Outgoing notifications and click interception |
//! | [`styles`] | Base stylesheet and the shared variant stylesheet cache |
//! | [`render`] | Render tree and declarative-shadow-root HTML via Maud |
//! | [`component`] | The component lifecycle tying everything together |
//! | [`config`] | Layered `picture.toml` loading and validation |
//! | [`types`] | Shared descriptor and hint types |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Effects Instead of Mutation
//!
//! The load controller never touches the render tree. It returns
//! [`load::Effect`]s and a [`load::LoadTicket`] that must be handed back to
//! settle the load. A completion therefore resolves the machine at most once,
//! and a completion arriving after teardown is dropped.
//!
//! ## Deterministic Synthesis
//!
//! Source synthesis depends only on the image URL, the natural width, and
//! the configured step. Re-rendering the same element produces the same
//! candidate list, so hosts can diff fragments.
//!
//! ## Shared Variant Stylesheets
//!
//! Namespace stylesheets are read once per process and shared read-only
//! between every component instance.

pub mod attributes;
pub mod breakpoints;
pub mod component;
pub mod config;
pub mod events;
pub mod gate;
pub mod hover;
pub mod load;
pub mod output;
pub mod render;
pub mod resolve;
pub mod styles;
pub mod synth;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
