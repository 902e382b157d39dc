//! Render tree and HTML fragment rendering.
//!
//! The component keeps its `<picture>` as a small element model so the load
//! controller's effects (assigning `src`, swapping trees) can be applied
//! before or after rendering. Rendering uses [maud](https://maud.lambda.xyz/)
//! and wraps everything in a declarative shadow root, so the fragment's
//! styles stay encapsulated:
//!
//! ```text
//! <a-picture role="img" loading="lazy">
//!   <template shadowrootmode="open">
//!     <style>…</style>
//!     <picture>
//!       <source srcset="…" media="…">
//!       <img data-src="…" alt="…" decoding="async" loading="lazy">
//!     </picture>
//!   </template>
//! </a-picture>
//! ```

use crate::attributes::Attributes;
use crate::types::{DecodingHint, LoadingHint, SourceCandidate};
use maud::{Markup, PreEscaped, html};
use std::fmt::Write as _;

/// Tag name of the host element.
pub const TAG_NAME: &str = "a-picture";

/// An `<img>` in the render tree.
///
/// `data_src` holds the intended URL; `src` is only set once fetching may
/// start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageElement {
    pub data_src: String,
    pub src: Option<String>,
    pub alt: String,
    pub decoding: DecodingHint,
    pub loading: LoadingHint,
}

/// A `<picture>` in the render tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PictureElement {
    pub sources: Vec<SourceCandidate>,
    pub img: Option<ImageElement>,
    pub hover: bool,
}

/// Everything needed to render one host element.
#[derive(Debug, Clone, Copy)]
pub struct Host<'a> {
    pub attributes: &'a Attributes,
    pub styles: &'a [String],
    pub picture: &'a PictureElement,
}

pub fn render_picture(picture: &PictureElement) -> Markup {
    html! {
        picture class=[picture.hover.then_some("hover")] {
            @for source in &picture.sources {
                source srcset=(source.srcset) type=[source.mime_type.as_deref()] media=[source.media.as_deref()];
            }
            @if let Some(img) = &picture.img {
                img data-src=(img.data_src)
                    src=[img.src.as_deref()]
                    alt=(img.alt)
                    decoding=(img.decoding.as_str())
                    loading=(img.loading.as_str());
            }
        }
    }
}

/// Escape an attribute value the same way maud escapes interpolations.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    // Writing into a String cannot fail.
    let _ = maud::Escaper::new(&mut out).write_str(value);
    out
}

/// HTML attribute-name grammar: non-empty, no whitespace, controls, quotes,
/// `<`, `>`, `/` or `=`.
fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace()
                || c.is_control()
                || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

fn open_tag(attributes: &Attributes) -> String {
    let mut tag = format!("<{TAG_NAME}");
    for (name, value) in attributes.iter() {
        if !is_attribute_name(name) {
            tracing::warn!(name, "a-picture attribute skipped: invalid attribute name");
            continue;
        }
        if value.is_empty() {
            let _ = write!(tag, " {name}");
        } else {
            let _ = write!(tag, " {name}=\"{}\"", escape(value));
        }
    }
    tag.push('>');
    tag
}

/// Render the host element with its encapsulated styles and picture.
pub fn render_fragment(host: Host<'_>) -> Markup {
    html! {
        (PreEscaped(open_tag(host.attributes)))
        template shadowrootmode="open" {
            @for css in host.styles {
                style { (PreEscaped(css)) }
            }
            (render_picture(host.picture))
        }
        (PreEscaped(format!("</{TAG_NAME}>")))
    }
}
