//! Configuration resolver: declared attributes → normalized picture model.
//!
//! Resolution never fails. Defects in the declaration (missing alt text,
//! incomplete `sources` entries, unparseable values) become [`Warning`]s that
//! are logged and handed back to the caller, and the affected feature is
//! dropped while the rest of the element still renders.

use crate::attributes::{Attributes, parse_attribute};
use crate::config::PictureConfig;
use crate::styles::is_css_keyword;
use crate::types::{
    DecodingHint, HoverScope, ImageDescriptor, LoadingHint, Namespace, SizeClass,
    SourceCandidate, SourceDescriptor,
};
use serde::Deserialize;
use thiserror::Error;

/// Non-fatal configuration defect.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Warning {
    #[error("a-picture alt is missing for {url}")]
    MissingAlt { url: String },
    #[error("a-picture src - missing attributes: {}", .missing.join(" "))]
    IncompleteSource {
        index: usize,
        missing: Vec<&'static str>,
    },
    #[error("a-picture sources attribute ignored: {0}")]
    UnparseableSources(String),
    #[error("a-picture aspect-ratio {0:?} is not a positive number")]
    InvalidAspectRatio(String),
    #[error("a-picture {url:?} cannot be resolved: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("a-picture pointer-events {0:?} is not a CSS keyword")]
    InvalidPointerEvents(String),
    #[error("a-picture has neither defaultSource nor an img child")]
    NoImage,
}

/// A pre-supplied child of the host element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildElement {
    Img { src: String, alt: Option<String> },
    Source(SourceCandidate),
}

/// Normalized model of one picture declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPicture {
    /// Well-formed explicit declarations, in declared order.
    pub sources: Vec<SourceDescriptor>,
    /// `<source>` children supplied with the host, already translated.
    pub child_sources: Vec<SourceCandidate>,
    pub image: Option<ImageDescriptor>,
    pub namespace: Option<Namespace>,
    pub open_modal_event: Option<String>,
    pub load_event: Option<String>,
    pub hover_scope: HoverScope,
    pub aspect_ratio: Option<f64>,
    pub pointer_events: Option<String>,
}

impl ResolvedPicture {
    pub fn loading(&self) -> LoadingHint {
        self.image
            .as_ref()
            .map(|image| image.loading)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub picture: ResolvedPicture,
    pub warnings: Vec<Warning>,
}

/// One entry of the `sources` attribute as written by the author.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeclaredSource {
    #[serde(alias = "src")]
    source: Option<String>,
    #[serde(rename = "type")]
    mime_type: Option<String>,
    size: Option<String>,
}

impl DeclaredSource {
    fn validate(self, index: usize) -> Result<SourceDescriptor, Warning> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        let missing: Vec<&'static str> = [
            ("src", present(&self.source)),
            ("type", present(&self.mime_type)),
            ("size", present(&self.size)),
        ]
        .into_iter()
        .filter_map(|(name, ok)| (!ok).then_some(name))
        .collect();
        if !missing.is_empty() {
            return Err(Warning::IncompleteSource { index, missing });
        }
        Ok(SourceDescriptor {
            url: self.source.unwrap_or_default(),
            mime_type: self.mime_type.unwrap_or_default(),
            size_class: SizeClass::parse(self.size.as_deref().unwrap_or_default()),
        })
    }
}

fn push(warnings: &mut Vec<Warning>, warning: Warning) {
    tracing::warn!("{warning}");
    warnings.push(warning);
}

/// Resolve `raw` against the configured base URL.
pub fn resolve_url(base: &str, raw: &str) -> Result<String, url::ParseError> {
    let base = url::Url::parse(base)?;
    Ok(base.join(raw)?.to_string())
}

/// Absolute form of an authored URL. Unresolvable values are kept as written
/// and reported.
fn resolve_or_warn(base: &str, raw: &str, warnings: &mut Vec<Warning>) -> String {
    resolve_url(base, raw).unwrap_or_else(|err| {
        push(
            warnings,
            Warning::InvalidUrl {
                url: raw.to_string(),
                reason: err.to_string(),
            },
        );
        raw.to_string()
    })
}

/// Child `srcset` values are resolved only when they hold a single bare URL;
/// candidate lists with width or density descriptors pass through.
fn resolve_srcset(base: &str, srcset: &str) -> String {
    if srcset.trim().contains(char::is_whitespace) || srcset.contains(',') {
        return srcset.to_string();
    }
    resolve_url(base, srcset.trim()).unwrap_or_else(|_| srcset.to_string())
}

/// Event name of an opt-in notification attribute. A present but empty
/// attribute uses the attribute name itself.
fn event_name(attributes: &Attributes, name: &str) -> Option<String> {
    attributes.get(name).map(|value| {
        if value.is_empty() {
            name.to_string()
        } else {
            value.to_string()
        }
    })
}

pub fn resolve(
    attributes: &Attributes,
    children: &[ChildElement],
    config: &PictureConfig,
) -> Resolution {
    let mut warnings = Vec::new();

    let load_event = event_name(attributes, "picture-load");
    // A caller that wants a load event wants it promptly.
    let loading = if load_event.is_some() {
        LoadingHint::Eager
    } else {
        attributes
            .non_empty("loading")
            .map(LoadingHint::parse)
            .unwrap_or_default()
    };

    let mut image = None;
    let mut child_sources = Vec::new();
    for child in children {
        match child {
            ChildElement::Img { src, alt } => {
                image = Some(ImageDescriptor {
                    raw_source: resolve_url(&config.base_url, src).unwrap_or_else(|_| src.clone()),
                    alt: alt.clone().unwrap_or_default(),
                    decoding: DecodingHint::Async,
                    loading,
                });
            }
            ChildElement::Source(candidate) => child_sources.push(SourceCandidate {
                srcset: resolve_srcset(&config.base_url, &candidate.srcset),
                ..candidate.clone()
            }),
        }
    }

    if let Some(default_source) = attributes.non_empty("defaultSource") {
        let raw_source = resolve_or_warn(&config.base_url, default_source, &mut warnings);
        let alt = attributes.non_empty("alt").unwrap_or_default().to_string();
        if alt.is_empty() {
            push(
                &mut warnings,
                Warning::MissingAlt {
                    url: raw_source.clone(),
                },
            );
        }
        image = Some(ImageDescriptor {
            raw_source,
            alt,
            decoding: DecodingHint::Async,
            loading,
        });
    }
    if image.is_none() {
        push(&mut warnings, Warning::NoImage);
    }

    let mut sources = Vec::new();
    if let Some(raw) = attributes.non_empty("sources") {
        match parse_attribute::<Vec<DeclaredSource>>("sources", raw) {
            Ok(declared) => {
                for (index, entry) in declared.into_iter().enumerate() {
                    match entry.validate(index) {
                        Ok(mut source) => {
                            source.url = resolve_or_warn(&config.base_url, &source.url, &mut warnings);
                            sources.push(source);
                        }
                        Err(warning) => push(&mut warnings, warning),
                    }
                }
            }
            Err(err) => push(&mut warnings, Warning::UnparseableSources(err.to_string())),
        }
    }

    let aspect_ratio = attributes.get("aspect-ratio").and_then(|raw| {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => Some(value),
            _ => {
                push(&mut warnings, Warning::InvalidAspectRatio(raw.to_string()));
                None
            }
        }
    });

    let pointer_events = attributes.non_empty("pointer-events").and_then(|value| {
        if is_css_keyword(value) {
            Some(value.to_string())
        } else {
            push(&mut warnings, Warning::InvalidPointerEvents(value.to_string()));
            None
        }
    });

    let hover_scope = if attributes.has("hover-on-parent-element") {
        HoverScope::Parent
    } else if attributes.has("hover-on-parent-shadow-root-host") {
        HoverScope::ParentShadowHost
    } else {
        HoverScope::SelfElement
    };

    Resolution {
        picture: ResolvedPicture {
            sources,
            child_sources,
            image,
            namespace: attributes.get("namespace").and_then(Namespace::parse),
            open_modal_event: event_name(attributes, "open-modal"),
            load_event,
            hover_scope,
            aspect_ratio,
            pointer_events,
        },
        warnings,
    }
}
