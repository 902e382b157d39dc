//! Source synthesizer.
//!
//! Produces the ordered `<source>` candidates of a picture. Explicit
//! declarations are translated through the breakpoint table. Without any, an
//! image URL that exposes a `width` query parameter is expanded into a
//! step-wise sequence of width variants:
//!
//! ```text
//! width=300, step 50
//!
//! (max-width: 50px)                          ?width=50
//! (min-width: 51px) and (max-width: 100px)   ?width=100
//! ...
//! (min-width: 201px) and (max-width: 250px)  ?width=250
//! (min-width: 251px)                         (width omitted → original)
//! ```
//!
//! Every function here is pure: the same inputs always give the same output,
//! which keeps re-renders idempotent.

use crate::breakpoints;
use crate::config::SynthesisConfig;
use crate::resolve::ResolvedPicture;
use crate::types::{ImageDescriptor, SourceCandidate, SourceDescriptor};
use url::Url;

/// Candidates for a resolved picture.
///
/// Pre-supplied `<source>` children come first, followed by the explicit
/// declarations. Synthesis only runs when both are empty.
pub fn candidates_for(
    picture: &ResolvedPicture,
    natural_width: Option<u32>,
    config: &SynthesisConfig,
) -> Vec<SourceCandidate> {
    if !picture.child_sources.is_empty() {
        let mut candidates = picture.child_sources.clone();
        candidates.extend(picture.sources.iter().map(breakpoints::translate));
        return candidates;
    }
    match &picture.image {
        Some(image) => synthesize(image, &picture.sources, natural_width, config),
        None => picture.sources.iter().map(breakpoints::translate).collect(),
    }
}

/// Explicit sources win; otherwise derive width variants from the image URL.
pub fn synthesize(
    image: &ImageDescriptor,
    explicit: &[SourceDescriptor],
    natural_width: Option<u32>,
    config: &SynthesisConfig,
) -> Vec<SourceCandidate> {
    if !explicit.is_empty() {
        return explicit.iter().map(breakpoints::translate).collect();
    }
    let url = match Url::parse(&image.raw_source) {
        Ok(url) => url,
        Err(err) => {
            tracing::debug!(source = %image.raw_source, %err, "no synthesis for unparseable url");
            return Vec::new();
        }
    };
    let Some(declared) = query_param(&url, "width").filter(|w| !w.is_empty()) else {
        return Vec::new();
    };
    let upper = natural_width
        .filter(|w| *w > 0)
        .or_else(|| parse_width(&declared));
    match upper {
        Some(upper) => variant_sequence(url, clamp_width(upper, config), config),
        None => Vec::new(),
    }
}

fn clamp_width(upper: u32, config: &SynthesisConfig) -> u32 {
    if upper > config.max_width {
        tracing::warn!(
            width = upper,
            max_width = config.max_width,
            "a-picture width clamped before synthesis"
        );
        config.max_width
    } else {
        upper
    }
}

fn parse_width(raw: &str) -> Option<u32> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then(|| value.ceil() as u32)
}

/// Step-wise variants up to `upper`: `ceil(upper / step)` entries.
fn variant_sequence(mut url: Url, upper: u32, config: &SynthesisConfig) -> Vec<SourceCandidate> {
    let step = config.step.max(1);
    set_query_param(&mut url, "height", None);
    let mime_type = if query_param(&url, "format").is_some() {
        set_query_param(&mut url, "format", Some(&config.format));
        Some(config.mime_type.clone())
    } else {
        None
    };

    let count = upper.div_ceil(step);
    (1..=count)
        .map(|k| {
            let lower = (k > 1).then(|| (k - 1) * step);
            let bound = (k < count).then(|| k * step);
            let mut variant = url.clone();
            let width = bound.map(|b| b.to_string());
            set_query_param(&mut variant, "width", width.as_deref());
            SourceCandidate {
                srcset: variant.to_string(),
                mime_type: mime_type.clone(),
                media: media_range(lower, bound),
            }
        })
        .collect()
}

/// Media condition for the half-open range `(lower, upper]`.
pub fn media_range(lower: Option<u32>, upper: Option<u32>) -> Option<String> {
    match (lower, upper) {
        (None, None) => None,
        (None, Some(upper)) => Some(format!("(max-width: {upper}px)")),
        (Some(lower), Some(upper)) => Some(format!(
            "(min-width: {}px) and (max-width: {upper}px)",
            lower + 1
        )),
        (Some(lower), None) => Some(format!("(min-width: {}px)", lower + 1)),
    }
}

// ============================================================================
// Quality downgrade
// ============================================================================

/// Whether a URL carries a non-empty `quality` query parameter.
pub fn has_quality(raw: &str) -> bool {
    Url::parse(raw)
        .ok()
        .and_then(|url| query_param(&url, "quality"))
        .is_some_and(|q| !q.is_empty())
}

/// `raw` with its `quality` query value replaced. Unparseable URLs are
/// returned unchanged.
pub fn with_quality(raw: &str, quality: u32) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            set_query_param(&mut url, "quality", Some(&quality.to_string()));
            url.to_string()
        }
        Err(_) => raw.to_string(),
    }
}

/// Placeholder-stage copies of `sources`: same media conditions and types,
/// forced quality. Maps one-to-one so both stages share the same shape.
pub fn degrade_quality(sources: &[SourceCandidate], quality: u32) -> Vec<SourceCandidate> {
    sources
        .iter()
        .map(|source| SourceCandidate {
            srcset: with_quality(&source.srcset, quality),
            ..source.clone()
        })
        .collect()
}

// ============================================================================
// Query helpers
// ============================================================================

pub fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Set or delete a query parameter.
///
/// A replaced key keeps its position, a new key is appended, and duplicate
/// keys collapse into the first occurrence.
pub fn set_query_param(url: &mut Url, key: &str, value: Option<&str>) {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut seen = false;
    for (k, v) in url.query_pairs() {
        if k == key {
            if !seen {
                seen = true;
                if let Some(value) = value {
                    pairs.push((k.into_owned(), value.to_string()));
                }
            }
        } else {
            pairs.push((k.into_owned(), v.into_owned()));
        }
    }
    if let (false, Some(value)) = (seen, value) {
        pairs.push((key.to_string(), value.to_string()));
    }
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&pairs);
    }
}
