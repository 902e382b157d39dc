//! Scoped styles for the component.
//!
//! The base stylesheet is generated per element (aspect ratio and the mobile
//! breakpoint are interpolated). Namespace variants are external files,
//! fetched once per process and cached by absolute path; every component
//! instance shares the cached text read-only.
//!
//! ## Style variables
//!
//! | Variable | Default |
//! |---|---|
//! | `--img-width` / `--img-height` | `100%` / `auto` |
//! | `--img-object-fit` | `cover` |
//! | `--img-margin` | `auto` |
//! | `--filter`, `--transform` | `none` |
//! | `--border-radius` | `0` |
//!
//! Each has a `-mobile` override below the mobile breakpoint, and `--filter` /
//! `--transform` have `-hover` overrides.

use crate::types::Namespace;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("IO error reading stylesheet {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Injected while swapping in the full-quality tree so the host's default
/// reveal animation does not replay.
pub const SUPPRESS_REVEAL_CSS: &str = ":host {\n  --show: none;\n}\n";

const BASE_CSS: &str = r#":host([open-modal]) {
  cursor: pointer;
}
:host picture {
  display: var(--display, inline);
}
:host picture img {
  aspect-ratio: _aspect-ratio_;
  border-radius: var(--border-radius, 0);
  display: var(--img-display, block);
  filter: var(--filter, none);
  height: var(--img-height, auto);
  margin: var(--img-margin, auto);
  max-height: var(--img-max-height, 75vh);
  max-width: var(--img-max-width, 100%);
  min-height: var(--img-min-height, unset);
  min-width: var(--img-min-width, unset);
  object-fit: var(--img-object-fit, cover);
  overflow: var(--overflow, initial);
  transform: var(--transform, none);
  transition: var(--transition, none);
  vertical-align: middle;
  width: var(--img-width, 100%);
}
:host picture img:hover, :host picture.hover img {
  filter: var(--filter-hover, var(--filter, none));
  transform: var(--transform-hover, var(--transform, none));
}
@media only screen and (max-width: _max-width_) {
  :host picture img {
    border-radius: var(--border-radius-mobile, 0);
    filter: var(--filter-mobile, var(--filter, none));
    height: var(--img-height-mobile, var(--img-height, auto));
    margin: var(--img-margin-mobile, var(--img-margin, auto));
    object-fit: var(--img-object-fit-mobile, var(--img-object-fit, cover));
    transform: var(--transform-mobile, var(--transform, none));
    transition: var(--transition-mobile, var(--transition, none));
    width: var(--img-width-mobile, var(--img-width, 100%));
  }
  :host picture img:hover, :host picture.hover img {
    filter: var(--filter-mobile-hover, var(--filter-hover, var(--filter, none)));
    transform: var(--transform-mobile-hover, var(--transform-hover, var(--transform, none)));
  }
}
"#;

/// The element's base stylesheet.
///
/// An explicit aspect ratio is applied as `1/<ratio>`; otherwise the
/// `--aspect-ratio` variable decides.
pub fn base_css(aspect_ratio: Option<f64>, mobile_max_width: &str) -> String {
    let aspect = match aspect_ratio {
        Some(ratio) => format!("1/{ratio}"),
        None => "var(--aspect-ratio, auto)".to_string(),
    };
    BASE_CSS
        .replace("_aspect-ratio_", &aspect)
        .replace("_max-width_", mobile_max_width)
}

/// Whether `value` is a bare CSS keyword such as `none` or `visible-fill`.
pub fn is_css_keyword(value: &str) -> bool {
    value.starts_with(|c: char| c.is_ascii_alphabetic())
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Override rule for the image's `pointer-events`. Anything but a bare
/// keyword yields `None`, since the rule is emitted unescaped.
pub fn pointer_events_css(value: &str) -> Option<String> {
    is_css_keyword(value)
        .then(|| format!(":host picture img {{\n  pointer-events: {value};\n}}\n"))
}

// ============================================================================
// Variant stylesheets
// ============================================================================

/// Where variant stylesheet text comes from.
pub trait StylesheetSource {
    fn fetch(&self, path: &Path) -> Result<String, StyleError>;
}

/// Reads stylesheets from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStylesheets;

impl StylesheetSource for FsStylesheets {
    fn fetch(&self, path: &Path) -> Result<String, StyleError> {
        std::fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

static STYLESHEETS: LazyLock<Mutex<HashMap<PathBuf, Arc<str>>>> = LazyLock::new(Default::default);

/// Process-wide stylesheet cache keyed by absolute path.
#[derive(Debug, Clone, Copy)]
pub struct StylesheetCache;

impl StylesheetCache {
    /// Cached text for `path`, fetching it on first use.
    pub fn get_or_fetch(
        path: &Path,
        source: &dyn StylesheetSource,
    ) -> Result<Arc<str>, StyleError> {
        let key = absolute(path);
        let mut cache = STYLESHEETS.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(css) = cache.get(&key) {
            tracing::debug!(path = %key.display(), "stylesheet cache hit");
            return Ok(Arc::clone(css));
        }
        tracing::debug!(path = %key.display(), "fetching stylesheet");
        let css: Arc<str> = source.fetch(&key)?.into();
        cache.insert(key, Arc::clone(&css));
        Ok(css)
    }

    pub fn contains(path: &Path) -> bool {
        STYLESHEETS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&absolute(path))
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Path of a namespace's stylesheet below `stylesheet_dir`.
pub fn variant_path(namespace: Namespace, stylesheet_dir: &Path) -> PathBuf {
    stylesheet_dir.join(namespace.stylesheet_path())
}

/// Stylesheet text for a namespace variant, through the shared cache.
pub fn variant_stylesheet(
    namespace: Namespace,
    stylesheet_dir: &Path,
    source: &dyn StylesheetSource,
) -> Result<Arc<str>, StyleError> {
    StylesheetCache::get_or_fetch(&variant_path(namespace, stylesheet_dir), source)
}
