//! Shared value types used across the resolver, synthesizer, controller and
//! renderer.
//!
//! Everything here is plain data. A render pass produces these once and the
//! component owns them until teardown; nothing is shared between instances.

use std::fmt;

/// Coarse breakpoint bucket of an explicitly declared source.
///
/// Unknown size strings parse to [`SizeClass::Unspecified`], which maps to no
/// media condition at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    ExtraLarge,
    Unspecified,
}

impl SizeClass {
    /// Parse the `size` field of a `sources` entry.
    pub fn parse(value: &str) -> Self {
        match value {
            "small" => Self::Small,
            "medium" => Self::Medium,
            "large" => Self::Large,
            "extra-large" => Self::ExtraLarge,
            _ => Self::Unspecified,
        }
    }
}

/// An explicitly declared source, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub url: String,
    pub mime_type: String,
    pub size_class: SizeClass,
}

/// A `<source>` element ready to be committed to the render tree.
///
/// Produced either by translating a [`SourceDescriptor`] through the
/// breakpoint table, by synthesis, or taken as-is from a pre-supplied child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCandidate {
    pub srcset: String,
    pub mime_type: Option<String>,
    pub media: Option<String>,
}

/// Browser loading hint for the target image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingHint {
    Eager,
    #[default]
    Lazy,
}

impl LoadingHint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eager => "eager",
            Self::Lazy => "lazy",
        }
    }

    /// Anything other than `eager` is treated as lazy.
    pub fn parse(value: &str) -> Self {
        if value == "eager" { Self::Eager } else { Self::Lazy }
    }
}

impl fmt::Display for LoadingHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image decoding hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodingHint {
    Sync,
    #[default]
    Async,
}

impl DecodingHint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Async => "async",
        }
    }
}

/// The image a render pass targets.
///
/// `raw_source` is the intended URL. It is rendered as `data-src` and only
/// copied into `src` (which starts the fetch) once the load controller is
/// triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub raw_source: String,
    pub alt: String,
    pub decoding: DecodingHint,
    pub loading: LoadingHint,
}

/// Which element receives hover listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverScope {
    #[default]
    SelfElement,
    Parent,
    ParentShadowHost,
}

/// Named visual variants selectable through the `namespace` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Overflow,
    OverflowScaleUp,
    ScaleUp,
    Teaser,
    StoreLogo,
}

impl Namespace {
    pub const ALL: [Namespace; 5] = [
        Self::Overflow,
        Self::OverflowScaleUp,
        Self::ScaleUp,
        Self::Teaser,
        Self::StoreLogo,
    ];

    /// Unmatched values mean no variant stylesheet.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.attribute_value() == value)
    }

    pub fn attribute_value(self) -> &'static str {
        match self {
            Self::Overflow => "picture-overflow-",
            Self::OverflowScaleUp => "picture-overflow-scale-up-",
            Self::ScaleUp => "picture-scale-up-",
            Self::Teaser => "picture-teaser-",
            Self::StoreLogo => "picture-store-logo-",
        }
    }

    /// Stylesheet location relative to the stylesheet directory.
    pub fn stylesheet_path(self) -> &'static str {
        match self {
            Self::Overflow => "overflow-/overflow-.css",
            Self::OverflowScaleUp => "overflow-scale-up-/overflow-scale-up-.css",
            Self::ScaleUp => "scale-up-/scale-up-.css",
            Self::Teaser => "teaser-/teaser-.css",
            Self::StoreLogo => "store-logo-/store-logo-.css",
        }
    }
}
