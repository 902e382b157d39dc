//! CLI output formatting.
//!
//! # Information-First Display
//!
//! The `check` report describes what the component *resolved*, not which
//! attributes were written: the effective configuration, the intended image,
//! each candidate source with its media condition, and every authoring
//! warning.
//!
//! # Output Format
//!
//! ```text
//! Config
//!     base_url: http://localhost/
//!     synthesis: step 50, format webp (image/webp)
//!     mobile breakpoint: 767px
//!
//! Image
//!     http://localhost/img.jpg?width=300
//!     Alt: A cat
//!     loading: lazy, decoding: async
//!
//! Sources (6)
//! 001 (max-width: 50px)
//!     http://localhost/img.jpg?width=50
//! ...
//! 006 (any width)
//!     http://localhost/img.jpg
//!
//! Warnings (0)
//! ```
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` for testability; `print_*`
//! wrappers write to stdout.

use crate::component::Picture;
use crate::config::PictureConfig;
use crate::resolve::Warning;
use crate::types::{HoverScope, SourceCandidate};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn section(title: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{title} ({n})"),
        None => title.to_string(),
    }
}

/// Two-line source entry: media condition header, then srcset and type.
///
/// ```text
/// 002 (min-width: 51px) and (max-width: 100px)
///     http://x/a.jpg?width=100&format=webp [image/webp]
/// ```
fn source_lines(index: usize, source: &SourceCandidate) -> Vec<String> {
    let media = source.media.as_deref().unwrap_or("(any width)");
    let detail = match &source.mime_type {
        Some(mime) => format!("{}{} [{}]", indent(1), source.srcset, mime),
        None => format!("{}{}", indent(1), source.srcset),
    };
    vec![format!("{} {}", format_index(index), media), detail]
}

fn hover_label(scope: HoverScope) -> &'static str {
    match scope {
        HoverScope::SelfElement => "self",
        HoverScope::Parent => "parent",
        HoverScope::ParentShadowHost => "parent shadow host",
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_config(config: &PictureConfig) -> Vec<String> {
    vec![
        section("Config", None),
        format!("{}base_url: {}", indent(1), config.base_url),
        format!("{}stylesheet_dir: {}", indent(1), config.stylesheet_dir),
        format!(
            "{}synthesis: step {}, format {} ({})",
            indent(1),
            config.synthesis.step,
            config.synthesis.format,
            config.synthesis.mime_type
        ),
        format!(
            "{}mobile breakpoint: {}",
            indent(1),
            config.breakpoints.mobile_max_width
        ),
    ]
}

pub fn format_warnings(warnings: &[Warning]) -> Vec<String> {
    let mut lines = vec![section("Warnings", Some(warnings.len()))];
    lines.extend(warnings.iter().map(|w| format!("{}{w}", indent(1))));
    lines
}

/// Full `check` report for a connected component.
pub fn format_check_report(picture: &Picture, config: &PictureConfig) -> Vec<String> {
    let mut lines = format_config(config);
    lines.push(String::new());

    let resolved = picture.resolved();
    lines.push(section("Image", None));
    match &resolved.image {
        Some(image) => {
            lines.push(format!("{}{}", indent(1), image.raw_source));
            if !image.alt.is_empty() {
                lines.push(format!("{}Alt: {}", indent(1), image.alt));
            }
            let decoding = picture.target().map_or(image.decoding, |img| img.decoding);
            lines.push(format!(
                "{}loading: {}, decoding: {}",
                indent(1),
                resolved.loading(),
                decoding.as_str()
            ));
        }
        None => lines.push(format!("{}(none)", indent(1))),
    }
    if let Some(namespace) = resolved.namespace {
        lines.push(format!("{}namespace: {}", indent(1), namespace.attribute_value()));
    }
    if resolved.hover_scope != HoverScope::SelfElement {
        lines.push(format!("{}hover: {}", indent(1), hover_label(resolved.hover_scope)));
    }
    if let Some(event) = &resolved.open_modal_event {
        lines.push(format!("{}open-modal: {event}", indent(1)));
    }
    if let Some(event) = &resolved.load_event {
        lines.push(format!("{}picture-load: {event}", indent(1)));
    }
    lines.push(String::new());

    // In quality mode the full-quality list is the one worth inspecting.
    let sources = match picture.replacement() {
        Some(full) => &full.sources,
        None => &picture.picture().sources,
    };
    lines.push(section("Sources", Some(sources.len())));
    for (i, source) in sources.iter().enumerate() {
        lines.extend(source_lines(i + 1, source));
    }
    if picture.replacement().is_some() {
        lines.push(format!(
            "{}(placeholder stage at quality {})",
            indent(1),
            config.quality.placeholder
        ));
    }
    lines.push(String::new());

    lines.extend(format_warnings(picture.warnings()));
    lines
}

pub fn print_check_report(picture: &Picture, config: &PictureConfig) {
    for line in format_check_report(picture, config) {
        println!("{}", line);
    }
}
