//! The fixed breakpoint table for explicitly declared sources.
//!
//! The four named classes partition the viewport width domain without gaps:
//!
//! ```text
//! small        ..=400
//! medium    401..=600
//! large     601..=1200
//! extra-large 1201..
//! ```

use crate::types::{SizeClass, SourceCandidate, SourceDescriptor};

/// Table rows in declaration order.
pub const BREAKPOINT_TABLE: [(SizeClass, &str); 4] = [
    (SizeClass::Small, "(max-width: 400px)"),
    (SizeClass::Medium, "(min-width: 401px) and (max-width: 600px)"),
    (SizeClass::Large, "(min-width: 601px) and (max-width: 1200px)"),
    (SizeClass::ExtraLarge, "(min-width: 1201px)"),
];

/// Media condition for a size class. `Unspecified` always matches.
pub fn media_condition(size: SizeClass) -> Option<&'static str> {
    BREAKPOINT_TABLE
        .iter()
        .find(|(class, _)| *class == size)
        .map(|(_, media)| *media)
}

/// Translate a declared source into a renderable candidate.
pub fn translate(source: &SourceDescriptor) -> SourceCandidate {
    SourceCandidate {
        srcset: source.url.clone(),
        mime_type: Some(source.mime_type.clone()),
        media: media_condition(source.size_class).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_classes_have_conditions() {
        assert_eq!(media_condition(SizeClass::Small), Some("(max-width: 400px)"));
        assert_eq!(
            media_condition(SizeClass::ExtraLarge),
            Some("(min-width: 1201px)")
        );
        assert_eq!(media_condition(SizeClass::Unspecified), None);
    }

    #[test]
    fn table_ranges_are_contiguous() {
        // Each row's lower bound is the previous row's upper bound + 1.
        let bounds: Vec<(Option<u32>, Option<u32>)> = BREAKPOINT_TABLE
            .iter()
            .map(|(_, media)| {
                let grab = |key: &str| {
                    media.find(key).map(|at| {
                        let rest = &media[at + key.len()..];
                        rest[..rest.find("px").unwrap()].parse::<u32>().unwrap()
                    })
                };
                (grab("min-width: "), grab("max-width: "))
            })
            .collect();
        assert_eq!(bounds[0].0, None);
        assert_eq!(bounds[3].1, None);
        for pair in bounds.windows(2) {
            assert_eq!(pair[0].1.unwrap() + 1, pair[1].0.unwrap());
        }
    }

    #[test]
    fn translate_keeps_url_and_type() {
        let candidate = translate(&SourceDescriptor {
            url: "a.webp".into(),
            mime_type: "image/webp".into(),
            size_class: SizeClass::Medium,
        });
        assert_eq!(candidate.srcset, "a.webp");
        assert_eq!(candidate.mime_type.as_deref(), Some("image/webp"));
        assert_eq!(
            candidate.media.as_deref(),
            Some("(min-width: 401px) and (max-width: 600px)")
        );
    }
}
