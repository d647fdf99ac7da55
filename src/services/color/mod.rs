//! Display color resolution for events.
//!
//! Priority chain, highest first: a structured `[type: <word>]` tag in
//! the description, then the first matching user keyword rule on the
//! title, then a fixed 12-color palette indexed by the event's ordinal.
//! Colors coming from the provider's per-calendar setting additionally
//! pass a legibility guard before white text is painted on them.

use crate::models::color_rule::ColorRule;

/// Fallback palette cycled by ordinal index. Every entry is dark enough
/// for white text.
pub const FALLBACK_PALETTE: [&str; 12] = [
    "#3F51B5", "#0B8043", "#8E24AA", "#D81B60", "#AD1457", "#F4511E", "#EF6C00", "#7CB342",
    "#039BE5", "#009688", "#795548", "#616161",
];

/// Task-type tag palette. A `[type: exam]` style tag is an explicit
/// classification and outranks every keyword rule.
const TASK_TYPE_COLORS: [(&str, &str); 6] = [
    ("homework", "#3F51B5"),
    ("assignment", "#1976D2"),
    ("lab", "#00796B"),
    ("quiz", "#E64A19"),
    ("exam", "#C62828"),
    ("project", "#7B1FA2"),
];

/// Provider colors known to be too light, remapped to hand-picked
/// darker equivalents before the luminance test runs.
const LIGHT_COLOR_REMAP: [(&str, &str); 6] = [
    ("#A4BDFC", "#3F51B5"),
    ("#7AE7BF", "#0B8043"),
    ("#FBD75B", "#EF6C00"),
    ("#FFB878", "#EF6C00"),
    ("#DBADFF", "#8E24AA"),
    ("#E1E1E1", "#616161"),
];

/// Luminance above which a background is considered too light for
/// white text.
const LIGHT_LUMINANCE_THRESHOLD: f32 = 0.6;

/// Resolve the display color for an event.
///
/// Pure: the same `(title, description, ordinal, rules)` always yields
/// the same hex string.
pub fn resolve(
    title: &str,
    description: Option<&str>,
    ordinal: usize,
    rules: &[ColorRule],
) -> String {
    if let Some(color) = description.and_then(task_type_color) {
        return color.to_string();
    }

    if let Some(rule) = rules.iter().find(|rule| rule.matches(title)) {
        return rule.color.clone();
    }

    palette_color(ordinal).to_string()
}

/// Palette fallback for an ordinal index.
pub fn palette_color(ordinal: usize) -> &'static str {
    FALLBACK_PALETTE[ordinal % FALLBACK_PALETTE.len()]
}

/// Full resolution chain as the views use it: the [`resolve`] priority
/// chain, except that when neither a tag nor a rule matched and the
/// host supplied the provider's per-calendar color, that color (vetted
/// for legibility) takes the place of the ordinal palette.
pub fn display_color(
    title: &str,
    description: Option<&str>,
    ordinal: usize,
    rules: &[ColorRule],
    provider_color: Option<&str>,
) -> String {
    if let Some(color) = description.and_then(task_type_color) {
        return color.to_string();
    }
    if let Some(rule) = rules.iter().find(|rule| rule.matches(title)) {
        return rule.color.clone();
    }
    match provider_color {
        Some(hex) => legible_provider_color(hex, ordinal),
        None => palette_color(ordinal).to_string(),
    }
}

/// Vet a provider-supplied calendar color for white-text legibility.
///
/// Known light provider colors are remapped to darker equivalents
/// first; anything still too light falls back to the ordinal palette.
pub fn legible_provider_color(hex: &str, ordinal: usize) -> String {
    let remapped = LIGHT_COLOR_REMAP
        .iter()
        .find(|(light, _)| light.eq_ignore_ascii_case(hex))
        .map(|(_, dark)| *dark)
        .unwrap_or(hex);

    match parse_hex(remapped) {
        Some((r, g, b)) if luminance(r, g, b) <= LIGHT_LUMINANCE_THRESHOLD => {
            remapped.to_string()
        }
        _ => palette_color(ordinal).to_string(),
    }
}

/// Perceived luminance of an RGB color, normalized to [0, 1].
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}

/// Parse a `#RRGGBB` hex color. Returns `None` for anything malformed.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Extract the `[type: <word>]` classification from a description and
/// map it to the task-type palette.
fn task_type_color(description: &str) -> Option<&'static str> {
    let word = structured_tag(description)?;
    TASK_TYPE_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(&word))
        .map(|(_, color)| *color)
}

/// Find a `[type: <word>]` tag, case-insensitive, anywhere in the text.
fn structured_tag(description: &str) -> Option<String> {
    let lower = description.to_lowercase();
    let tag_start = lower.find("[type:")?;
    let rest = &lower[tag_start + "[type:".len()..];
    let close = rest.find(']')?;
    let word = rest[..close].trim();
    if word.is_empty() || word.contains(char::is_whitespace) {
        return None;
    }
    Some(word.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn exam_rule() -> Vec<ColorRule> {
        vec![ColorRule::new(
            "r1",
            "Exams",
            vec!["exam".to_string()],
            "#112233",
        )]
    }

    #[test]
    fn structured_tag_beats_keyword_rule() {
        // The title would match the rule, but the tag is an explicit
        // classification and must win.
        let color = resolve(
            "Final exam review",
            Some("[type: quiz] chapters 4-6"),
            0,
            &exam_rule(),
        );
        assert_eq!(color, "#E64A19");
    }

    #[test]
    fn tag_parsing_is_case_insensitive() {
        let color = resolve("Revision", Some("[TYPE: Exam]"), 0, &[]);
        assert_eq!(color, "#C62828");
    }

    #[test]
    fn unknown_tag_falls_through_to_rules() {
        let color = resolve("Final exam", Some("[type: picnic]"), 0, &exam_rule());
        assert_eq!(color, "#112233");
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = vec![
            ColorRule::new("r1", "First", vec!["sync".to_string()], "#111111"),
            ColorRule::new("r2", "Second", vec!["sync".to_string()], "#222222"),
        ];
        assert_eq!(resolve("Weekly Sync", None, 0, &rules), "#111111");
    }

    #[test]
    fn palette_fallback_cycles_deterministically() {
        assert_eq!(resolve("Untitled", None, 0, &[]), FALLBACK_PALETTE[0]);
        assert_eq!(resolve("Untitled", None, 11, &[]), FALLBACK_PALETTE[11]);
        assert_eq!(resolve("Untitled", None, 12, &[]), FALLBACK_PALETTE[0]);
    }

    #[test]
    fn resolve_is_pure() {
        let rules = exam_rule();
        let first = resolve("Exam prep", Some("notes"), 3, &rules);
        let second = resolve("Exam prep", Some("notes"), 3, &rules);
        assert_eq!(first, second);
    }

    #[test_case("#FFFFFF", 1.0; "white")]
    #[test_case("#000000", 0.0; "black")]
    fn luminance_extremes(hex: &str, expected: f32) {
        let (r, g, b) = parse_hex(hex).unwrap();
        assert!((luminance(r, g, b) - expected).abs() < 1e-6);
    }

    #[test]
    fn provider_color_kept_when_dark_enough() {
        assert_eq!(legible_provider_color("#3F51B5", 4), "#3F51B5");
    }

    #[test]
    fn light_provider_color_is_remapped() {
        assert_eq!(legible_provider_color("#A4BDFC", 4), "#3F51B5");
        assert_eq!(legible_provider_color("#a4bdfc", 4), "#3F51B5");
    }

    #[test]
    fn unknown_light_color_falls_back_to_palette() {
        assert_eq!(legible_provider_color("#FFFDE7", 2), FALLBACK_PALETTE[2]);
    }

    #[test]
    fn malformed_provider_color_falls_back_to_palette() {
        assert_eq!(legible_provider_color("teal", 5), FALLBACK_PALETTE[5]);
        assert_eq!(legible_provider_color("#12", 5), FALLBACK_PALETTE[5]);
    }

    #[test]
    fn display_color_prefers_rules_over_provider_color() {
        let color = display_color("Final exam", None, 0, &exam_rule(), Some("#3F51B5"));
        assert_eq!(color, "#112233");
    }

    #[test]
    fn display_color_uses_vetted_provider_color_last() {
        assert_eq!(
            display_color("Untitled", None, 0, &[], Some("#00796B")),
            "#00796B"
        );
        // Too-light provider color falls back to the ordinal palette
        assert_eq!(
            display_color("Untitled", None, 3, &[], Some("#FFFDE7")),
            FALLBACK_PALETTE[3]
        );
    }

    #[test]
    fn tag_requires_single_word() {
        assert!(structured_tag("[type: two words]").is_none());
        assert!(structured_tag("[type:]").is_none());
        assert!(structured_tag("no tag here").is_none());
        assert_eq!(structured_tag("x [type: lab] y").as_deref(), Some("lab"));
    }
}
