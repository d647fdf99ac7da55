// User-defined keyword coloring rules
// Ordered list persisted as JSON through the preference store

use serde::{Deserialize, Serialize};

/// A keyword coloring rule: events whose title contains one of the
/// keywords (case-insensitive) render in `color`. Rules are evaluated
/// in list order and the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRule {
    pub id: String,
    pub name: String,
    pub keywords: Vec<String>,
    /// Hex color, `#RRGGBB`.
    pub color: String,
}

impl ColorRule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        keywords: Vec<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            keywords,
            color: color.into(),
        }
    }

    /// Whether any keyword occurs as a case-insensitive substring of `title`.
    pub fn matches(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && title.contains(&keyword.to_lowercase()))
    }
}

/// Built-in rules used until the user defines their own (and whenever
/// the persisted list cannot be read back).
pub fn default_rules() -> Vec<ColorRule> {
    vec![
        ColorRule::new(
            "builtin-classes",
            "Classes",
            vec!["lecture".to_string(), "class".to_string()],
            "#3F51B5",
        ),
        ColorRule::new(
            "builtin-meetings",
            "Meetings",
            vec![
                "meeting".to_string(),
                "standup".to_string(),
                "1:1".to_string(),
            ],
            "#0B8043",
        ),
        ColorRule::new(
            "builtin-deadlines",
            "Deadlines",
            vec!["due".to_string(), "deadline".to_string()],
            "#C62828",
        ),
    ]
}
