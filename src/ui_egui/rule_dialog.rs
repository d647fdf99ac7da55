//! Color rule manager dialog.
//!
//! Edits the ordered keyword→color rule list; order matters because
//! the first matching rule wins.

use egui::Color32;

use crate::models::color_rule::ColorRule;
use crate::services::color::parse_hex;

pub struct RuleDialogState {
    rows: Vec<RuleRow>,
    next_id: usize,
}

struct RuleRow {
    id: String,
    name: String,
    keywords: String,
    color: Color32,
}

pub enum RuleDialogResult {
    Open,
    Cancelled,
    Save(Vec<ColorRule>),
}

impl RuleDialogState {
    pub fn from_rules(rules: &[ColorRule]) -> Self {
        let rows = rules
            .iter()
            .map(|rule| RuleRow {
                id: rule.id.clone(),
                name: rule.name.clone(),
                keywords: rule.keywords.join(", "),
                color: parse_hex(&rule.color)
                    .map(|(r, g, b)| Color32::from_rgb(r, g, b))
                    .unwrap_or(Color32::from_rgb(63, 81, 181)),
            })
            .collect();
        Self {
            rows,
            next_id: rules.len() + 1,
        }
    }

    fn add_row(&mut self) {
        self.rows.push(RuleRow {
            id: format!("rule-{}", self.next_id),
            name: String::new(),
            keywords: String::new(),
            color: Color32::from_rgb(63, 81, 181),
        });
        self.next_id += 1;
    }

    fn to_rules(&self) -> Vec<ColorRule> {
        self.rows
            .iter()
            .filter_map(|row| {
                let keywords: Vec<String> = row
                    .keywords
                    .split(',')
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                if keywords.is_empty() {
                    return None;
                }
                let name = if row.name.trim().is_empty() {
                    keywords[0].clone()
                } else {
                    row.name.trim().to_string()
                };
                Some(ColorRule::new(
                    row.id.clone(),
                    name,
                    keywords,
                    format!(
                        "#{:02X}{:02X}{:02X}",
                        row.color.r(),
                        row.color.g(),
                        row.color.b()
                    ),
                ))
            })
            .collect()
    }
}

pub fn render_rule_dialog(ctx: &egui::Context, state: &mut RuleDialogState) -> RuleDialogResult {
    let mut result = RuleDialogResult::Open;

    egui::Window::new("Color Rules")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label("Events whose title contains a keyword use the rule's color.");
            ui.label("The first matching rule wins.");
            ui.separator();

            let mut remove_index: Option<usize> = None;
            for (index, row) in state.rows.iter_mut().enumerate() {
                ui.horizontal(|ui| {
                    ui.color_edit_button_srgba(&mut row.color);
                    ui.add(
                        egui::TextEdit::singleline(&mut row.name)
                            .desired_width(80.0)
                            .hint_text("Name"),
                    );
                    ui.add(
                        egui::TextEdit::singleline(&mut row.keywords)
                            .desired_width(160.0)
                            .hint_text("keywords, comma, separated"),
                    );
                    if ui.button("🗑").clicked() {
                        remove_index = Some(index);
                    }
                });
            }
            if let Some(index) = remove_index {
                state.rows.remove(index);
            }

            if ui.button("➕ Add rule").clicked() {
                state.add_row();
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    result = RuleDialogResult::Save(state.to_rules());
                }
                if ui.button("Cancel").clicked() {
                    result = RuleDialogResult::Cancelled;
                }
            });
        });

    result
}
