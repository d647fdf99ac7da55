//! All-day ribbon row.
//!
//! Whole-day events never enter the column layout engine; they render
//! as full-width chips above the time grid instead.

use chrono::NaiveDate;
use egui::{Color32, Vec2};

use crate::models::color_rule::ColorRule;
use crate::models::event::Event;
use crate::services::color;

use super::time_grid::{COLUMN_SPACING, TIME_LABEL_WIDTH};
use super::GridOutcome;

pub fn render_ribbon(
    ui: &mut egui::Ui,
    days: &[NaiveDate],
    col_width: f32,
    all_day_events: &[(usize, &Event)],
    rules: &[ColorRule],
    provider_color: Option<&str>,
) -> GridOutcome {
    let mut outcome = GridOutcome::default();
    if all_day_events.is_empty() {
        return outcome;
    }

    ui.horizontal_top(|ui| {
        ui.spacing_mut().item_spacing.x = COLUMN_SPACING;
        ui.add_space(TIME_LABEL_WIDTH + COLUMN_SPACING);

        for day in days {
            let chips = all_day_events
                .iter()
                .filter(|(_, event)| event.occurs_on(*day))
                .count();
            ui.allocate_ui(Vec2::new(col_width, 18.0 * chips.max(1) as f32), |ui| {
                ui.set_width(col_width);
                ui.vertical(|ui| {
                    for (ordinal, event) in all_day_events {
                        if !event.occurs_on(*day) {
                            continue;
                        }
                        render_chip(ui, *ordinal, event, rules, provider_color, &mut outcome);
                    }
                });
            });
        }
    });
    ui.add_space(2.0);

    outcome
}

fn render_chip(
    ui: &mut egui::Ui,
    ordinal: usize,
    event: &Event,
    rules: &[ColorRule],
    provider_color: Option<&str>,
    outcome: &mut GridOutcome,
) {
    let hex = color::display_color(
        &event.summary,
        event.description.as_deref(),
        ordinal,
        rules,
        provider_color,
    );
    let fill = color::parse_hex(&hex)
        .map(|(r, g, b)| Color32::from_rgb(r, g, b))
        .unwrap_or(Color32::from_rgb(100, 150, 200));

    let response = egui::Frame::none()
        .fill(fill)
        .rounding(egui::Rounding::same(4.0))
        .inner_margin(egui::Margin::symmetric(6.0, 1.0))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(&event.summary)
                    .color(Color32::WHITE)
                    .size(11.0),
            );
        })
        .response;

    let response = response.interact(egui::Sense::click());
    if response.double_clicked() {
        outcome.edit_event = Some(event.clone());
    }
    response.context_menu(|ui| {
        ui.set_min_width(140.0);
        if ui.button("✏ Edit").clicked() {
            outcome.edit_event = Some(event.clone());
            ui.close_menu();
        }
        if ui.button("🗑 Delete").clicked() {
            outcome.delete_event = Some(event.clone());
            ui.close_menu();
        }
    });
}
