//! Seven-day week view.

use chrono::{Datelike, Local, NaiveDate};
use egui::{Pos2, Rect, Sense, Vec2};

use crate::models::color_rule::ColorRule;
use crate::models::event::Event;
use crate::services::gesture::{DragReschedule, DragSelection};
use crate::services::layout::WEEK_MIN_EVENT_MINUTES;

use super::ribbon::render_ribbon;
use super::time_grid::{
    finish_gestures, paint_hour_labels, render_day_column, ColumnContext, COLUMN_SPACING,
    GRID_HEIGHT, TIME_LABEL_WIDTH,
};
use super::{week_days, GridOutcome};

#[allow(clippy::too_many_arguments)]
pub fn render(
    ui: &mut egui::Ui,
    anchor_date: NaiveDate,
    events: &[Event],
    rules: &[ColorRule],
    provider_color: Option<&str>,
    selection: &mut DragSelection,
    reschedule: &mut DragReschedule,
) -> GridOutcome {
    let days = week_days(anchor_date);
    let mut outcome = GridOutcome::default();

    let total_width = ui.available_width();
    let col_width =
        ((total_width - TIME_LABEL_WIDTH) / days.len() as f32 - COLUMN_SPACING).max(40.0);

    render_header(ui, &days, col_width);

    let all_day: Vec<(usize, &Event)> = events
        .iter()
        .enumerate()
        .filter(|(_, event)| event.is_all_day())
        .collect();
    outcome.merge(render_ribbon(
        ui,
        &days,
        col_width,
        &all_day,
        rules,
        provider_color,
    ));

    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (grid_rect, _) =
                ui.allocate_exact_size(Vec2::new(total_width, GRID_HEIGHT), Sense::hover());

            paint_hour_labels(
                ui,
                Rect::from_min_size(grid_rect.min, Vec2::new(TIME_LABEL_WIDTH, GRID_HEIGHT)),
            );

            for (index, day) in days.iter().enumerate() {
                let left = grid_rect.left()
                    + TIME_LABEL_WIDTH
                    + COLUMN_SPACING
                    + index as f32 * (col_width + COLUMN_SPACING);
                let rect = Rect::from_min_size(
                    Pos2::new(left, grid_rect.top()),
                    Vec2::new(col_width, GRID_HEIGHT),
                );

                let day_events: Vec<(usize, &Event)> = events
                    .iter()
                    .enumerate()
                    .filter(|(_, event)| !event.is_all_day() && event.occurs_on(*day))
                    .collect();

                let ctx = ColumnContext {
                    day: *day,
                    events: &day_events,
                    rules,
                    provider_color,
                    min_event_minutes: WEEK_MIN_EVENT_MINUTES,
                };
                outcome.merge(render_day_column(ui, rect, &ctx, selection, reschedule));
            }

            finish_gestures(ui, selection, reschedule, &mut outcome);
        });

    outcome
}

fn render_header(ui: &mut egui::Ui, days: &[NaiveDate], col_width: f32) {
    let today = Local::now().date_naive();
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = COLUMN_SPACING;
        ui.add_space(TIME_LABEL_WIDTH + COLUMN_SPACING);

        for day in days {
            ui.allocate_ui(Vec2::new(col_width, 20.0), |ui| {
                ui.set_width(col_width);
                let label = format!("{} {}", day.format("%a"), day.day());
                let text = if *day == today {
                    egui::RichText::new(label).strong().underline()
                } else {
                    egui::RichText::new(label)
                };
                ui.vertical_centered(|ui| ui.label(text));
            });
        }
    });
}
