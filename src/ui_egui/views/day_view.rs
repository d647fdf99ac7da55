//! Single-day view. Same grid as the week view, one wide column and a
//! taller visual floor for short events.

use chrono::NaiveDate;
use egui::{Pos2, Rect, Sense, Vec2};

use crate::models::color_rule::ColorRule;
use crate::models::event::Event;
use crate::services::gesture::{DragReschedule, DragSelection};
use crate::services::layout::DAY_MIN_EVENT_MINUTES;

use super::ribbon::render_ribbon;
use super::time_grid::{
    finish_gestures, paint_hour_labels, render_day_column, ColumnContext, COLUMN_SPACING,
    GRID_HEIGHT, TIME_LABEL_WIDTH,
};
use super::GridOutcome;

#[allow(clippy::too_many_arguments)]
pub fn render(
    ui: &mut egui::Ui,
    date: NaiveDate,
    events: &[Event],
    rules: &[ColorRule],
    provider_color: Option<&str>,
    selection: &mut DragSelection,
    reschedule: &mut DragReschedule,
) -> GridOutcome {
    let mut outcome = GridOutcome::default();
    let total_width = ui.available_width();
    let col_width = (total_width - TIME_LABEL_WIDTH - COLUMN_SPACING).max(60.0);

    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(date.format("%A, %B %d, %Y").to_string()).strong());
    });

    let all_day: Vec<(usize, &Event)> = events
        .iter()
        .enumerate()
        .filter(|(_, event)| event.is_all_day() && event.occurs_on(date))
        .collect();
    outcome.merge(render_ribbon(
        ui,
        &[date],
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

            let rect = Rect::from_min_size(
                Pos2::new(grid_rect.left() + TIME_LABEL_WIDTH + COLUMN_SPACING, grid_rect.top()),
                Vec2::new(col_width, GRID_HEIGHT),
            );

            let day_events: Vec<(usize, &Event)> = events
                .iter()
                .enumerate()
                .filter(|(_, event)| !event.is_all_day() && event.occurs_on(date))
                .collect();

            let ctx = ColumnContext {
                day: date,
                events: &day_events,
                rules,
                provider_color,
                min_event_minutes: DAY_MIN_EVENT_MINUTES,
            };
            outcome.merge(render_day_column(ui, rect, &ctx, selection, reschedule));

            finish_gestures(ui, selection, reschedule, &mut outcome);
        });

    outcome
}
