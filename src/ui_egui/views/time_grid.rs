//! The 24-hour pixel grid for one day column.
//!
//! Events are absolutely positioned from their minute offsets and
//! packed side by side by the layout engine. This module is also the
//! pointer adapter: it translates egui pointer state into calls on the
//! two gesture FSMs and paints their previews.

use chrono::{Local, NaiveDate};
use egui::{Color32, CursorIcon, FontId, Pos2, Rect, Rounding, Sense, Shape, Stroke};

use crate::models::color_rule::ColorRule;
use crate::models::event::Event;
use crate::services::color;
use crate::services::gesture::{DragReschedule, DragSelection};
use crate::services::layout::{layout_day, visual_end_minutes};
use crate::utils::time::{
    minutes_from_pixels, offset_minutes, pixels_from_minutes, snap, CREATE_SNAP_MINUTES,
    MINUTES_PER_DAY,
};

use super::GridOutcome;

/// Vertical scale of the grid.
pub const HOUR_HEIGHT: f32 = 48.0;
/// Width reserved for the hour labels gutter.
pub const TIME_LABEL_WIDTH: f32 = 50.0;
/// Full height of a 24-hour column.
pub const GRID_HEIGHT: f32 = 24.0 * HOUR_HEIGHT;
/// Horizontal gap between day columns.
pub const COLUMN_SPACING: f32 = 1.0;

const DEFAULT_EVENT_COLOR: Color32 = Color32::from_rgb(100, 150, 200);
const SELECTION_GREEN: Color32 = Color32::from_rgb(120, 200, 120);

/// Static inputs for one column render.
pub struct ColumnContext<'a> {
    pub day: NaiveDate,
    /// `(ordinal, event)` pairs for events occurring on this day; the
    /// ordinal indexes the palette fallback and comes from the event's
    /// position in the fetched list.
    pub events: &'a [(usize, &'a Event)],
    pub rules: &'a [ColorRule],
    /// The provider's per-calendar color, when the host configured one.
    pub provider_color: Option<&'a str>,
    /// Visual floor for short events, minutes.
    pub min_event_minutes: i32,
}

/// Render one day column into `rect` and feed pointer activity into the
/// gesture controllers.
pub fn render_day_column(
    ui: &mut egui::Ui,
    rect: Rect,
    ctx: &ColumnContext<'_>,
    selection: &mut DragSelection,
    reschedule: &mut DragReschedule,
) -> GridOutcome {
    let mut outcome = GridOutcome::default();
    let column_id = ui.id().with(("day_column", ctx.day));
    let response = ui.interact(rect, column_id, Sense::click_and_drag());
    let painter = ui.painter_at(rect);

    let today = Local::now().date_naive() == ctx.day;
    paint_background(&painter, rect, ui.visuals().dark_mode, today);

    // Events, packed by the layout engine.
    let layouts = layout_day(ctx.day, ctx.events.iter().filter_map(|(_, e)| e.as_timed()));
    let mut hitboxes: Vec<(Rect, &Event)> = Vec::new();

    for (ordinal, event) in ctx.events {
        let Some(timed) = event.as_timed() else {
            continue;
        };
        let Some(placement) = layouts.get(event.id.as_str()) else {
            continue;
        };

        let start_min = offset_minutes(timed.start, ctx.day);
        let mut end_min = offset_minutes(timed.end, ctx.day);
        if end_min <= start_min {
            end_min = MINUTES_PER_DAY;
        }
        end_min = visual_end_minutes(start_min, end_min, ctx.min_event_minutes);

        let top = rect.top() + pixels_from_minutes(start_min, HOUR_HEIGHT);
        let bottom = rect.top() + pixels_from_minutes(end_min, HOUR_HEIGHT);
        let slot_width = (rect.width() - 2.0) / placement.total_columns as f32;
        let left = rect.left() + 1.0 + slot_width * placement.column as f32;
        let event_rect = Rect::from_min_max(
            Pos2::new(left + 1.0, top + 1.0),
            Pos2::new(left + slot_width - 1.0, bottom - 1.0),
        );

        let hex = color::display_color(
            &event.summary,
            event.description.as_deref(),
            *ordinal,
            ctx.rules,
            ctx.provider_color,
        );
        let base_color = color::parse_hex(&hex)
            .map(|(r, g, b)| Color32::from_rgb(r, g, b))
            .unwrap_or(DEFAULT_EVENT_COLOR);

        // The dragged original stays put at reduced opacity while the
        // dashed preview shows the prospective drop position.
        let being_dragged = reschedule.dragged_event_id() == Some(event.id.as_str());
        let fill = if being_dragged {
            base_color.gamma_multiply(0.35)
        } else {
            base_color
        };
        painter.rect_filled(event_rect, Rounding::same(3.0), fill);

        paint_event_label(ui, &painter, event_rect, event, being_dragged);
        hitboxes.push((event_rect, *event));
    }

    // Per-event click surfaces sit on top of the column's drag surface:
    // clicks and context menus land on events, drags on the column.
    for (event_rect, event) in &hitboxes {
        let event_response = ui
            .interact(
                *event_rect,
                column_id.with(("event", &event.id)),
                Sense::click(),
            )
            .on_hover_text(hover_text(event));
        if event_response.double_clicked() {
            outcome.edit_event = Some((*event).clone());
        }
        event_response.context_menu(|ui| {
            ui.set_min_width(140.0);
            if ui.button("✏ Edit").clicked() {
                outcome.edit_event = Some((*event).clone());
                ui.close_menu();
            }
            if ui.button("🗑 Delete").clicked() {
                outcome.delete_event = Some((*event).clone());
                ui.close_menu();
            }
        });
    }

    // Pointer → gesture FSMs.
    let pointer_pos = response
        .interact_pointer_pos()
        .or_else(|| ui.input(|i| i.pointer.hover_pos()));
    let minutes_at = |pos: Pos2| minutes_from_pixels(pos.y - rect.top(), HOUR_HEIGHT);

    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            match hitboxes.iter().rev().find(|(r, _)| r.contains(pos)) {
                Some((_, event)) => {
                    reschedule.begin(event);
                }
                None => selection.press(ctx.day, minutes_at(pos)),
            }
        }
    }

    if reschedule.is_active() {
        if let Some(pos) = pointer_pos {
            if rect.contains(pos) {
                reschedule.drag_over(ctx.day, minutes_at(pos));
                ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
                ui.ctx().request_repaint();
            }
        }
    }

    if selection.is_active() && selection.day() == Some(ctx.day) {
        if let Some(pos) = pointer_pos {
            selection.drag_to(minutes_at(pos));
            ui.ctx().request_repaint();
        }
    }

    let released = ui.input(|i| i.pointer.primary_released());
    if released {
        if reschedule.is_active() {
            if let Some(pos) = pointer_pos {
                if rect.contains(pos) {
                    outcome.move_request = reschedule.drop();
                }
            }
        }
        if selection.is_active() && selection.day() == Some(ctx.day) {
            outcome.create = selection.release();
        }
    }

    // Double-click on empty space proposes a new event at that slot.
    if response.double_clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if !hitboxes.iter().any(|(r, _)| r.contains(pos)) {
                outcome.open_create_dialog =
                    Some((ctx.day, snap(minutes_at(pos), CREATE_SNAP_MINUTES)));
            }
        }
    }

    paint_selection_preview(&painter, rect, ctx.day, selection);
    paint_reschedule_preview(&painter, rect, ctx.day, reschedule);

    if today {
        paint_now_line(&painter, rect);
    }

    outcome
}

fn paint_background(painter: &egui::Painter, rect: Rect, dark_mode: bool, today: bool) {
    let (base, today_tint, hour_line, half_line) = if dark_mode {
        (
            Color32::from_gray(27),
            Color32::from_rgb(32, 38, 48),
            Color32::from_gray(50),
            Color32::from_gray(38),
        )
    } else {
        (
            Color32::from_gray(250),
            Color32::from_rgb(238, 244, 252),
            Color32::from_gray(210),
            Color32::from_gray(232),
        )
    };

    painter.rect_filled(rect, 0.0, if today { today_tint } else { base });

    for hour in 0..24 {
        let y = rect.top() + pixels_from_minutes(hour * 60, HOUR_HEIGHT);
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, hour_line),
        );
        let half_y = y + HOUR_HEIGHT / 2.0;
        painter.line_segment(
            [
                Pos2::new(rect.left(), half_y),
                Pos2::new(rect.right(), half_y),
            ],
            Stroke::new(1.0, half_line),
        );
    }

    painter.line_segment(
        [
            Pos2::new(rect.right(), rect.top()),
            Pos2::new(rect.right(), rect.bottom()),
        ],
        Stroke::new(1.0, hour_line),
    );
}

fn paint_event_label(
    ui: &egui::Ui,
    painter: &egui::Painter,
    event_rect: Rect,
    event: &Event,
    dimmed: bool,
) {
    let text_color = if dimmed {
        Color32::from_rgba_unmultiplied(255, 255, 255, 140)
    } else {
        Color32::WHITE
    };
    let available_width = (event_rect.width() - 8.0).max(8.0);
    let layout_job = egui::text::LayoutJob::simple(
        event.summary.clone(),
        FontId::proportional(11.0),
        text_color,
        available_width,
    );
    let galley = ui.fonts(|f| f.layout_job(layout_job));
    painter.galley(
        Pos2::new(event_rect.left() + 4.0, event_rect.top() + 3.0),
        galley,
        text_color,
    );

    if let Some(timed) = event.as_timed() {
        if event_rect.height() > 30.0 {
            painter.text(
                Pos2::new(event_rect.left() + 4.0, event_rect.bottom() - 13.0),
                egui::Align2::LEFT_TOP,
                format!(
                    "{} - {}",
                    timed.start.format("%H:%M"),
                    timed.end.format("%H:%M")
                ),
                FontId::proportional(9.0),
                text_color.gamma_multiply(0.85),
            );
        }
    }
}

fn span_rect(rect: Rect, start_minutes: i32, end_minutes: i32) -> Rect {
    Rect::from_min_max(
        Pos2::new(
            rect.left() + 1.0,
            rect.top() + pixels_from_minutes(start_minutes, HOUR_HEIGHT),
        ),
        Pos2::new(
            rect.right() - 1.0,
            rect.top() + pixels_from_minutes(end_minutes.min(MINUTES_PER_DAY), HOUR_HEIGHT),
        ),
    )
}

fn paint_selection_preview(
    painter: &egui::Painter,
    rect: Rect,
    day: NaiveDate,
    selection: &DragSelection,
) {
    let Some((preview_day, start, end)) = selection.preview() else {
        return;
    };
    if preview_day != day || end <= start {
        return;
    }

    let preview = span_rect(rect, start, end);
    painter.rect_filled(
        preview,
        Rounding::same(2.0),
        Color32::from_rgba_unmultiplied(120, 200, 120, 35),
    );
    painter.rect_stroke(preview, Rounding::same(2.0), Stroke::new(1.5, SELECTION_GREEN));
}

fn paint_reschedule_preview(
    painter: &egui::Painter,
    rect: Rect,
    day: NaiveDate,
    reschedule: &DragReschedule,
) {
    let Some((preview_day, start, end)) = reschedule.preview() else {
        return;
    };
    if preview_day != day {
        return;
    }

    let preview = span_rect(rect, start, end.min(MINUTES_PER_DAY));
    painter.rect_filled(
        preview,
        Rounding::same(2.0),
        Color32::from_rgba_unmultiplied(160, 160, 220, 30),
    );

    // Dashed outline marks this as a prospective position, not a block.
    let stroke = Stroke::new(1.5, Color32::from_rgb(150, 150, 230));
    let corners = [
        preview.left_top(),
        preview.right_top(),
        preview.right_bottom(),
        preview.left_bottom(),
        preview.left_top(),
    ];
    for edge in corners.windows(2) {
        for shape in Shape::dashed_line(&[edge[0], edge[1]], stroke, 5.0, 4.0) {
            painter.add(shape);
        }
    }
}

fn paint_now_line(painter: &egui::Painter, rect: Rect) {
    let now = Local::now();
    let minutes = offset_minutes(now, now.date_naive());
    let y = rect.top() + pixels_from_minutes(minutes, HOUR_HEIGHT);
    let line_color = Color32::from_rgb(255, 100, 100);

    painter.circle_filled(Pos2::new(rect.left() + 3.0, y), 3.0, line_color);
    painter.line_segment(
        [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
        Stroke::new(2.0, line_color),
    );
}

/// Hour labels for the gutter to the left of the first column.
pub fn paint_hour_labels(ui: &egui::Ui, gutter: Rect) {
    let painter = ui.painter_at(gutter);
    for hour in 1..24 {
        let y = gutter.top() + pixels_from_minutes(hour * 60, HOUR_HEIGHT);
        painter.text(
            Pos2::new(gutter.right() - 5.0, y),
            egui::Align2::RIGHT_CENTER,
            format!("{hour:02}:00"),
            FontId::proportional(11.0),
            Color32::GRAY,
        );
    }
}

/// End-of-frame cleanup shared by the views: resolve gestures the
/// columns could not, so nothing ever gets stuck.
pub fn finish_gestures(
    ui: &egui::Ui,
    selection: &mut DragSelection,
    reschedule: &mut DragReschedule,
    outcome: &mut GridOutcome,
) {
    let released = ui.input(|i| i.pointer.primary_released());
    let pointer_gone = ui.input(|i| i.pointer.hover_pos().is_none());

    // Release outside every column: the reschedule has no valid target
    // and is discarded; the selection resolves with its last live edge.
    if released {
        if reschedule.is_active() {
            reschedule.cancel();
        }
        if selection.is_active() && outcome.create.is_none() {
            outcome.create = selection.release();
        }
    }

    // Pointer left the window entirely mid-gesture.
    if pointer_gone {
        if selection.is_active() && outcome.create.is_none() {
            outcome.create = selection.pointer_left();
        }
        if reschedule.is_active() {
            reschedule.cancel();
        }
    }
}

fn hover_text(event: &Event) -> String {
    let mut lines = vec![event.summary.clone()];
    if let Some(timed) = event.as_timed() {
        lines.push(format!(
            "{} - {} ({})",
            timed.start.format("%H:%M"),
            timed.end.format("%H:%M"),
            timed.start.format("%A, %B %d")
        ));
    }
    if let Some(description) = &event.description {
        if !description.is_empty() {
            lines.push(description.clone());
        }
    }
    lines.join("\n")
}
