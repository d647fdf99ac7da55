use chrono::Local;

use super::{TimepaneApp, ViewType};
use crate::ui_egui::event_dialog::EventDialogState;

impl TimepaneApp {
    pub(super) fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let dialog_open = self.event_dialog.is_some() || self.rule_dialog.is_some();

        let (escape, undo, new_event) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.modifiers.ctrl && i.key_pressed(egui::Key::Z),
                i.modifiers.ctrl && i.key_pressed(egui::Key::N),
            )
        });

        if escape {
            if dialog_open {
                self.event_dialog = None;
                self.rule_dialog = None;
            } else if self.reschedule.is_active() {
                self.reschedule.cancel();
            }
            return;
        }

        if undo {
            self.trigger_undo(ctx);
        }

        if new_event && !dialog_open {
            self.event_dialog = Some(EventDialogState::create(self.current_date, 9 * 60));
        }

        // Plain-key shortcuts only apply when no dialog is capturing
        // text input.
        if dialog_open || ctx.wants_keyboard_input() {
            return;
        }

        let (day_view, week_view, today, prev, next) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::D),
                i.key_pressed(egui::Key::W),
                i.key_pressed(egui::Key::T),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
            )
        });

        if day_view {
            self.current_view = ViewType::Day;
        }
        if week_view {
            self.current_view = ViewType::Week;
        }
        if today && self.current_date != Local::now().date_naive() {
            self.jump_to_today(ctx);
        }
        if prev {
            self.navigate_previous(ctx);
        }
        if next {
            self.navigate_next(ctx);
        }
    }
}
