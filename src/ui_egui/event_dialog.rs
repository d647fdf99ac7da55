//! Create/edit event dialog.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone};
use egui_extras::DatePickerButton;

use crate::models::event::{Event, EventTime};
use crate::models::operation::{EventOperation, EventPatch};

pub struct EventDialogState {
    /// `Some` when editing an existing event.
    original: Option<Event>,
    summary: String,
    description: String,
    all_day: bool,
    date: NaiveDate,
    end_date: NaiveDate,
    start_text: String,
    end_text: String,
    error: Option<String>,
}

pub enum EventDialogResult {
    Open,
    Cancelled,
    Submit(EventOperation),
}

impl EventDialogState {
    /// Fresh event at `start_minutes` on `day`, one hour long.
    pub fn create(day: NaiveDate, start_minutes: i32) -> Self {
        let start = start_minutes.clamp(0, 23 * 60);
        let end = (start + 60).min(24 * 60 - 15);
        Self {
            original: None,
            summary: String::new(),
            description: String::new(),
            all_day: false,
            date: day,
            end_date: day + Duration::days(1),
            start_text: minutes_text(start),
            end_text: minutes_text(end),
            error: None,
        }
    }

    pub fn edit(event: Event) -> Self {
        let (all_day, date, end_date, start_text, end_text) = match event.time {
            EventTime::Timed { start, end } => (
                false,
                start.date_naive(),
                start.date_naive() + Duration::days(1),
                start.format("%H:%M").to_string(),
                end.format("%H:%M").to_string(),
            ),
            EventTime::AllDay { start, end } => {
                (true, start, end, "09:00".to_string(), "10:00".to_string())
            }
        };
        Self {
            summary: event.summary.clone(),
            description: event.description.clone().unwrap_or_default(),
            original: Some(event),
            all_day,
            date,
            end_date,
            start_text,
            end_text,
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.original.is_some()
    }

    fn build_time(&self) -> Result<EventTime, String> {
        if self.all_day {
            if self.end_date <= self.date {
                return Err("End date must be after the start date".to_string());
            }
            return Ok(EventTime::AllDay {
                start: self.date,
                end: self.end_date,
            });
        }

        let start = parse_local(self.date, &self.start_text)?;
        let end = parse_local(self.date, &self.end_text)?;
        if end <= start {
            return Err("End time must be after the start time".to_string());
        }
        Ok(EventTime::Timed { start, end })
    }

    fn submit(&mut self) -> Option<EventOperation> {
        self.error = None;
        let summary = self.summary.trim().to_string();
        if summary.is_empty() {
            self.error = Some("A title is required".to_string());
            return None;
        }

        let time = match self.build_time() {
            Ok(time) => time,
            Err(message) => {
                self.error = Some(message);
                return None;
            }
        };

        match &self.original {
            None => Some(EventOperation::Create {
                summary,
                time,
                description: {
                    let text = self.description.trim();
                    (!text.is_empty()).then(|| text.to_string())
                },
            }),
            Some(original) => {
                let mut patch = EventPatch::default();
                if summary != original.summary {
                    patch.summary = Some(summary);
                }
                let description = self.description.trim().to_string();
                if description != original.description.clone().unwrap_or_default() {
                    patch.description = Some(description);
                }
                if time != original.time {
                    patch.time = Some(time);
                }
                if patch.is_empty() {
                    return None;
                }
                Some(EventOperation::Edit {
                    id: original.id.clone(),
                    calendar_id: original.calendar_id.clone(),
                    patch,
                })
            }
        }
    }
}

pub fn render_event_dialog(
    ctx: &egui::Context,
    state: &mut EventDialogState,
) -> EventDialogResult {
    let mut result = EventDialogResult::Open;
    let title = if state.is_edit() {
        "Edit Event"
    } else {
        "New Event"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Title");
                ui.text_edit_singleline(&mut state.summary);
            });

            ui.horizontal(|ui| {
                ui.label("Date");
                ui.add(DatePickerButton::new(&mut state.date).id_source("event_start_date"));
                ui.checkbox(&mut state.all_day, "All day");
            });

            if state.all_day {
                ui.horizontal(|ui| {
                    ui.label("Until");
                    ui.add(DatePickerButton::new(&mut state.end_date).id_source("event_end_date"));
                });
            } else {
                ui.horizontal(|ui| {
                    ui.label("From");
                    ui.add(
                        egui::TextEdit::singleline(&mut state.start_text).desired_width(50.0),
                    );
                    ui.label("to");
                    ui.add(egui::TextEdit::singleline(&mut state.end_text).desired_width(50.0));
                });
            }

            ui.label("Notes");
            ui.add(
                egui::TextEdit::multiline(&mut state.description)
                    .desired_rows(3)
                    .desired_width(280.0)
                    .hint_text("Optional; a [type: exam] tag sets the color"),
            );

            if let Some(error) = &state.error {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), error);
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    match state.submit() {
                        Some(op) => result = EventDialogResult::Submit(op),
                        None if state.error.is_none() => {
                            // Edit with no changes: nothing to send.
                            result = EventDialogResult::Cancelled;
                        }
                        None => {}
                    }
                }
                if ui.button("Cancel").clicked() {
                    result = EventDialogResult::Cancelled;
                }
            });
        });

    result
}

fn minutes_text(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn parse_local(date: NaiveDate, text: &str) -> Result<DateTime<Local>, String> {
    let time = NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .map_err(|_| format!("\"{}\" is not a valid HH:MM time", text.trim()))?;
    Local
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| "That local time does not exist".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn create_prefills_a_one_hour_window() {
        let state = EventDialogState::create(day(), 600);
        assert_eq!(state.start_text, "10:00");
        assert_eq!(state.end_text, "11:00");
        assert!(!state.is_edit());
    }

    #[test]
    fn submit_requires_title() {
        let mut state = EventDialogState::create(day(), 600);
        assert!(state.submit().is_none());
        assert!(state.error.is_some());
    }

    #[test]
    fn submit_builds_create_operation() {
        let mut state = EventDialogState::create(day(), 600);
        state.summary = "Study group".to_string();
        state.description = "[type: homework] chapter 3".to_string();

        match state.submit() {
            Some(EventOperation::Create {
                summary,
                time,
                description,
            }) => {
                assert_eq!(summary, "Study group");
                assert!(matches!(time, EventTime::Timed { .. }));
                assert_eq!(description.as_deref(), Some("[type: homework] chapter 3"));
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn submit_rejects_inverted_times() {
        let mut state = EventDialogState::create(day(), 600);
        state.summary = "Broken".to_string();
        state.end_text = "09:00".to_string();

        assert!(state.submit().is_none());
        assert!(state.error.as_deref().unwrap_or("").contains("after"));
    }

    #[test]
    fn edit_diffs_only_changed_fields() {
        let event = Event::timed(
            "e1",
            "Old title",
            Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(),
            Local.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap(),
        )
        .unwrap();
        let mut state = EventDialogState::edit(event);
        state.summary = "New title".to_string();

        match state.submit() {
            Some(EventOperation::Edit { patch, .. }) => {
                assert_eq!(patch.summary.as_deref(), Some("New title"));
                assert!(patch.description.is_none());
                assert!(patch.time.is_none());
            }
            other => panic!("expected edit, got {other:?}"),
        }
    }

    #[test]
    fn unchanged_edit_submits_nothing() {
        let event = Event::timed(
            "e1",
            "Same",
            Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(),
            Local.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap(),
        )
        .unwrap();
        let mut state = EventDialogState::edit(event);
        assert!(state.submit().is_none());
        assert!(state.error.is_none());
    }

    #[test]
    fn malformed_time_is_reported() {
        let mut state = EventDialogState::create(day(), 600);
        state.summary = "Typo".to_string();
        state.start_text = "9 o'clock".to_string();

        assert!(state.submit().is_none());
        assert!(state.error.as_deref().unwrap_or("").contains("HH:MM"));
    }
}
