//! Application shell: owns the fetched event list, the gesture
//! controllers, the undo stack and the dialog state, and wires worker
//! results back into the frame loop.

mod shortcuts;
mod status_bar;
mod toast;
mod worker;

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};

use crate::models::color_rule::ColorRule;
use crate::models::event::{Event, EventTime};
use crate::models::operation::EventOperation;
use crate::services::command::CommandParser;
use crate::services::gesture::{DragReschedule, DragSelection, MoveRequest};
use crate::services::mutation;
use crate::services::prefs::{load_color_rules, save_color_rules, PreferenceStore};
use crate::services::store::SharedStore;
use crate::services::undo::{self, UndoEntry, UndoStack};
use crate::ui_egui::event_dialog::{render_event_dialog, EventDialogResult, EventDialogState};
use crate::ui_egui::rule_dialog::{render_rule_dialog, RuleDialogResult, RuleDialogState};
use crate::ui_egui::views::{self, week_start, GridOutcome};
use crate::utils::time::day_time;

use self::toast::ToastManager;
use self::worker::WorkerEvent;

/// Preference key for the provider's per-calendar color, cached by
/// whatever host layer performed calendar setup.
const CALENDAR_COLOR_KEY: &str = "calendar_color";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    Day,
    Week,
}

pub struct TimepaneApp {
    store: SharedStore,
    parser: Arc<dyn CommandParser>,
    prefs: Box<dyn PreferenceStore>,

    /// Last fetched event list; recomputed from the store on refresh,
    /// never mutated locally (the UI is optimistic, reconciliation is
    /// re-fetch).
    events: Vec<Event>,
    color_rules: Vec<ColorRule>,
    calendar_color: Option<String>,
    undo: UndoStack,

    selection: DragSelection,
    reschedule: DragReschedule,

    current_view: ViewType,
    current_date: NaiveDate,
    command_text: String,
    command_running: bool,
    loading: bool,

    event_dialog: Option<EventDialogState>,
    rule_dialog: Option<RuleDialogState>,

    toasts: ToastManager,
    worker_tx: Sender<WorkerEvent>,
    worker_rx: Receiver<WorkerEvent>,
}

impl eframe::App for TimepaneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_worker(ctx);
        self.handle_keyboard_shortcuts(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            self.render_top_bar(ui);
        });
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.render_status_bar(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            let outcome = match self.current_view {
                ViewType::Day => views::day_view::render(
                    ui,
                    self.current_date,
                    &self.events,
                    &self.color_rules,
                    self.calendar_color.as_deref(),
                    &mut self.selection,
                    &mut self.reschedule,
                ),
                ViewType::Week => views::week_view::render(
                    ui,
                    self.current_date,
                    &self.events,
                    &self.color_rules,
                    self.calendar_color.as_deref(),
                    &mut self.selection,
                    &mut self.reschedule,
                ),
            };
            self.handle_grid_outcome(ui.ctx(), outcome);
        });

        self.render_dialogs(ctx);
        self.toasts.render(ctx);
    }
}

impl TimepaneApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        store: SharedStore,
        parser: Arc<dyn CommandParser>,
        prefs: Box<dyn PreferenceStore>,
    ) -> Self {
        let (worker_tx, worker_rx) = mpsc::channel();
        let color_rules = load_color_rules(prefs.as_ref());
        let calendar_color = prefs.get(CALENDAR_COLOR_KEY);

        let mut app = Self {
            store,
            parser,
            prefs,
            events: Vec::new(),
            color_rules,
            calendar_color,
            undo: UndoStack::new(),
            selection: DragSelection::new(),
            reschedule: DragReschedule::new(),
            current_view: ViewType::Week,
            current_date: Local::now().date_naive(),
            command_text: String::new(),
            command_running: false,
            loading: false,
            event_dialog: None,
            rule_dialog: None,
            toasts: ToastManager::new(),
            worker_tx,
            worker_rx,
        };
        app.refresh(&cc.egui_ctx);
        app
    }

    // ── Remote plumbing ────────────────────────────────────────────

    fn refresh(&mut self, ctx: &egui::Context) {
        self.loading = true;
        let start_day = week_start(self.current_date) - Duration::days(7);
        let end_day = start_day + Duration::days(28);
        let range_start = day_time(start_day, 0).unwrap_or_else(Local::now);
        let range_end = day_time(end_day, 0).unwrap_or_else(Local::now);
        worker::spawn_list(
            self.store.clone(),
            self.worker_tx.clone(),
            range_start,
            range_end,
            ctx.clone(),
        );
    }

    fn drain_worker(&mut self, ctx: &egui::Context) {
        let mut needs_refresh = false;
        while let Ok(event) = self.worker_rx.try_recv() {
            match event {
                WorkerEvent::EventsLoaded(Ok(events)) => {
                    self.events = events;
                    self.loading = false;
                }
                WorkerEvent::EventsLoaded(Err(message)) => {
                    self.loading = false;
                    self.toasts.error(format!("Could not load events: {message}"));
                }
                WorkerEvent::MutationFinished(Ok(applied)) => {
                    if let Some(created) = &applied.created {
                        self.undo.push(UndoEntry::Create {
                            id: created.id.clone(),
                            calendar_id: created.calendar_id.clone(),
                        });
                    }
                    self.toasts.success(applied.message);
                    needs_refresh = true;
                }
                WorkerEvent::MutationFinished(Err(message)) => {
                    // Optimistic state is not rolled back; the next
                    // refresh reflects the true remote state.
                    self.toasts.error(message);
                    needs_refresh = true;
                }
                WorkerEvent::UndoFinished { ok, description } => {
                    if ok {
                        self.toasts.success(format!("Undid {description}"));
                    } else {
                        self.toasts.error(format!("Could not undo {description}"));
                    }
                    needs_refresh = true;
                }
                WorkerEvent::CommandParsed(result) => {
                    self.command_running = false;
                    match result {
                        Ok(ops) if ops.is_empty() => {
                            self.toasts.info("No calendar changes recognized");
                        }
                        Ok(ops) => {
                            self.command_text.clear();
                            for op in ops {
                                self.submit_operation(ctx, op);
                            }
                        }
                        Err(message) => self.toasts.error(message),
                    }
                }
            }
        }

        if needs_refresh {
            self.refresh(ctx);
        }
    }

    /// Push the undo entry (pre-call, as the history contract requires)
    /// and hand the remote call to a worker.
    fn submit_operation(&mut self, ctx: &egui::Context, op: EventOperation) {
        if let Some(entry) = mutation::undo_entry_for(&op, &self.events) {
            self.undo.push(entry);
        }
        worker::spawn_execute(self.store.clone(), self.worker_tx.clone(), op, ctx.clone());
    }

    /// A reschedule drop: the undo entry captures the window the
    /// gesture recorded at drag start, not whatever the list holds now.
    fn submit_move(&mut self, ctx: &egui::Context, request: MoveRequest) {
        self.undo.push(undo::move_entry(
            request.event_id.clone(),
            request.calendar_id.clone(),
            request.original_start,
            request.original_end,
        ));
        let op = EventOperation::Move {
            id: request.event_id,
            calendar_id: request.calendar_id,
            new_start: request.new_start,
            new_end: request.new_end,
        };
        worker::spawn_execute(self.store.clone(), self.worker_tx.clone(), op, ctx.clone());
    }

    fn trigger_undo(&mut self, ctx: &egui::Context) {
        match self.undo.pop() {
            Some(entry) => {
                worker::spawn_revert(self.store.clone(), self.worker_tx.clone(), entry, ctx.clone());
            }
            None => self.toasts.info("Nothing to undo"),
        }
    }

    fn run_command(&mut self, ctx: &egui::Context) {
        let text = self.command_text.trim().to_string();
        if text.is_empty() || self.command_running {
            return;
        }
        self.command_running = true;
        worker::spawn_parse(self.parser.clone(), self.worker_tx.clone(), text, ctx.clone());
    }

    // ── Grid outcomes ──────────────────────────────────────────────

    fn handle_grid_outcome(&mut self, ctx: &egui::Context, outcome: GridOutcome) {
        if let Some(selection) = outcome.create {
            if let Some((start, end)) = selection.resolve() {
                self.submit_operation(
                    ctx,
                    EventOperation::Create {
                        summary: "New event".to_string(),
                        time: EventTime::Timed { start, end },
                        description: None,
                    },
                );
            }
        }
        if let Some(request) = outcome.move_request {
            self.submit_move(ctx, request);
        }
        if let Some(event) = outcome.edit_event {
            self.event_dialog = Some(EventDialogState::edit(event));
        }
        if let Some(event) = outcome.delete_event {
            self.submit_operation(
                ctx,
                EventOperation::Delete {
                    id: event.id,
                    calendar_id: event.calendar_id,
                },
            );
        }
        if let Some((day, minutes)) = outcome.open_create_dialog {
            self.event_dialog = Some(EventDialogState::create(day, minutes));
        }
    }

    // ── Navigation ─────────────────────────────────────────────────

    fn navigate_previous(&mut self, ctx: &egui::Context) {
        self.current_date -= match self.current_view {
            ViewType::Day => Duration::days(1),
            ViewType::Week => Duration::weeks(1),
        };
        self.refresh(ctx);
    }

    fn navigate_next(&mut self, ctx: &egui::Context) {
        self.current_date += match self.current_view {
            ViewType::Day => Duration::days(1),
            ViewType::Week => Duration::weeks(1),
        };
        self.refresh(ctx);
    }

    fn jump_to_today(&mut self, ctx: &egui::Context) {
        self.current_date = Local::now().date_naive();
        self.refresh(ctx);
    }

    fn range_label(&self) -> String {
        match self.current_view {
            ViewType::Day => self.current_date.format("%B %d, %Y").to_string(),
            ViewType::Week => {
                let start = week_start(self.current_date);
                let end = start + Duration::days(6);
                if start.format("%m").to_string() == end.format("%m").to_string() {
                    format!("{} – {}", start.format("%B %d"), end.format("%d, %Y"))
                } else {
                    format!("{} – {}", start.format("%B %d"), end.format("%B %d, %Y"))
                }
            }
        }
    }

    // ── Chrome ─────────────────────────────────────────────────────

    fn render_top_bar(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        ui.horizontal(|ui| {
            if ui.button("◀").clicked() {
                self.navigate_previous(&ctx);
            }
            if ui.button("Today").clicked() {
                self.jump_to_today(&ctx);
            }
            if ui.button("▶").clicked() {
                self.navigate_next(&ctx);
            }

            ui.label(egui::RichText::new(self.range_label()).strong());

            ui.separator();
            ui.selectable_value(&mut self.current_view, ViewType::Day, "Day");
            ui.selectable_value(&mut self.current_view, ViewType::Week, "Week");
            ui.separator();

            let undo_button =
                ui.add_enabled(self.undo.has_entries(), egui::Button::new("↩ Undo"));
            if undo_button.clicked() {
                self.trigger_undo(&ctx);
            }
            if ui.button("🎨 Rules").clicked() {
                self.rule_dialog = Some(RuleDialogState::from_rules(&self.color_rules));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.command_running {
                    ui.spinner();
                } else if ui.button("Run").clicked() {
                    self.run_command(&ctx);
                }
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.command_text)
                        .desired_width(260.0)
                        .hint_text("Tell the calendar what to do…"),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    self.run_command(&ctx);
                }
            });
        });
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(mut state) = self.event_dialog.take() {
            match render_event_dialog(ctx, &mut state) {
                EventDialogResult::Open => self.event_dialog = Some(state),
                EventDialogResult::Cancelled => {}
                EventDialogResult::Submit(op) => self.submit_operation(ctx, op),
            }
        }

        if let Some(mut state) = self.rule_dialog.take() {
            match render_rule_dialog(ctx, &mut state) {
                RuleDialogResult::Open => self.rule_dialog = Some(state),
                RuleDialogResult::Cancelled => {}
                RuleDialogResult::Save(rules) => {
                    save_color_rules(self.prefs.as_mut(), &rules);
                    self.color_rules = rules;
                    self.toasts.success("Color rules saved");
                }
            }
        }
    }
}
