//! Background remote calls.
//!
//! The UI thread never blocks on the network: every store call runs on
//! a short-lived worker thread and reports back over an mpsc channel
//! that the app drains at the top of each frame.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Local};

use crate::models::event::Event;
use crate::models::operation::EventOperation;
use crate::services::command::CommandParser;
use crate::services::mutation::{self, Applied};
use crate::services::store::{EventSource, SharedStore};
use crate::services::undo::UndoEntry;

/// Results flowing back from worker threads.
pub enum WorkerEvent {
    EventsLoaded(Result<Vec<Event>, String>),
    MutationFinished(Result<Applied, String>),
    UndoFinished { ok: bool, description: String },
    CommandParsed(Result<Vec<EventOperation>, String>),
}

fn send(tx: &Sender<WorkerEvent>, event: WorkerEvent) {
    if tx.send(event).is_err() {
        log::debug!("Worker result dropped; app already shut down");
    }
}

pub fn spawn_list(
    store: SharedStore,
    tx: Sender<WorkerEvent>,
    range_start: DateTime<Local>,
    range_end: DateTime<Local>,
    ctx: egui::Context,
) {
    thread::spawn(move || {
        let result = store
            .list_events(range_start, range_end)
            .map_err(|e| e.to_string());
        send(&tx, WorkerEvent::EventsLoaded(result));
        ctx.request_repaint();
    });
}

pub fn spawn_execute(
    store: SharedStore,
    tx: Sender<WorkerEvent>,
    op: EventOperation,
    ctx: egui::Context,
) {
    thread::spawn(move || {
        let result = mutation::execute(&op, &store).map_err(|e| e.to_string());
        send(&tx, WorkerEvent::MutationFinished(result));
        ctx.request_repaint();
    });
}

pub fn spawn_revert(
    store: SharedStore,
    tx: Sender<WorkerEvent>,
    entry: UndoEntry,
    ctx: egui::Context,
) {
    thread::spawn(move || {
        let description = entry.description();
        let ok = entry.revert(&store);
        send(&tx, WorkerEvent::UndoFinished { ok, description });
        ctx.request_repaint();
    });
}

pub fn spawn_parse(
    parser: Arc<dyn CommandParser>,
    tx: Sender<WorkerEvent>,
    text: String,
    ctx: egui::Context,
) {
    thread::spawn(move || {
        let result = parser.parse(&text).map_err(|e| e.to_string());
        send(&tx, WorkerEvent::CommandParsed(result));
        ctx.request_repaint();
    });
}
