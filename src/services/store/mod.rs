//! Narrow interfaces to the remote calendar store.
//!
//! The engine only ever talks to the provider through [`EventSource`]
//! and [`EventSink`]; everything behind them (HTTP, auth, the provider's
//! own storage) is an external collaborator. Two implementations live
//! here: the thin HTTP wrapper and an in-memory store for tests and
//! offline use.

pub mod http;
pub mod memory;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::models::event::{Event, EventTime};
use crate::models::operation::EventPatch;

#[cfg(test)]
use mockall::automock;

pub use http::HttpEventStore;
pub use memory::MemoryEventStore;

/// Failure modes of a remote call. Every one of these degrades to a
/// user-visible message; none is fatal to the interaction loop.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("calendar API returned HTTP {status}")]
    Http { status: u16 },
    #[error("could not decode calendar response: {0}")]
    Decode(String),
    #[error("event {id} not found")]
    NotFound { id: String },
}

/// Read side: fetch the events intersecting a range. Called by the view
/// layer on refresh; the engine itself only ever receives the already
/// fetched list.
#[cfg_attr(test, automock)]
pub trait EventSource: Send + Sync {
    fn list_events(
        &self,
        range_start: DateTime<Local>,
        range_end: DateTime<Local>,
    ) -> Result<Vec<Event>, StoreError>;
}

/// Write side: the three mutations the engine issues for drag intents,
/// dialog saves and undo execution.
#[cfg_attr(test, automock)]
pub trait EventSink: Send + Sync {
    fn create_event(
        &self,
        summary: &str,
        time: EventTime,
        description: Option<String>,
    ) -> Result<Event, StoreError>;

    fn update_event(
        &self,
        id: &str,
        calendar_id: &str,
        patch: &EventPatch,
    ) -> Result<Event, StoreError>;

    fn delete_event(&self, id: &str, calendar_id: &str) -> Result<(), StoreError>;
}

/// Convenience super-trait for code that holds one object serving both
/// directions.
pub trait EventStore: EventSource + EventSink {}

impl<T: EventSource + EventSink> EventStore for T {}

/// How the app shares one store between the UI thread and its workers.
pub type SharedStore = std::sync::Arc<dyn EventStore + Send + Sync>;

impl<T: EventSource + ?Sized> EventSource for std::sync::Arc<T> {
    fn list_events(
        &self,
        range_start: DateTime<Local>,
        range_end: DateTime<Local>,
    ) -> Result<Vec<Event>, StoreError> {
        (**self).list_events(range_start, range_end)
    }
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn create_event(
        &self,
        summary: &str,
        time: EventTime,
        description: Option<String>,
    ) -> Result<Event, StoreError> {
        (**self).create_event(summary, time, description)
    }

    fn update_event(
        &self,
        id: &str,
        calendar_id: &str,
        patch: &EventPatch,
    ) -> Result<Event, StoreError> {
        (**self).update_event(id, calendar_id, patch)
    }

    fn delete_event(&self, id: &str, calendar_id: &str) -> Result<(), StoreError> {
        (**self).delete_event(id, calendar_id)
    }
}
