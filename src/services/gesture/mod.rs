//! Pointer gesture state machines.
//!
//! Both controllers are plain FSMs over day + minute offsets so they
//! can be driven and tested without a rendering surface; the egui
//! pointer adapter lives in `ui_egui::views::time_grid`.

pub mod create;
pub mod reschedule;

pub use create::{CreateSelection, DragSelection};
pub use reschedule::{DragReschedule, DropTarget, MoveRequest};
