//! Natural-language command surface.
//!
//! Parsing free text (or a pasted syllabus screenshot, server-side)
//! into structured operations is the job of an external service; this
//! module only defines the narrow interface the shell calls and a stub
//! used when no service is configured.

use anyhow::Result;

use crate::models::operation::EventOperation;

/// The external parsing service: free text in, structured mutations
/// out. Implementations are expected to block; the shell calls this
/// from a worker thread.
pub trait CommandParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<Vec<EventOperation>>;
}

/// Placeholder used when no parsing service is wired up. Always fails
/// with a user-explainable message.
pub struct UnconfiguredParser;

impl CommandParser for UnconfiguredParser {
    fn parse(&self, _text: &str) -> Result<Vec<EventOperation>> {
        anyhow::bail!("natural-language commands need a configured assistant service")
    }
}
