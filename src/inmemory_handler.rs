// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Handler
//!
//! A handler that keeps rendered messages in memory instead of writing them anywhere,
//! for tests that need to look at what was logged.
//!
//! ```rust
//! use topicwise::{InMemoryHandler, Logger, Severity, TopicFilter};
//! use std::sync::Arc;
//!
//! let memory = Arc::new(InMemoryHandler::new(Severity::Debug, TopicFilter::all()));
//! let logger = Logger::new(vec![memory.clone()]);
//!
//! topicwise::info!(logger, topic = "jobs", "Completed job {id}", id = 23);
//!
//! assert_eq!(memory.drain_logs(), "[INFO] jobs\nCompleted job 23\n\n");
//! assert_eq!(memory.drain_logs(), "");
//! ```

use crate::error::Result;
use crate::filter::TopicFilter;
use crate::handler::Handler;
use crate::message::Message;
use crate::severity::Severity;
use parking_lot::Mutex;

/// Records rendered messages in a `Vec<String>`.
#[derive(Debug)]
pub struct InMemoryHandler {
    min_severity: Severity,
    filter: TopicFilter,
    logs: Mutex<Vec<String>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: Derived, required by Handler
// - Default: Implemented - records everything
// - Clone: NOT implemented - a copy would silently split the record
// - PartialEq/Eq/Hash: NOT implemented - comparing live buffers is racy
// - Send/Sync: from the Mutex

impl Default for InMemoryHandler {
    fn default() -> Self {
        Self::new(Severity::Debug, TopicFilter::all())
    }
}

impl InMemoryHandler {
    pub fn new(min_severity: Severity, filter: TopicFilter) -> Self {
        Self {
            min_severity,
            filter,
            logs: Mutex::new(Vec::new()),
        }
    }

    /// Concatenates the recorded messages and clears the buffer.
    ///
    /// Rendered messages end with their template's trailing text, so no separator is
    /// added between them.
    pub fn drain_logs(&self) -> String {
        let mut logs = self.logs.lock();
        let result = logs.concat();
        logs.clear();
        result
    }

    /// Takes the recorded messages, one entry per write.
    pub fn take_records(&self) -> Vec<String> {
        std::mem::take(&mut *self.logs.lock())
    }

    /// Copies the recorded messages without clearing them.
    pub fn records(&self) -> Vec<String> {
        self.logs.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.logs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.lock().is_empty()
    }
}

impl Handler for InMemoryHandler {
    fn min_severity(&self) -> Severity {
        self.min_severity
    }

    fn filter(&self) -> &TopicFilter {
        &self.filter
    }

    fn write(&self, message: &Message) -> Result<()> {
        let rendered = message.render();
        self.logs.lock().push(rendered);
        Ok(())
    }
}
