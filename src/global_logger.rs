// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide logger.
//!
//! The logging macros use this logger unless they are handed one explicitly, and
//! topicwise reports its own conditions through it (see
//! [`FILE_HANDLER_TOPIC`](crate::file_handler::FILE_HANDLER_TOPIC)).
//!
//! # Default Behavior
//!
//! Until configured, the global logger has a single [`ConsoleHandler`] that accepts every
//! severity and topic, without color, routing WARNING and above to stderr.
//!
//! # Examples
//!
//! ## Adding a handler
//!
//! ```
//! use topicwise::global_logger::add_global_handler;
//! use topicwise::InMemoryHandler;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(InMemoryHandler::default());
//! add_global_handler(memory.clone());
//!
//! topicwise::warning!(topic = "docs", "This goes to the console and to memory");
//! assert!(memory.drain_logs().contains("This goes to the console and to memory"));
//! ```
//!
//! ## Replacing the logger
//!
//! ```
//! use topicwise::global_logger::set_global_logger;
//! use topicwise::{InMemoryHandler, Logger};
//! use std::sync::Arc;
//!
//! let memory = Arc::new(InMemoryHandler::default());
//! set_global_logger(Logger::new(vec![memory.clone()]));
//!
//! topicwise::info!(topic = "docs", "Only captured in memory");
//! assert_eq!(memory.drain_logs(), "[INFO] docs\nOnly captured in memory\n\n");
//! ```
//!
//! # Logger Lifecycle
//!
//! The logger is held in an `Arc`.  A log call clones the `Arc` under a read lock and
//! releases the lock before dispatching, so replacing the logger never waits for a slow
//! handler, and a message in flight finishes on the logger it started with.

use crate::console_handler::ConsoleHandler;
use crate::filter::TopicFilter;
use crate::handler::Handler;
use crate::logger::Logger;
use crate::severity::Severity;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

static GLOBAL_LOGGER: OnceLock<RwLock<Arc<Logger>>> = OnceLock::new();

fn default_logger() -> Logger {
    let console = ConsoleHandler::new(Severity::Debug, TopicFilter::all())
        .with_color(false)
        .with_stderr(true);
    Logger::new(vec![Arc::new(console)])
}

fn global() -> &'static RwLock<Arc<Logger>> {
    GLOBAL_LOGGER.get_or_init(|| RwLock::new(Arc::new(default_logger())))
}

/// The current global logger.
pub fn global_logger() -> Arc<Logger> {
    global().read().clone()
}

/// Replaces the global logger.
pub fn set_global_logger(logger: Logger) {
    *global().write() = Arc::new(logger);
}

/// Appends a handler to the global logger.
///
/// The logger is copied on write; a dispatch already under way is unaffected.
pub fn add_global_handler(handler: Arc<dyn Handler>) {
    let mut logger = global().write();
    Arc::make_mut(&mut logger).add_handler(handler);
}

/// Serializes tests that reconfigure the global logger.
#[cfg(test)]
pub(crate) static TEST_LOGGER_GUARD: std::sync::Mutex<()> = std::sync::Mutex::new(());
