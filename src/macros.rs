// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime support for the code the logging macros generate.
//!
//! These functions are called by the procedural macros in `topicwise_proc` and are not
//! meant to be called directly.
//!
//! # Architecture
//!
//! A call such as
//!
//! ```rust
//! topicwise::info!(topic = "jobs", "Completed job {id}", id = 23);
//! ```
//!
//! expands to roughly:
//!
//! ```ignore
//! {
//!     fn __topicwise_here() {}
//!     let mut formatter = topicwise::hidden::BodyFormatter::new();
//!     formatter.write_literal("Completed job ");
//!     formatter.write_val(&(23));
//!     topicwise::hidden::emit(
//!         &topicwise::hidden::global_logger(),
//!         topicwise::Severity::Info,
//!         topicwise::CallSite::new(
//!             module_path!(),
//!             topicwise::hidden::function_path(__topicwise_here),
//!             file!(),
//!             line!(),
//!         ),
//!         Some("jobs"),
//!         None,
//!         formatter.finish(),
//!     );
//! }
//! ```
//!
//! The nested `__topicwise_here` is what gives the call site its function path: its
//! [`type_name`](std::any::type_name) is the path of the enclosing function plus its own
//! name.

use crate::error::Error;
use crate::logger::Logger;
use crate::resolver::CallSite;
use crate::scope::{Frame, Scope};
use crate::severity::Severity;
use std::fmt::{Display, Write};
use std::io::Write as _;

/// Name of the marker function the macros declare at each call site.
const HERE: &str = "__topicwise_here";

/// Accumulates a message body from literal text and `{key}` values.
///
/// ```rust
/// # use topicwise::hidden::BodyFormatter;
/// let mut formatter = BodyFormatter::new();
/// formatter.write_literal("Count: ");
/// formatter.write_val(&42u8);
/// assert_eq!(formatter.finish(), "Count: 42");
/// ```
#[derive(Debug, Default)]
pub struct BodyFormatter {
    body: String,
}

impl BodyFormatter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn write_literal(&mut self, s: &str) {
        self.body.push_str(s);
    }

    #[inline]
    pub fn write_val<Val: Display + ?Sized>(&mut self, val: &Val) {
        // writing to a String cannot fail
        let _ = write!(self.body, "{val}");
    }

    #[inline]
    pub fn finish(self) -> String {
        self.body
    }
}

/**
Strips the marker name from the [`type_name`](std::any::type_name) of a call site's
marker function, leaving the path of the function around it.
*/
pub fn function_path<F>(_marker: F) -> &'static str {
    let name = std::any::type_name::<F>();
    name.strip_suffix(HERE)
        .and_then(|path| path.strip_suffix("::"))
        .unwrap_or(name)
}

/// Called by `#[topicwise::scoped]` on entry to the annotated function.
pub fn enter_scope(
    module_path: &'static str,
    function: &'static str,
    name: &'static str,
) -> Scope {
    Scope::enter(Frame::new(module_path, function, name))
}

/**
Logs one macro call.

Macro calls are statements and have nowhere to return an error, so failures are written
to the error stream instead.  Call the [`Logger`] methods directly to receive them.
*/
pub fn emit(
    logger: &Logger,
    severity: Severity,
    site: CallSite,
    topic: Option<&str>,
    template: Option<&str>,
    body: String,
) {
    if let Err(error) = logger.log_at(severity, &site, topic, template, body) {
        report(&site, &error);
    }
}

fn report(site: &CallSite, error: &Error) {
    let mut stream = crate::sys::error_stream();
    let _ = writeln!(
        stream,
        "topicwise: log call at {}:{} failed: {error}",
        site.file(),
        site.line()
    )
    .and_then(|()| stream.flush());
}
