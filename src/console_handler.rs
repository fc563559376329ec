// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::error::{Error, Result};
use crate::filter::TopicFilter;
use crate::handler::Handler;
use crate::message::Message;
use crate::severity::Severity;
use crate::sys::{self, Stream};
use parking_lot::Mutex;
use std::io::Write;

/// ANSI foreground colors, indexed by severity rank.
const COLORS: [&str; 5] = [
    "\x1b[34m", // DEBUG, blue
    "\x1b[92m", // INFO, green
    "\x1b[93m", // WARNING, yellow
    "\x1b[91m", // ERROR, red
    "\x1b[91m", // FATAL, red
];
const RESET: &str = "\x1b[0m";

/**
A handler that writes to the console.

With stderr routing on (the default), WARNING and above go to the error stream and
everything else to the standard stream.  With color on (also the default) the whole
rendered message is wrapped in an ANSI color keyed by severity.  Each write is flushed
immediately.

```
use topicwise::{ConsoleHandler, Severity, TopicFilter};

let handler = ConsoleHandler::new(Severity::Info, TopicFilter::all())
    .with_color(false)
    .with_stderr(false);
```

The streams default to the process's stdout and stderr; [`with_streams`](Self::with_streams)
substitutes any pair of writers.
*/
pub struct ConsoleHandler {
    min_severity: Severity,
    filter: TopicFilter,
    color: bool,
    use_stderr: bool,
    standard: Mutex<Stream>,
    error: Mutex<Stream>,
}

impl ConsoleHandler {
    pub fn new(min_severity: Severity, filter: TopicFilter) -> Self {
        Self {
            min_severity,
            filter,
            color: true,
            use_stderr: true,
            standard: Mutex::new(sys::standard_stream()),
            error: Mutex::new(sys::error_stream()),
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Whether WARNING and above go to the error stream.
    pub fn with_stderr(mut self, use_stderr: bool) -> Self {
        self.use_stderr = use_stderr;
        self
    }

    pub fn with_streams(
        mut self,
        standard: impl Write + Send + 'static,
        error: impl Write + Send + 'static,
    ) -> Self {
        self.standard = Mutex::new(Box::new(standard));
        self.error = Mutex::new(Box::new(error));
        self
    }

    pub fn color(&self) -> bool {
        self.color
    }

    pub fn use_stderr(&self) -> bool {
        self.use_stderr
    }

    fn routes_to_error(&self, severity: Severity) -> bool {
        self.use_stderr && severity >= Severity::Warning
    }
}

impl Handler for ConsoleHandler {
    fn min_severity(&self) -> Severity {
        self.min_severity
    }

    fn filter(&self) -> &TopicFilter {
        &self.filter
    }

    fn write(&self, message: &Message) -> Result<()> {
        let text = if self.color {
            let color = COLORS[message.severity().rank() as usize];
            format!("{color}{}{RESET}", message.render())
        } else {
            message.render()
        };
        let (stream, name) = if self.routes_to_error(message.severity()) {
            (&self.error, "<stderr>")
        } else {
            (&self.standard, "<stdout>")
        };
        let mut stream = stream.lock();
        stream
            .write_all(text.as_bytes())
            .and_then(|()| stream.flush())
            .map_err(|e| Error::io(name, e))
    }
}

impl std::fmt::Debug for ConsoleHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleHandler")
            .field("min_severity", &self.min_severity)
            .field("filter", &self.filter)
            .field("color", &self.color)
            .field("use_stderr", &self.use_stderr)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: written by hand, the streams are opaque trait objects
// - Clone: NOT implemented - the handler owns its streams
// - PartialEq/Eq/Hash: NOT implemented - stream identity is not comparable
// - Default: NOT implemented - there is no obvious minimum severity
// - Send/Sync: from the Mutex-wrapped `Write + Send` streams
