//SPDX-License-Identifier: MIT OR Apache-2.0

//! # Topicwise Procedural Macros
//!
//! This crate provides the procedural macros for the topicwise logging library.  Use them
//! through the `topicwise` crate, which re-exports them.
//!
//! ## Architecture
//!
//! Each logging macro expands to a block that:
//! 1. declares a marker function whose type name reveals the enclosing function,
//! 2. builds the message body with `BodyFormatter` calls generated by `lformat_impl`,
//! 3. hands body, severity, call site and the optional topic and template to
//!    `topicwise::hidden::emit`.
//!
//! ```rust
//! // This macro call:
//! // topicwise::info!(topic = "jobs", "User {name} has {count} items", name="alice", count=42);
//!
//! // Expands to approximately:
//! // {
//! //     fn __topicwise_here() {}
//! //     let mut __topicwise_formatter = topicwise::hidden::BodyFormatter::new();
//! //     __topicwise_formatter.write_literal("User ");
//! //     __topicwise_formatter.write_val(&("alice"));
//! //     __topicwise_formatter.write_literal(" has ");
//! //     __topicwise_formatter.write_val(&(42));
//! //     __topicwise_formatter.write_literal(" items");
//! //     topicwise::hidden::emit(
//! //         &*topicwise::hidden::global_logger(),
//! //         topicwise::Severity::Info,
//! //         ...
//! //     );
//! // }
//! ```
//!
//! ## Parsing
//!
//! Arguments are parsed by hand from the `proc_macro` token stream; the crate has no
//! dependencies.

use proc_macro::TokenStream;

mod emit;
mod parser;
mod scoped;

/**
Logs a DEBUG message.

```
topicwise::debug!("cache miss for {key}", key = "user:7");
```

The full form is `debug!(logger, topic = ..., template = ..., "format", key = value, ...)`,
where everything except the format string is optional:

* `logger` - a `topicwise::Logger`, `&Logger` or `Arc<Logger>`; the global logger when absent
* `topic` - anything `AsRef<str>`; derived from the call site when absent
* `template` - anything `AsRef<str>` containing `{body}`; the logger's template when absent

```
use std::sync::Arc;
let memory = Arc::new(topicwise::InMemoryHandler::default());
let logger = topicwise::Logger::new(vec![memory.clone()]);
topicwise::debug!(&logger, topic = "cache", template = "{level}: {body}", "miss {n}", n = 3);
assert_eq!(memory.drain_logs(), "DEBUG: miss 3");
```

A placeholder without a value does not compile:

```compile_fail
topicwise::debug!("Hello {missing}!", provided = 123);
```
*/
#[proc_macro]
pub fn debug(input: TokenStream) -> TokenStream {
    emit::log_macro("Debug", input)
}

/**
Logs an INFO message.  See [`debug!`](macro@debug) for the arguments.

```
topicwise::info!("listening on {port}", port = 8080);
```
*/
#[proc_macro]
pub fn info(input: TokenStream) -> TokenStream {
    emit::log_macro("Info", input)
}

/**
Logs a WARNING message.  See [`debug!`](macro@debug) for the arguments.

```
topicwise::warning!(topic = "disk", "{pct}% full", pct = 93);
```
*/
#[proc_macro]
pub fn warning(input: TokenStream) -> TokenStream {
    emit::log_macro("Warning", input)
}

/**
Logs an ERROR message.  See [`debug!`](macro@debug) for the arguments.

```
# let e = std::io::Error::other("refused");
topicwise::error!("connect failed: {e}", e = e);
```
*/
#[proc_macro]
pub fn error(input: TokenStream) -> TokenStream {
    emit::log_macro("Error", input)
}

/**
Logs a FATAL message.  See [`debug!`](macro@debug) for the arguments.

```
topicwise::fatal!("out of memory");
```
*/
#[proc_macro]
pub fn fatal(input: TokenStream) -> TokenStream {
    emit::log_macro("Fatal", input)
}

/**
Enters a topicwise scope named after the function for the duration of its body.

Log calls made while the function runs, directly or from functions it calls, see it in
the thread's scope stack; topics derived with the `stack` method list the scoped
functions outermost first.

```
use std::sync::Arc;
use topicwise::{DerivationMethod, InMemoryHandler, Logger};

#[topicwise::scoped]
fn handle(logger: &Logger) {
    parse(logger);
}

fn parse(logger: &Logger) {
    topicwise::info!(logger, "parsed");
}

let memory = Arc::new(InMemoryHandler::default());
let logger = Logger::new(vec![memory.clone()]).with_derivation(DerivationMethod::Stack);
handle(&logger);
assert_eq!(memory.drain_logs(), "[INFO] handle.parse\nparsed\n\n");
```

`async fn` is rejected: the scope stack is per thread, and a future may move between
threads.
*/
#[proc_macro_attribute]
pub fn scoped(attr: TokenStream, item: TokenStream) -> TokenStream {
    scoped::scoped_impl(attr, item)
}
