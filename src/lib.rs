//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# topicwise

topicwise is a logging library built around *topics*.

# The problem

Log levels answer "how bad is it?" but not "what is it about?".  When a program misbehaves
in one corner, turning the level down to DEBUG everywhere buries that corner in noise from
every other one.

topicwise tags every message with a topic, a dotted path such as `net.Server.accept`, and
lets each output select the topics it cares about with a small pattern language.

# Severities

Five, in order: DEBUG, INFO, WARNING, ERROR, FATAL.  A [`Severity`] compares against
another severity, a rank (`0`-`4`) or a name, interchangeably.

# Topics

A log call either names its topic or lets the [`Logger`] derive one from where it was
written.  By default the topic is the module's last path segment followed by the
function, `Type.method` inside a method:

```rust
mod net {
    pub struct Server;
    impl Server {
        pub fn accept(&self, logger: &topicwise::Logger) {
            topicwise::info!(logger, "accepted {peer}", peer = "10.0.0.7");
        }
    }
}

use std::sync::Arc;
let memory = Arc::new(topicwise::InMemoryHandler::default());
let logger = topicwise::Logger::new(vec![memory.clone()]);
net::Server.accept(&logger);
assert_eq!(memory.drain_logs(), "[INFO] net.Server.accept\naccepted 10.0.0.7\n\n");
```

The alternative, [`DerivationMethod::Stack`], names the chain of
[`#[scoped]`](scoped) functions that led to the call.  See [`TopicResolver`].

# Filters

Every handler has a minimum severity and a [`TopicFilter`].  In a filter, `*` stands for
exactly one key and `#` for any number of characters, dots included.  Filters match
*prefixes* of topics, so `net` selects `net.Server.accept`.

| filter        | matches                                   |
|---------------|-------------------------------------------|
| `#`           | everything                                |
| `net.*`       | `net.tcp`, `net.Server.accept`            |
| `#.accept`    | `net.Server.accept`, `ipc.accept.retry`   |

# Handlers

* [`ConsoleHandler`]: stdout, with WARNING and above routed to stderr, optionally colored
* [`FileHandler`]: appends to a file chosen at construction under a [`FileMode`]
* [`InMemoryHandler`]: keeps rendered messages for inspection in tests

A [`Logger`] hands every message to each of its handlers in order.  Without an explicit
logger, the macros use the [global logger](global_logger), which starts out as an
uncolored console accepting everything.

# The API

```rust
# let bytes = 12;
topicwise::debug!("read {bytes} bytes", bytes = bytes);
topicwise::warning!(topic = "disk.cache", "cache is {pct}% full", pct = 93);
```

Each macro takes, in order: an optional logger expression, optional `topic = ...` and
`template = ...` arguments, a string literal with `{key}` placeholders, and the `key = value`
pairs for those placeholders.  Values are formatted with `Display`.  `{{` and `}}` write
literal braces.

Configuration can also be assembled from data or the environment, see [`config`].
*/

mod console_handler;
pub mod config;
mod error;
pub mod file_handler;
mod filter;
pub mod global_logger;
mod handler;
mod inmemory_handler;
mod logger;
mod macros;
mod message;
mod resolver;
pub mod scope;
mod severity;
mod sys;
mod topic;

pub use console_handler::ConsoleHandler;
pub use error::{Error, HandlerFailure, ModeKind, Result};
pub use file_handler::{FileHandler, FileMode};
pub use filter::TopicFilter;
pub use global_logger::{add_global_handler, global_logger, set_global_logger};
pub use handler::Handler;
pub use inmemory_handler::InMemoryHandler;
pub use logger::Logger;
pub use message::{DEFAULT_TEMPLATE, Message, Template};
pub use resolver::{
    CallSite, DerivationMethod, INTERNAL_FRAMES, ModuleResolver, StackResolver, TopicResolver,
};
pub use scope::Scope;
pub use severity::{Severity, SeverityOperand};
pub use topic::Topic;

pub use topicwise_proc::{debug, error, fatal, info, scoped, warning};

#[doc(hidden)]
pub mod hidden {
    pub use crate::global_logger::global_logger;
    pub use crate::macros::{BodyFormatter, emit, enter_scope, function_path};
}
extern crate self as topicwise;
