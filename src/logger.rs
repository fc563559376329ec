// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dispatcher.
//!
//! A [`Logger`] owns an ordered list of handlers and hands every message to each of them,
//! in insertion order.  Each handler filters on its own.
//!
//! ```
//! use topicwise::{InMemoryHandler, Logger, Severity, TopicFilter};
//! use std::sync::Arc;
//!
//! let everything = Arc::new(InMemoryHandler::default());
//! let net_filter = TopicFilter::new("net.#").unwrap();
//! let net_errors = Arc::new(InMemoryHandler::new(Severity::Error, net_filter));
//! let logger = Logger::new(vec![everything.clone(), net_errors.clone()]);
//!
//! logger.info("listening", Some("net.tcp"), None).unwrap();
//! logger.error("refused", Some("net.tcp"), None).unwrap();
//!
//! assert_eq!(everything.len(), 2);
//! assert_eq!(net_errors.records(), ["[ERROR] net.tcp\nrefused\n\n"]);
//! ```
//!
//! # Failures
//!
//! A failing handler does not stop the others: the message is offered to every handler,
//! and the failures are returned together as [`Error::Dispatch`], each tagged with the
//! handler's position.

use crate::console_handler::ConsoleHandler;
use crate::error::{Error, HandlerFailure, Result};
use crate::filter::TopicFilter;
use crate::handler::Handler;
use crate::message::{Message, Template};
use crate::resolver::{CallSite, DerivationMethod, INTERNAL_FRAMES, TopicResolver};
use crate::severity::{Severity, SeverityOperand};
use crate::topic::Topic;
use std::sync::Arc;

/// Fans messages out to a list of handlers.
#[derive(Debug, Clone)]
pub struct Logger {
    handlers: Vec<Arc<dyn Handler>>,
    resolver: Arc<dyn TopicResolver>,
    template: Template,
}

impl Logger {
    /// A logger deriving topics with [`DerivationMethod::Module`] and rendering with the
    /// default template.
    pub fn new(handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self {
            handlers,
            resolver: Arc::new(DerivationMethod::default()),
            template: Template::default(),
        }
    }

    /**
    A logger with a single [`ConsoleHandler`].

    `severity` is a rank, a name or a [`Severity`]; `filter` is a topic filter string.

    ```
    use topicwise::Logger;
    let logger = Logger::console("WARNING", "#", false, true).unwrap();
    assert_eq!(logger.handlers().len(), 1);
    assert!(Logger::console(7, "#", false, true).is_err());
    ```
    */
    pub fn console(
        severity: impl SeverityOperand,
        filter: &str,
        color: bool,
        use_stderr: bool,
    ) -> Result<Self> {
        let handler = ConsoleHandler::new(Severity::factory(severity)?, TopicFilter::new(filter)?)
            .with_color(color)
            .with_stderr(use_stderr);
        Ok(Self::new(vec![Arc::new(handler)]))
    }

    pub fn with_derivation(self, method: DerivationMethod) -> Self {
        self.with_resolver(method)
    }

    pub fn with_resolver(mut self, resolver: impl TopicResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Sets the template used when a log call does not pass one.
    pub fn with_template(mut self, template: impl Into<String>) -> Result<Self> {
        self.template = Template::new(template)?;
        Ok(self)
    }

    pub fn handlers(&self) -> &[Arc<dyn Handler>] {
        &self.handlers
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Appends a handler; it receives messages after all existing handlers.
    pub fn add_handler(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.push(handler);
    }

    pub fn add_handlers(&mut self, handlers: impl IntoIterator<Item = Arc<dyn Handler>>) {
        self.handlers.extend(handlers);
    }

    /// Offers `message` to every handler in order.
    pub fn log(&self, message: &Message) -> Result<()> {
        let failures: Vec<HandlerFailure> = self
            .handlers
            .iter()
            .enumerate()
            .filter_map(|(index, handler)| {
                handler
                    .emit(message)
                    .err()
                    .map(|error| HandlerFailure { index, error })
            })
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Dispatch(failures))
        }
    }

    /// The topic a log call at `site` gets when it does not name one.
    pub fn derive_topic(&self, site: &CallSite) -> Topic {
        self.resolver.resolve(site, INTERNAL_FRAMES)
    }

    /**
    Builds a message and logs it.

    `topic` defaults to [`derive_topic`](Self::derive_topic), `template` to the logger's
    template.  An invalid `template` fails with [`Error::InvalidFormat`] before any handler
    runs.
    */
    pub fn log_at(
        &self,
        severity: Severity,
        site: &CallSite,
        topic: Option<&str>,
        template: Option<&str>,
        body: impl Into<String>,
    ) -> Result<()> {
        let template = match template {
            Some(template) => Template::new(template)?,
            None => self.template.clone(),
        };
        let topic = match topic {
            Some(topic) => Topic::new(topic),
            None => self.derive_topic(site),
        };
        self.log(&Message::with_template(body, severity, topic, template))
    }

    #[track_caller]
    pub fn debug(
        &self,
        body: impl Into<String>,
        topic: Option<&str>,
        template: Option<&str>,
    ) -> Result<()> {
        self.log_at(Severity::Debug, &CallSite::caller(), topic, template, body)
    }

    #[track_caller]
    pub fn info(
        &self,
        body: impl Into<String>,
        topic: Option<&str>,
        template: Option<&str>,
    ) -> Result<()> {
        self.log_at(Severity::Info, &CallSite::caller(), topic, template, body)
    }

    #[track_caller]
    pub fn warning(
        &self,
        body: impl Into<String>,
        topic: Option<&str>,
        template: Option<&str>,
    ) -> Result<()> {
        self.log_at(Severity::Warning, &CallSite::caller(), topic, template, body)
    }

    #[track_caller]
    pub fn error(
        &self,
        body: impl Into<String>,
        topic: Option<&str>,
        template: Option<&str>,
    ) -> Result<()> {
        self.log_at(Severity::Error, &CallSite::caller(), topic, template, body)
    }

    #[track_caller]
    pub fn fatal(
        &self,
        body: impl Into<String>,
        topic: Option<&str>,
        template: Option<&str>,
    ) -> Result<()> {
        self.log_at(Severity::Fatal, &CallSite::caller(), topic, template, body)
    }
}

impl Default for Logger {
    /// No handlers.
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/*
Boilerplate notes.

# Logger

Clone is cheap, handlers and resolver are shared through Arc.  The global logger relies on
it to add handlers copy-on-write.
PartialEq/Eq would compare handler identity, which is not what anyone means; skip.
Display, no.
*/
