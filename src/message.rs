// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messages and the templates that render them.
//!
//! A [`Message`] is created per log call, handed to every handler of a
//! [`Logger`](crate::Logger), then dropped.  Rendering goes through its [`Template`]:
//!
//! ```rust
//! use topicwise::{Message, Severity, Topic};
//!
//! let message = Message::new("B", Severity::Info, Topic::new("t"));
//! assert_eq!(message.render(), "[INFO] t\nB\n\n");
//! ```
//!
//! Templates know three placeholders, `{level}`, `{topic}` and `{body}`.  `{body}` is
//! mandatory; any other text, braces included, is copied through unchanged.

use crate::error::{Error, Result};
use crate::severity::Severity;
use crate::topic::Topic;
use std::borrow::Cow;
use std::fmt::{Display, Write};

/// Template used when none is given.
pub const DEFAULT_TEMPLATE: &str = "[{level}] {topic}\n{body}\n\n";

const LEVEL: &str = "{level}";
const TOPIC: &str = "{topic}";
const BODY: &str = "{body}";

/**
A validated message template.

Construction fails with [`Error::InvalidFormat`] unless the template contains `{body}`.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template(Cow<'static, str>);

impl Template {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(BODY) {
            return Err(Error::InvalidFormat(template));
        }
        Ok(Self(Cow::Owned(template)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /**
    Renders in a single left-to-right pass.

    Substituted text is never rescanned, so a body that itself contains `{topic}` is
    written out literally.
    */
    pub fn render_into<W: Write>(
        &self,
        out: &mut W,
        severity: Severity,
        topic: &Topic,
        body: &str,
    ) -> std::fmt::Result {
        let mut rest = self.as_str();
        while let Some(open) = rest.find('{') {
            out.write_str(&rest[..open])?;
            let tail = &rest[open..];
            if let Some(after) = tail.strip_prefix(LEVEL) {
                out.write_str(severity.name())?;
                rest = after;
            } else if let Some(after) = tail.strip_prefix(TOPIC) {
                out.write_str(topic.as_str())?;
                rest = after;
            } else if let Some(after) = tail.strip_prefix(BODY) {
                out.write_str(body)?;
                rest = after;
            } else {
                out.write_char('{')?;
                rest = &tail[1..];
            }
        }
        out.write_str(rest)
    }

    pub fn render(&self, severity: Severity, topic: &Topic, body: &str) -> String {
        let mut out = String::with_capacity(self.0.len() + topic.as_str().len() + body.len());
        // writing to a String cannot fail
        let _ = self.render_into(&mut out, severity, topic, body);
        out
    }
}

impl Default for Template {
    fn default() -> Self {
        Self(Cow::Borrowed(DEFAULT_TEMPLATE))
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Template {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Template {
    type Error = Error;
    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Template {
    type Error = Error;
    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

/**
A single log message.

The template can be swapped after construction with [`Message::set_template`], which
validates the replacement the same way [`Template::new`] does.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message {
    body: String,
    severity: Severity,
    topic: Topic,
    template: Template,
}

impl Message {
    /// A message using [`DEFAULT_TEMPLATE`].
    pub fn new(body: impl Into<String>, severity: Severity, topic: Topic) -> Self {
        Self::with_template(body, severity, topic, Template::default())
    }

    pub fn with_template(
        body: impl Into<String>,
        severity: Severity,
        topic: Topic,
        template: Template,
    ) -> Self {
        Self {
            body: body.into(),
            severity,
            topic,
            template,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Replaces the template.  On error the message keeps its previous template.
    pub fn set_template(&mut self, template: impl Into<String>) -> Result<()> {
        self.template = Template::new(template)?;
        Ok(())
    }

    pub fn render(&self) -> String {
        self.template.render(self.severity, &self.topic, &self.body)
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.template
            .render_into(f, self.severity, &self.topic, &self.body)
    }
}

/*
Boilerplate notes for Message:

Clone/Eq/Hash are derived; two messages are equal when they would render identically
from identical parts.
Default makes little sense, there is no natural body.
Display renders through the template, so `to_string()` and `render()` agree.
No Ord, messages have no natural order.
*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_renders_exactly() {
        let message = Message::new("B", Severity::Info, Topic::new("t"));
        assert_eq!(message.render(), "[INFO] t\nB\n\n");
        assert_eq!(message.to_string(), "[INFO] t\nB\n\n");
    }

    #[test]
    fn template_requires_body() {
        assert!(matches!(
            Template::new("[{level}] {topic}"),
            Err(Error::InvalidFormat(t)) if t == "[{level}] {topic}"
        ));
        assert!(Template::new("{body}").is_ok());
    }

    #[test]
    fn set_template_revalidates() {
        let mut message = Message::new("B", Severity::Error, Topic::new("t"));
        assert!(message.set_template("{level}: {body}").is_ok());
        assert_eq!(message.render(), "ERROR: B");

        assert!(matches!(
            message.set_template("no body here"),
            Err(Error::InvalidFormat(_))
        ));
        assert_eq!(message.template().as_str(), "{level}: {body}");
    }

    #[test]
    fn substitution_is_single_pass() {
        let message = Message::with_template(
            "{topic} and {level}",
            Severity::Debug,
            Topic::new("real"),
            Template::new("{topic}|{body}").unwrap(),
        );
        assert_eq!(message.render(), "real|{topic} and {level}");
    }

    #[test]
    fn unknown_braces_pass_through() {
        let template = Template::new("{{x}} {nope} {body} {").unwrap();
        assert_eq!(
            template.render(Severity::Warning, &Topic::default(), "B"),
            "{{x}} {nope} B {"
        );
    }

    #[test]
    fn placeholders_may_repeat() {
        let template = Template::new("{level}{level} {body}{body}").unwrap();
        assert_eq!(
            template.render(Severity::Fatal, &Topic::default(), "x"),
            "FATALFATAL xx"
        );
    }
}
