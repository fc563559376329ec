// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type shared by every fallible operation in topicwise.
//!
//! Validation is eager: severities, templates, filter strings, derivation methods and
//! file collision policies are all checked when the value is constructed, so a value that
//! exists is a value that is valid.  The only errors produced while logging are sink
//! failures, reported as [`Error::Io`] for a single handler or [`Error::Dispatch`] when a
//! [`Logger`](crate::Logger) fans a message out.

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Which family of mode strings an [`Error::UnrecognizedMode`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    /// Topic derivation method (`"stack"` or `"module"`).
    Derivation,
    /// File collision policy (`"overwrite"`, `"append"`, ...).
    FileMode,
    /// A topic filter string that could not be compiled.
    Pattern,
}

impl Display for ModeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeKind::Derivation => f.write_str("topic derivation method"),
            ModeKind::FileMode => f.write_str("file mode"),
            ModeKind::Pattern => f.write_str("topic filter"),
        }
    }
}

/// One failed handler inside an [`Error::Dispatch`].
#[derive(Debug)]
pub struct HandlerFailure {
    /// Position of the handler in the logger, in emit order.
    pub index: usize,
    /// What the handler reported.
    pub error: Error,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A value of the wrong kind was supplied where configuration expected another.
    #[error("{argument} must be {expected}, got {found:?}")]
    InvalidArgumentType {
        argument: &'static str,
        expected: &'static str,
        found: String,
    },
    /// A rank outside `0..=4` or a name that is not a severity.
    #[error("invalid severity {0:?}; expected 0-4 or one of DEBUG, INFO, WARNING, ERROR, FATAL")]
    InvalidSeverity(String),
    /// A message template that does not contain `{body}`.
    #[error("message template {0:?} must contain {{body}}")]
    InvalidFormat(String),
    /// The `abort` file policy found an existing file.
    #[error("log file {} already exists", .0.display())]
    FileExists(PathBuf),
    #[error("unrecognized {kind} {value:?}; expected {expected}")]
    UnrecognizedMode {
        kind: ModeKind,
        value: String,
        expected: &'static str,
    },
    /// The sink behind a handler failed.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// One or more handlers failed while a message was dispatched.  Every other handler
    /// still received the message.
    #[error("{} handler(s) failed during dispatch: {}", .0.len(), DisplayFailures(.0))]
    Dispatch(Vec<HandlerFailure>),
}

struct DisplayFailures<'a>(&'a [HandlerFailure]);

impl Display for DisplayFailures<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "#{}: {}", failure.index, failure.error)?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn invalid_format_mentions_placeholder() {
        let e = Error::InvalidFormat("[{level}]".to_string());
        assert!(e.to_string().contains("{body}"), "{e}");
    }

    #[test]
    fn io_keeps_source() {
        let e = Error::io(
            "/nowhere/log.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(e.to_string().contains("/nowhere/log.txt"));
        assert_eq!(e.source().unwrap().to_string(), "gone");
    }

    #[test]
    fn dispatch_lists_every_failure() {
        let e = Error::Dispatch(vec![
            HandlerFailure {
                index: 0,
                error: Error::FileExists(PathBuf::from("a.log")),
            },
            HandlerFailure {
                index: 2,
                error: Error::InvalidSeverity("9".to_string()),
            },
        ]);
        let text = e.to_string();
        assert!(text.starts_with("2 handler(s) failed"), "{text}");
        assert!(text.contains("#0: log file a.log already exists"), "{text}");
        assert!(text.contains("#2: invalid severity"), "{text}");
    }

    #[test]
    fn unrecognized_mode_names_kind() {
        let e = Error::UnrecognizedMode {
            kind: ModeKind::FileMode,
            value: "clobber".to_string(),
            expected: "overwrite, overwrite-warn, abort, append or new",
        };
        assert_eq!(
            e.to_string(),
            concat!(
                "unrecognized file mode \"clobber\"; ",
                "expected overwrite, overwrite-warn, abort, append or new"
            )
        );
    }
}
