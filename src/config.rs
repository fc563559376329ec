// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative logger configuration.
//!
//! [`LoggerConfig`] describes a [`Logger`] as plain data: an optional console handler,
//! any number of file handlers, the topic derivation method and the default template.
//! It can be written by hand, read from the environment with
//! [`LoggerConfig::from_env`], or (with the `serde` feature) deserialized.
//!
//! ```
//! use topicwise::config::{ConsoleConfig, LoggerConfig};
//! use topicwise::{DerivationMethod, Severity};
//!
//! let logger = LoggerConfig::default()
//!     .with_console(ConsoleConfig::default().with_severity(Severity::Warning).with_color(false))
//!     .with_topic_method(DerivationMethod::Stack)
//!     .build()
//!     .unwrap();
//! assert_eq!(logger.handlers().len(), 1);
//! ```
//!
//! # Environment
//!
//! | variable                 | meaning                                          |
//! |--------------------------|--------------------------------------------------|
//! | `TOPICWISE_LEVEL`        | console minimum severity, by name or rank        |
//! | `TOPICWISE_FILTER`       | console topic filter                             |
//! | `TOPICWISE_COLOR`        | console color, a boolean                         |
//! | `TOPICWISE_STDERR`       | route WARNING and above to stderr, a boolean     |
//! | `TOPICWISE_TOPIC_METHOD` | `stack` or `module`                              |
//! | `TOPICWISE_TEMPLATE`     | default message template                         |
//!
//! Booleans are `1`, `0`, `true`, `false`, `yes`, `no`, `on` or `off`, case-insensitively.

use crate::console_handler::ConsoleHandler;
use crate::error::{Error, Result};
use crate::file_handler::{FileHandler, FileMode, PendingFile, generated_filename};
use crate::filter::TopicFilter;
use crate::handler::Handler;
use crate::logger::Logger;
use crate::message::Template;
use crate::resolver::DerivationMethod;
use crate::severity::Severity;
use std::path::PathBuf;
use std::sync::Arc;

pub const LEVEL_ENV: &str = "TOPICWISE_LEVEL";
pub const FILTER_ENV: &str = "TOPICWISE_FILTER";
pub const COLOR_ENV: &str = "TOPICWISE_COLOR";
pub const STDERR_ENV: &str = "TOPICWISE_STDERR";
pub const TOPIC_METHOD_ENV: &str = "TOPICWISE_TOPIC_METHOD";
pub const TEMPLATE_ENV: &str = "TOPICWISE_TEMPLATE";

/// Settings for a [`ConsoleHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConsoleConfig {
    pub severity: Severity,
    pub filter: String,
    pub color: bool,
    pub use_stderr: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            severity: Severity::Debug,
            filter: "#".to_string(),
            color: true,
            use_stderr: true,
        }
    }
}

impl ConsoleConfig {
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_stderr(mut self, use_stderr: bool) -> Self {
        self.use_stderr = use_stderr;
        self
    }

    pub fn build(&self) -> Result<ConsoleHandler> {
        Ok(
            ConsoleHandler::new(self.severity, TopicFilter::new(self.filter.as_str())?)
                .with_color(self.color)
                .with_stderr(self.use_stderr),
        )
    }
}

/// Settings for a [`FileHandler`].  Without a filename, one is generated from the time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FileConfig {
    pub severity: Severity,
    pub filter: String,
    pub filename: Option<PathBuf>,
    pub mode: FileMode,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            severity: Severity::Debug,
            filter: "#".to_string(),
            filename: None,
            mode: FileMode::default(),
        }
    }
}

impl FileConfig {
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::default()
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }

    /// Opens the file according to the mode.
    pub fn build(&self) -> Result<FileHandler> {
        self.check()?.open()
    }

    /// Validates the filter and picks the file, touching nothing on disk.
    fn check(&self) -> Result<PendingFile> {
        let filter = TopicFilter::new(self.filter.as_str())?;
        let path = match &self.filename {
            Some(filename) => filename.clone(),
            None => generated_filename()?,
        };
        PendingFile::check(self.severity, filter, path, self.mode)
    }
}

/// Settings for a whole [`Logger`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoggerConfig {
    pub console: Option<ConsoleConfig>,
    pub files: Vec<FileConfig>,
    pub topic_method: DerivationMethod,
    pub template: Option<String>,
}

impl Default for LoggerConfig {
    /// A colored console on stderr-routing, no files, module-derived topics.
    fn default() -> Self {
        Self {
            console: Some(ConsoleConfig::default()),
            files: Vec::new(),
            topic_method: DerivationMethod::default(),
            template: None,
        }
    }
}

impl LoggerConfig {
    pub fn with_console(mut self, console: ConsoleConfig) -> Self {
        self.console = Some(console);
        self
    }

    pub fn without_console(mut self) -> Self {
        self.console = None;
        self
    }

    pub fn with_file(mut self, file: FileConfig) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_topic_method(mut self, method: DerivationMethod) -> Self {
        self.topic_method = method;
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /**
    Validates every setting and opens every file.

    Nothing on disk changes until every setting has been checked, so a configuration that
    fails leaves existing files as they were.
    */
    pub fn build(&self) -> Result<Logger> {
        let template = match &self.template {
            Some(template) => Template::new(template.as_str())?,
            None => Template::default(),
        };
        let console = self.console.as_ref().map(ConsoleConfig::build).transpose()?;
        let files = self
            .files
            .iter()
            .map(FileConfig::check)
            .collect::<Result<Vec<_>>>()?;
        claim_distinct(&files)?;

        let mut handlers: Vec<Arc<dyn Handler>> = Vec::new();
        if let Some(console) = console {
            handlers.push(Arc::new(console));
        }
        for file in files {
            handlers.push(Arc::new(file.open()?));
        }
        Logger::new(handlers)
            .with_derivation(self.topic_method)
            .with_template(template.as_str())
    }

    /// The default configuration, overridden by the `TOPICWISE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /**
    Like [`from_env`](Self::from_env), reading variables through `lookup`.

    ```
    use topicwise::config::LoggerConfig;
    use topicwise::Severity;

    let config = LoggerConfig::from_lookup(|key| match key {
        "TOPICWISE_LEVEL" => Some("2".to_string()),
        "TOPICWISE_COLOR" => Some("off".to_string()),
        _ => None,
    })
    .unwrap();
    let console = config.console.unwrap();
    assert_eq!(console.severity, Severity::Warning);
    assert!(!console.color);
    ```
    */
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let mut console = config.console.take().unwrap_or_default();
        if let Some(level) = lookup(LEVEL_ENV) {
            console.severity = parse_severity(&level)?;
        }
        if let Some(filter) = lookup(FILTER_ENV) {
            TopicFilter::new(filter.as_str())?;
            console.filter = filter;
        }
        if let Some(color) = lookup(COLOR_ENV) {
            console.color = parse_bool(COLOR_ENV, &color)?;
        }
        if let Some(use_stderr) = lookup(STDERR_ENV) {
            console.use_stderr = parse_bool(STDERR_ENV, &use_stderr)?;
        }
        if let Some(method) = lookup(TOPIC_METHOD_ENV) {
            config.topic_method = method.parse()?;
        }
        if let Some(template) = lookup(TEMPLATE_ENV) {
            Template::new(template.as_str())?;
            config.template = Some(template);
        }
        config.console = Some(console);
        Ok(config)
    }
}

/// Two handlers creating the same file: the second would find the first's file.
fn claim_distinct(files: &[PendingFile]) -> Result<()> {
    for (i, file) in files.iter().enumerate() {
        let creates = matches!(file.mode(), FileMode::Abort | FileMode::New);
        let shared = files[..i].iter().any(|earlier| earlier.path() == file.path());
        if creates && shared {
            return Err(Error::FileExists(file.path().to_path_buf()));
        }
    }
    Ok(())
}

/// A rank such as `3` or a name such as `error`.
fn parse_severity(value: &str) -> Result<Severity> {
    let value = value.trim();
    match value.parse::<i64>() {
        Ok(rank) => Severity::from_rank(rank),
        Err(_) => Severity::factory(value),
    }
}

fn parse_bool(argument: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidArgumentType {
            argument,
            expected: "a boolean (1, 0, true, false, yes, no, on, off)",
            found: value.to_string(),
        }),
    }
}
