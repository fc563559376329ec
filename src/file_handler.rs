// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appending messages to a file.
//!
//! A [`FileHandler`] settles which file it writes to when it is constructed, according
//! to a [`FileMode`], and afterwards only appends.  Every write opens the file, appends
//! the rendered message and closes it again, so the file can be moved or inspected
//! between messages.
//!
//! ```
//! use topicwise::{FileHandler, FileMode, Handler, Message, Severity, Topic, TopicFilter};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("log.txt");
//! std::fs::write(&path, "old").unwrap();
//!
//! let handler =
//!     FileHandler::new(Severity::Info, TopicFilter::all(), &path, FileMode::New).unwrap();
//! assert_eq!(handler.path(), dir.path().join("log_1.txt"));
//! handler.emit(&Message::new("B", Severity::Info, Topic::new("t"))).unwrap();
//! assert_eq!(std::fs::read_to_string(handler.path()).unwrap(), "[INFO] t\nB\n\n");
//! ```

use crate::error::{Error, ModeKind, Result};
use crate::filter::TopicFilter;
use crate::handler::Handler;
use crate::message::Message;
use crate::severity::Severity;
use std::ffi::OsString;
use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

/// Topic of the messages a file handler logs about itself.
pub const FILE_HANDLER_TOPIC: &str = "topicwise.file_handler";

/// What to do when the log file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FileMode {
    /// Truncate it.
    Overwrite,
    /// Truncate it, logging a WARNING through the global logger first.
    OverwriteWarn,
    /// Fail with [`Error::FileExists`].
    #[default]
    Abort,
    /// Keep its contents and append after them.
    Append,
    /// Leave it alone and use `name_1.ext`, `name_2.ext`, ..., the first that is free.
    New,
}

impl FileMode {
    pub const ALL: [FileMode; 5] = [
        FileMode::Overwrite,
        FileMode::OverwriteWarn,
        FileMode::Abort,
        FileMode::Append,
        FileMode::New,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FileMode::Overwrite => "overwrite",
            FileMode::OverwriteWarn => "overwrite-warn",
            FileMode::Abort => "abort",
            FileMode::Append => "append",
            FileMode::New => "new",
        }
    }
}

impl Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for FileMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| Error::UnrecognizedMode {
                kind: ModeKind::FileMode,
                value: s.to_string(),
                expected: "overwrite, overwrite-warn, abort, append or new",
            })
    }
}

/// A handler that appends rendered messages to a file.
#[derive(Debug, Clone)]
pub struct FileHandler {
    min_severity: Severity,
    filter: TopicFilter,
    path: PathBuf,
}

impl FileHandler {
    /**
    Opens `path` according to `mode`.

    Fails with [`Error::FileExists`] for [`FileMode::Abort`] when the file exists, and with
    [`Error::Io`] when the file cannot be created.
    */
    pub fn new(
        min_severity: Severity,
        filter: TopicFilter,
        path: impl Into<PathBuf>,
        mode: FileMode,
    ) -> Result<Self> {
        PendingFile::check(min_severity, filter, path.into(), mode)?.open()
    }

    /// Like [`new`](Self::new), writing to [`generated_filename`] in the working directory.
    pub fn with_generated_name(
        min_severity: Severity,
        filter: TopicFilter,
        mode: FileMode,
    ) -> Result<Self> {
        Self::new(min_severity, filter, generated_filename()?, mode)
    }

    /// The file actually written, which differs from the requested one under [`FileMode::New`].
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/**
A file handler whose target has been chosen and checked, with nothing on disk changed yet.

[`LoggerConfig::build`](crate::config::LoggerConfig::build) checks every file before it
opens any.
*/
#[derive(Debug)]
pub(crate) struct PendingFile {
    min_severity: Severity,
    filter: TopicFilter,
    path: PathBuf,
    mode: FileMode,
}

impl PendingFile {
    pub(crate) fn check(
        min_severity: Severity,
        filter: TopicFilter,
        path: PathBuf,
        mode: FileMode,
    ) -> Result<Self> {
        let path = match mode {
            FileMode::Abort if path.symlink_metadata().is_ok() => {
                return Err(Error::FileExists(path));
            }
            FileMode::New => unique_path(path),
            _ => path,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(Error::io(&path, std::io::Error::from(ErrorKind::NotFound)));
            }
        }
        Ok(Self {
            min_severity,
            filter,
            path,
            mode,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn mode(&self) -> FileMode {
        self.mode
    }

    /// Applies the mode to the file and builds the handler.
    pub(crate) fn open(self) -> Result<FileHandler> {
        prepare(&self.path, self.mode)?;
        Ok(FileHandler {
            min_severity: self.min_severity,
            filter: self.filter,
            path: self.path,
        })
    }
}

impl Handler for FileHandler {
    fn min_severity(&self) -> Severity {
        self.min_severity
    }

    fn filter(&self) -> &TopicFilter {
        &self.filter
    }

    fn write(&self, message: &Message) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;
        file.write_all(message.render().as_bytes())
            .map_err(|e| Error::io(&self.path, e))
    }
}

/// `log_` followed by the current UTC time in ISO-8601 form.
pub fn generated_filename() -> Result<PathBuf> {
    let now = OffsetDateTime::now_utc()
        .format(&Iso8601::DEFAULT)
        .map_err(|e| Error::io("log_", std::io::Error::other(e)))?;
    Ok(PathBuf::from(format!("log_{now}")))
}

fn prepare(path: &Path, mode: FileMode) -> Result<()> {
    match mode {
        FileMode::Overwrite => truncate(path),
        FileMode::OverwriteWarn => {
            if path.is_file() {
                // the logger reports its own failures; construction goes on regardless
                let _ = crate::global_logger::global_logger().warning(
                    format!(
                        "The file {} already exists, its contents will be erased",
                        path.display()
                    ),
                    Some(FILE_HANDLER_TOPIC),
                    None,
                );
            }
            truncate(path)
        }
        // New has already picked a free name; both refuse to touch an existing file
        FileMode::Abort | FileMode::New => create_new(path),
        FileMode::Append => OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map(drop)
            .map_err(|e| Error::io(path, e)),
    }
}

fn truncate(path: &Path) -> Result<()> {
    File::create(path).map(drop).map_err(|e| Error::io(path, e))
}

fn create_new(path: &Path) -> Result<()> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(Error::FileExists(path.to_path_buf()))
        }
        Err(e) => Err(Error::io(path, e)),
    }
}

/// The requested path if free, otherwise the first free `stem_N.ext` for N = 1, 2, ...
fn unique_path(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let stem = path.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
    let extension = path.extension().map(|e| e.to_os_string());
    (1u64..)
        .map(|n| {
            let mut name = OsString::from(&stem);
            name.push(format!("_{n}"));
            if let Some(extension) = &extension {
                name.push(".");
                name.push(extension);
            }
            path.with_file_name(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}
