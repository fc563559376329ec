// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic filters.
//!
//! A filter is a dotted pattern compiled once into a predicate over [`Topic`]s.  Two
//! wildcards are recognised:
//!
//! | token | matches                                                            |
//! |-------|--------------------------------------------------------------------|
//! | `*`   | exactly one key (one or more characters, no dot)                   |
//! | `#`   | zero or more characters, dots included, so any number of keys      |
//!
//! Every other character is literal.  `*` may share a key with literal text, so `key*`
//! matches `key1` and `keyring`.
//!
//! # Prefix matching
//!
//! A filter matches when it matches *the beginning* of the topic.  It is not a
//! whole-topic glob:
//!
//! ```
//! use topicwise::{Topic, TopicFilter};
//!
//! let filter = TopicFilter::new("key3.key2").unwrap();
//! assert!(filter.matches(&Topic::new("key3.key2")));
//! assert!(filter.matches(&Topic::new("key3.key2.key1")));
//! ```
//!
//! Existing filters depend on this: `net` selects everything under `net.`, without a
//! trailing `#`.  Note that it also selects `network`, since the match is on characters
//! and not on whole keys.  End a filter with `.#` or `.*` to require a key boundary.

use crate::error::{Error, ModeKind, Result};
use crate::topic::Topic;
use regex::Regex;
use std::fmt::Display;

const ONE_KEY: &str = "[^.]+";
const ANY_KEYS: &str = ".*";

/// A compiled topic filter.  See the [module documentation](self) for the grammar.
#[derive(Debug, Clone)]
pub struct TopicFilter {
    pattern: String,
    compiled: Regex,
}

impl TopicFilter {
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let compiled = Regex::new(&compile(&pattern)).map_err(|e| Error::UnrecognizedMode {
            kind: ModeKind::Pattern,
            value: format!("{pattern} ({e})"),
            expected: "dotted keys with * and # wildcards",
        })?;
        Ok(Self { pattern, compiled })
    }

    /// The filter that accepts every topic, `#`.
    pub fn all() -> Self {
        Self::new("#").expect("'#' always compiles")
    }

    /// The filter string this was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True when the filter matches starting at the first character of `topic`.
    #[inline]
    pub fn matches(&self, topic: &Topic) -> bool {
        self.compiled.is_match(topic.as_str())
    }
}

/// Translates a filter into an anchored-at-start regular expression.
fn compile(pattern: &str) -> String {
    // (?s): `#` spans any character, newlines included
    let mut re = String::with_capacity(pattern.len() * 2 + 5);
    re.push_str("(?s)^");
    let mut literal = String::new();
    let mut last_was_any = false;
    for c in pattern.chars() {
        match c {
            '*' | '#' => {
                re.push_str(&regex::escape(&literal));
                literal.clear();
                if c == '*' {
                    re.push_str(ONE_KEY);
                    last_was_any = false;
                } else if !last_was_any {
                    //adjacent # collapse
                    re.push_str(ANY_KEYS);
                    last_was_any = true;
                }
            }
            _ => {
                literal.push(c);
                last_was_any = false;
            }
        }
    }
    re.push_str(&regex::escape(&literal));
    re
}

impl Default for TopicFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl PartialEq for TopicFilter {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for TopicFilter {}

impl Display for TopicFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl std::str::FromStr for TopicFilter {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
