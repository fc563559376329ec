// SPDX-License-Identifier: MIT OR Apache-2.0

use std::borrow::Borrow;
use std::fmt::{Debug, Display};

/**
The topic of a message: a dotted path such as `"net.Server.accept"`.

A topic is a tag, used by handlers to decide whether a message concerns them.  It is
either given explicitly or derived from the call site by a
[`TopicResolver`](crate::TopicResolver).  Any string is a valid topic, including the
empty one.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Topic(String);

impl Topic {
    pub fn new(topic: impl Into<String>) -> Self {
        Self(topic.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The dot-separated keys.  The empty topic has no keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let mut keys = self.0.split('.');
        if self.0.is_empty() {
            // split("") yields one empty key
            keys.next();
        }
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Joins keys with `.`.
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut topic = String::new();
        for (i, key) in keys.into_iter().enumerate() {
            if i > 0 {
                topic.push('.');
            }
            topic.push_str(key.as_ref());
        }
        Self(topic)
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Topic {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Topic {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Topic {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Topic {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/*
Boilerplate notes for Topic:

Copy is out, it owns a String.
Ord is lexicographic on the string; handy for sorting recorded topics in tests, and
consistent with Eq.
Borrow<str> is sound because Hash/Eq are those of the inner string.
*/
