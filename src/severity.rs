// SPDX-License-Identifier: MIT OR Apache-2.0

//! The five severities and their cross-representation comparisons.
//!
//! A [`Severity`] compares against another severity, against an integer rank, or against
//! a severity name, interchangeably:
//!
//! ```
//! use topicwise::Severity;
//!
//! assert!(Severity::Warning == 2);
//! assert!(Severity::Warning == "WARNING");
//! assert!(Severity::Error > "info");
//! assert!(Severity::Debug < 4u8);
//! ```
//!
//! The right-hand operand is normalized with [`SeverityOperand::coerce`] first.  When it
//! does not name a severity (an out-of-range rank, an unknown name) every one of the six
//! operators returns `false`, including `!=`:
//!
//! ```
//! use topicwise::Severity;
//!
//! assert!(!(Severity::Info == 9));
//! assert!(!(Severity::Info != 9));
//! assert!(!(Severity::Info < "LOUD"));
//! ```

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[repr(u8)]
pub enum Severity {
    /// Detailed information used for diagnostics
    Debug = 0,
    /// Normal operation
    Info = 1,
    /// Something unexpected happened, the application keeps running
    Warning = 2,
    /// Part of the application malfunctioned
    Error = 3,
    /// The application is about to terminate
    Fatal = 4,
}

impl Severity {
    /// Every severity, indexed by rank.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Integer rank, `0` for DEBUG through `4` for FATAL.
    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Canonical uppercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    pub fn from_rank(rank: i64) -> Result<Self> {
        usize::try_from(rank)
            .ok()
            .and_then(|r| Self::ALL.get(r).copied())
            .ok_or_else(|| Error::InvalidSeverity(rank.to_string()))
    }

    /**
    Builds a severity from anything that can name one: a rank, a name (case-insensitive)
    or an existing severity.

    ```
    use topicwise::Severity;
    assert_eq!(Severity::factory(3).unwrap(), Severity::Error);
    assert_eq!(Severity::factory("fatal").unwrap(), Severity::Fatal);
    assert_eq!(Severity::factory(Severity::Info).unwrap(), Severity::Info);
    assert!(Severity::factory(5).is_err());
    ```
    */
    pub fn factory<T: SeverityOperand>(value: T) -> Result<Self> {
        value
            .coerce()
            .map(|rank| Self::ALL[rank as usize])
            .ok_or_else(|| Error::InvalidSeverity(value.describe()))
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::factory(s)
    }
}

impl TryFrom<i64> for Severity {
    type Error = Error;

    fn try_from(rank: i64) -> Result<Self> {
        Self::from_rank(rank)
    }
}

impl TryFrom<&str> for Severity {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        Self::factory(name)
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity.rank()
    }
}

/**
Anything a [`Severity`] can be compared against or built from.

`coerce` is the single normalization point: it returns the rank the value stands for, or
`None` when the value does not name a severity.
*/
pub trait SeverityOperand {
    fn coerce(&self) -> Option<u8>;

    /// How the value reads in an [`Error::InvalidSeverity`].
    fn describe(&self) -> String;
}

impl SeverityOperand for Severity {
    #[inline]
    fn coerce(&self) -> Option<u8> {
        Some(self.rank())
    }
    fn describe(&self) -> String {
        self.name().to_string()
    }
}

impl SeverityOperand for str {
    fn coerce(&self) -> Option<u8> {
        Severity::ALL
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(self))
            .map(|s| s.rank())
    }
    fn describe(&self) -> String {
        self.to_string()
    }
}

impl SeverityOperand for &str {
    fn coerce(&self) -> Option<u8> {
        (**self).coerce()
    }
    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl SeverityOperand for String {
    fn coerce(&self) -> Option<u8> {
        self.as_str().coerce()
    }
    fn describe(&self) -> String {
        self.clone()
    }
}

macro_rules! integer_operand {
    ($($t:ty),*) => {
        $(
            impl SeverityOperand for $t {
                #[inline]
                fn coerce(&self) -> Option<u8> {
                    u8::try_from(*self).ok().filter(|r| usize::from(*r) < Severity::ALL.len())
                }
                fn describe(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}
integer_operand!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/*
Cross-type comparisons.  Severity <-> Severity uses the derived impls; everything else
goes through coerce.  An operand that does not coerce is neither equal nor unequal, so
`ne` is written out instead of defaulting to `!eq`.
*/
macro_rules! compare_with {
    ($($t:ty),*) => {
        $(
            #[allow(clippy::partialeq_ne_impl)]
            impl PartialEq<$t> for Severity {
                #[inline]
                fn eq(&self, other: &$t) -> bool {
                    other.coerce() == Some(self.rank())
                }
                #[inline]
                fn ne(&self, other: &$t) -> bool {
                    matches!(other.coerce(), Some(rank) if rank != self.rank())
                }
            }

            impl PartialOrd<$t> for Severity {
                #[inline]
                fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
                    other.coerce().map(|rank| self.rank().cmp(&rank))
                }
            }
        )*
    };
}
compare_with!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, str, &str, String);

/// Deserializes from a name (any case) or a rank, like [`Severity::factory`].
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum SeverityRepr {
            Rank(i64),
            Name(String),
        }

        let severity = match SeverityRepr::deserialize(deserializer)? {
            SeverityRepr::Rank(rank) => Severity::from_rank(rank),
            SeverityRepr::Name(name) => Severity::factory(name),
        };
        severity.map_err(serde::de::Error::custom)
    }
}
