//! Strongly-typed dialect tag wrapper.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Identifier of a database engine's SQL variant (`"postgres"`, `"sqlite"`, ...).
///
/// The reserved tag `"default"` marks statement scripts that apply to any
/// dialect lacking a specific script of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DialectTag(String);

impl DialectTag {
    /// Tag of scripts that apply to every dialect.
    pub const DEFAULT: &'static str = "default";

    /// Create a tag, rejecting empty or non `[a-z0-9_]` input.
    pub fn new(tag: impl Into<String>) -> CoreResult<Self> {
        let s = tag.into();
        let valid = !s.is_empty()
            && s
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        if valid {
            Ok(Self(s))
        } else {
            Err(CoreError::InvalidDialectTag(s))
        }
    }

    /// The `"default"` tag.
    pub fn default_tag() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    /// Returns `true` for the `"default"` tag.
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    /// Return the underlying tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DialectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DialectTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for DialectTag {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DialectTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DialectTag {
    type Error = CoreError;
    fn try_from(s: String) -> CoreResult<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for DialectTag {
    type Error = CoreError;
    fn try_from(s: &str) -> CoreResult<Self> {
        Self::new(s)
    }
}

impl From<DialectTag> for String {
    fn from(tag: DialectTag) -> Self {
        tag.0
    }
}

impl PartialEq<str> for DialectTag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DialectTag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
