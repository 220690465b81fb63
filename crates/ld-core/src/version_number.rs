//! Validated schema version numbers.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// A schema version: a non-negative integer.
///
/// Version 0 is the unversioned baseline every controlled database starts
/// from. Construction from a negative integer or from text that is not a
/// non-negative integer fails with [`CoreError::InvalidVersionNumber`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionNumber(u64);

impl VersionNumber {
    /// The baseline version of every repository.
    pub const ZERO: VersionNumber = VersionNumber(0);

    /// Create a version number from a signed integer, rejecting negatives.
    pub fn new(value: i64) -> CoreResult<Self> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| CoreError::InvalidVersionNumber {
                value: value.to_string(),
                reason: "version numbers cannot be negative".to_string(),
            })
    }

    /// Return the numeric value.
    pub fn value(self) -> u64 {
        self.0
    }

    /// The version immediately after this one.
    pub fn next(self) -> CoreResult<Self> {
        self + 1
    }
}

impl From<u32> for VersionNumber {
    fn from(value: u32) -> Self {
        Self(u64::from(value))
    }
}

impl From<u64> for VersionNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<VersionNumber> for u64 {
    fn from(v: VersionNumber) -> Self {
        v.0
    }
}

impl TryFrom<i64> for VersionNumber {
    type Error = CoreError;
    fn try_from(value: i64) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl FromStr for VersionNumber {
    type Err = CoreError;

    /// Parse a decimal string. Leading zeros are accepted so `"007"` parses
    /// as 7; signs, whitespace and the empty string are rejected.
    fn from_str(s: &str) -> CoreResult<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidVersionNumber {
                value: s.to_string(),
                reason: "expected a non-negative integer".to_string(),
            });
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|e| CoreError::InvalidVersionNumber {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl TryFrom<&str> for VersionNumber {
    type Error = CoreError;
    fn try_from(s: &str) -> CoreResult<Self> {
        s.parse()
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add<u64> for VersionNumber {
    type Output = CoreResult<VersionNumber>;
    fn add(self, rhs: u64) -> CoreResult<VersionNumber> {
        self.0
            .checked_add(rhs)
            .map(VersionNumber)
            .ok_or(CoreError::VersionOverflow {
                augend: self.0,
                addend: rhs,
            })
    }
}

impl Add for VersionNumber {
    type Output = CoreResult<VersionNumber>;
    fn add(self, rhs: VersionNumber) -> CoreResult<VersionNumber> {
        self + rhs.0
    }
}

impl Sub<u64> for VersionNumber {
    type Output = CoreResult<VersionNumber>;
    fn sub(self, rhs: u64) -> CoreResult<VersionNumber> {
        self.0
            .checked_sub(rhs)
            .map(VersionNumber)
            .ok_or(CoreError::VersionUnderflow {
                minuend: self.0,
                subtrahend: rhs,
            })
    }
}

impl Sub for VersionNumber {
    type Output = CoreResult<VersionNumber>;
    fn sub(self, rhs: VersionNumber) -> CoreResult<VersionNumber> {
        self - rhs.0
    }
}

impl PartialEq<u64> for VersionNumber {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<u64> for VersionNumber {
    fn partial_cmp(&self, other: &u64) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

#[cfg(test)]
#[path = "version_number_test.rs"]
mod tests;
