//! Location identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, opaque identity of a location, assigned by the catalog store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub i64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when parsing an invalid location code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location code: {reason}")]
pub struct InvalidLocationCode {
    reason: &'static str,
}

/// A globally unique, human-readable location code (e.g. "IST", "TAK").
///
/// Codes are 1 to 16 characters of uppercase ASCII letters, digits and
/// underscores. A code that parses is merely well-formed; whether it names a
/// known location is decided by the directory at resolution time.
///
/// Codes are immutable once assigned — cached route results join on them.
///
/// # Examples
///
/// ```
/// use route_server::domain::LocationCode;
///
/// let ist = LocationCode::parse("IST").unwrap();
/// assert_eq!(ist.as_str(), "IST");
///
/// // Lowercase is rejected
/// assert!(LocationCode::parse("ist").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LocationCode(String);

impl LocationCode {
    /// Maximum accepted code length.
    pub const MAX_LEN: usize = 16;

    /// Parse a location code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidLocationCode> {
        if s.is_empty() {
            return Err(InvalidLocationCode {
                reason: "must not be empty",
            });
        }

        if s.len() > Self::MAX_LEN {
            return Err(InvalidLocationCode {
                reason: "must be at most 16 characters",
            });
        }

        for b in s.bytes() {
            if !(b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_') {
                return Err(InvalidLocationCode {
                    reason: "must be uppercase ASCII letters, digits or '_'",
                });
            }
        }

        Ok(LocationCode(s.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationCode({})", self.0)
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for LocationCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LocationCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        LocationCode::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A named place reachable by scheduled transportation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Stable identity.
    pub id: LocationId,

    /// Display name (e.g. "Istanbul Airport").
    pub name: String,

    /// Country the location is in.
    pub country: String,

    /// City the location is in.
    pub city: String,

    /// Unique code, immutable once assigned.
    pub code: LocationCode,
}
