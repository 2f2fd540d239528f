//! Identifier read from the `/users/view/{id}` route.
//!
//! The route reader never fails: a malformed segment is treated the same as a
//! missing one, which simply suppresses the fetch.

use std::fmt;

/// Maximum accepted identifier length, in characters.
pub const RECORD_KEY_MAX: usize = 128;

/// Identifier of the user record shown on the detail page.
///
/// ## Invariants
/// - Non-empty, no surrounding whitespace, at most [`RECORD_KEY_MAX`] chars.
/// - Contains neither `/` nor control characters, so it can be embedded in an
///   upstream path segment verbatim.
///
/// # Examples
/// ```
/// use user_console::domain::RecordKey;
///
/// assert!(RecordKey::from_route(Some("42")).is_some());
/// assert!(RecordKey::from_route(Some("  ")).is_none());
/// assert!(RecordKey::from_route(None).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey(String);

impl RecordKey {
    /// Parse a raw route segment, returning `None` when absent or malformed.
    pub fn from_route(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        if raw.is_empty() || raw.trim() != raw {
            return None;
        }
        if raw.chars().count() > RECORD_KEY_MAX {
            return None;
        }
        if raw.chars().any(|c| c == '/' || c.is_control()) {
            return None;
        }
        Some(Self(raw.to_owned()))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Cache key used by the fetch layer, mirroring the upstream path.
    pub fn cache_path(&self) -> String {
        format!("/users/{}", self.0)
    }
}

impl AsRef<str> for RecordKey {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
