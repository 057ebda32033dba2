//! Core type definitions for the attribute engine.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::error::{AttrError, AttrResult};

/// Longest attribute name the engine accepts, in bytes (the kernel's
/// per-name limit on Linux).
pub const MAX_NAME_LEN: usize = 255;

/// A validated, namespace-prefixed attribute name.
///
/// Names are non-empty, NUL-free, at most [`MAX_NAME_LEN`] bytes, and
/// carry a `prefix.rest` shape with a non-empty prefix and remainder
/// (`user.comment`, `trusted.overlay.opaque`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrName(String);

impl AttrName {
    pub fn new(name: impl Into<String>) -> AttrResult<Self> {
        let name = name.into();
        if name.is_empty()
            || name.len() > MAX_NAME_LEN
            || name.contains('\0')
            || !name
                .split_once('.')
                .is_some_and(|(prefix, rest)| !prefix.is_empty() && !rest.is_empty())
        {
            return Err(AttrError::InvalidName { name });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The namespace portion of the name (`user` in `user.comment`).
    pub fn namespace(&self) -> &str {
        self.0.split_once('.').map(|(p, _)| p).unwrap_or(&self.0)
    }
}

impl fmt::Display for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AttrName {
    type Err = AttrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Display form of an attribute value.
///
/// Values are opaque bytes; classification only decides how a row is
/// rendered, never how it is stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueDisplay {
    /// UTF-8 made of printable characters and common whitespace.
    Text(String),
    /// Everything else, rendered with backslash escapes.
    Binary(String),
}

impl ValueDisplay {
    pub fn classify(value: &[u8]) -> Self {
        match std::str::from_utf8(value) {
            Ok(s) if s.chars().all(is_display_char) => Self::Text(s.to_string()),
            _ => Self::Binary(escape_bytes(value)),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Binary(s) => s,
        }
    }
}

fn is_display_char(c: char) -> bool {
    !c.is_control() || matches!(c, '\t' | '\n' | '\r')
}

fn escape_bytes(value: &[u8]) -> String {
    let mut out = String::with_capacity(value.len() * 2);
    for &b in value {
        match b {
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{b:02x}");
            }
        }
    }
    out
}

/// One attribute row in a snapshot: name, exact value bytes, and the
/// rendering computed from them.
#[derive(Clone, Debug)]
pub struct AttrEntry {
    name: AttrName,
    value: Vec<u8>,
    display: ValueDisplay,
}

impl AttrEntry {
    pub(crate) fn new(name: AttrName, value: Vec<u8>) -> Self {
        let display = ValueDisplay::classify(&value);
        Self {
            name,
            value,
            display,
        }
    }

    pub fn name(&self) -> &AttrName {
        &self.name
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn is_text(&self) -> bool {
        self.display.is_text()
    }

    pub fn display_text(&self) -> &str {
        self.display.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_namespaced_names() {
        for name in ["user.comment", "trusted.overlay.opaque", "security.selinux"] {
            assert!(AttrName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_names() {
        for name in ["", "nodot", ".comment", "user.", "user\0.x"] {
            assert!(
                matches!(AttrName::new(name), Err(AttrError::InvalidName { .. })),
                "{name:?} should be invalid"
            );
        }
    }

    #[test]
    fn rejects_overlong_name() {
        let name = format!("user.{}", "a".repeat(MAX_NAME_LEN));
        assert!(matches!(
            AttrName::new(name),
            Err(AttrError::InvalidName { .. })
        ));
    }

    #[test]
    fn namespace_accessor() {
        let name = AttrName::new("user.color").unwrap();
        assert_eq!(name.namespace(), "user");
        assert_eq!(name.as_str(), "user.color");
    }

    #[test]
    fn classifies_text() {
        let display = ValueDisplay::classify(b"red\n");
        assert!(display.is_text());
        assert_eq!(display.as_str(), "red\n");
    }

    #[test]
    fn empty_value_is_text() {
        let display = ValueDisplay::classify(b"");
        assert!(display.is_text());
        assert_eq!(display.as_str(), "");
    }

    #[test]
    fn classifies_binary_with_escapes() {
        let display = ValueDisplay::classify(&[0x00, b'a', 0xff, b'\\']);
        assert!(!display.is_text());
        assert_eq!(display.as_str(), "\\x00a\\xff\\\\");
    }

    #[test]
    fn control_bytes_are_binary() {
        let display = ValueDisplay::classify(b"bell\x07");
        assert!(!display.is_text());
        assert_eq!(display.as_str(), "bell\\x07");
    }

    #[test]
    fn entry_preserves_exact_bytes() {
        let name = AttrName::new("user.blob").unwrap();
        let entry = AttrEntry::new(name, vec![0x01, 0x02, 0xfe]);
        assert_eq!(entry.value(), &[0x01, 0x02, 0xfe]);
        assert!(!entry.is_text());
    }
}
