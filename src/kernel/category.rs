//! Coarse classification of byte values for distribution reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Character class of a byte value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ByteCategory {
    /// `A`..=`Z`.
    Uppercase,
    /// `a`..=`z`.
    Lowercase,
    /// `0`..=`9`.
    Digit,
    /// `0x20`.
    Space,
    /// Any other printable ASCII byte.
    Punctuation,
    /// `0x09`.
    Tab,
    /// `0x0A`.
    Newline,
    /// Remaining bytes below `0x80`.
    Control,
    /// `0x80`..=`0xFF`: multi-byte leads and continuations.
    Extended,
}

impl ByteCategory {
    /// Classify one byte value.
    pub fn classify(byte: u8) -> Self {
        match byte {
            b'A'..=b'Z' => ByteCategory::Uppercase,
            b'a'..=b'z' => ByteCategory::Lowercase,
            b'0'..=b'9' => ByteCategory::Digit,
            b' ' => ByteCategory::Space,
            0x21..=0x7E => ByteCategory::Punctuation,
            b'\t' => ByteCategory::Tab,
            b'\n' => ByteCategory::Newline,
            0x80..=0xFF => ByteCategory::Extended,
            _ => ByteCategory::Control,
        }
    }

    /// Display name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            ByteCategory::Uppercase => "Uppercase",
            ByteCategory::Lowercase => "Lowercase",
            ByteCategory::Digit => "Digit",
            ByteCategory::Space => "Space",
            ByteCategory::Punctuation => "Punctuation",
            ByteCategory::Tab => "Tab",
            ByteCategory::Newline => "Newline",
            ByteCategory::Control => "Control",
            ByteCategory::Extended => "Extended",
        }
    }
}

impl fmt::Display for ByteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
