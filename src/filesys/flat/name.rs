//! Bounded entry names

use arrayvec::ArrayString;
use core::fmt;

use super::constants::{NAME_CAPACITY, NAME_FIELD_LEN};

/// A directory or file name of at most `NAME_CAPACITY` bytes.
///
/// Longer input is cut at the last character boundary that fits, both when
/// an entry is created and when one is looked up, so the same string always
/// names the same entry.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EntryName(ArrayString<NAME_CAPACITY>);

impl EntryName {
    pub fn new(name: &str) -> Self {
        let mut inner = ArrayString::new();
        for ch in name.chars() {
            if inner.try_push(ch).is_err() {
                break;
            }
        }
        Self(inner)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes a NUL-terminated on-disk name field.
    /// Bytes after the first invalid UTF-8 sequence are dropped.
    pub fn from_field(field: &[u8]) -> Self {
        let field = &field[..field.len().min(NAME_FIELD_LEN)];
        let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        let raw = &field[..end];
        let text = match core::str::from_utf8(raw) {
            Ok(text) => text,
            Err(err) => core::str::from_utf8(&raw[..err.valid_up_to()]).unwrap_or(""),
        };
        Self::new(text)
    }

    /// Encodes the name NUL-padded to the full field width
    pub fn to_field(&self) -> [u8; NAME_FIELD_LEN] {
        let mut field = [0u8; NAME_FIELD_LEN];
        let bytes = self.0.as_bytes();
        field[..bytes.len()].copy_from_slice(bytes);
        field
    }
}

impl fmt::Debug for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_are_cut_to_capacity() {
        let name = EntryName::new("averyverylongfilename.txt");
        assert_eq!(name.as_str(), "averyverylongfi");
        assert_eq!(name, EntryName::new("averyverylongfilename.md"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 14 ASCII bytes then a two-byte character that would straddle the limit
        let name = EntryName::new("abcdefghijklmné");
        assert_eq!(name.as_str(), "abcdefghijklmn");
    }

    #[test]
    fn field_stops_at_nul_and_bad_utf8() {
        let mut field = [0u8; NAME_FIELD_LEN];
        field[..5].copy_from_slice(b"notes");
        assert_eq!(EntryName::from_field(&field).as_str(), "notes");

        field[2] = 0xFF;
        assert_eq!(EntryName::from_field(&field).as_str(), "no");

        let full = [b'x'; NAME_FIELD_LEN];
        assert_eq!(EntryName::from_field(&full).as_str().len(), NAME_CAPACITY);
    }

    #[test]
    fn field_is_nul_terminated() {
        let field = EntryName::new("README.txt").to_field();
        assert_eq!(&field[..10], b"README.txt");
        assert!(field[10..].iter().all(|&b| b == 0));
    }
}
