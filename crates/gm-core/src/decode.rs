//! Text decoding for hand-edited data files.
//!
//! Tables are tried as UTF-8, UTF-8 with BOM, CP1252, and finally Latin-1,
//! which accepts every byte. The campaign-state file itself only accepts the
//! two UTF-8 forms ([`decode_utf8`]).

use std::borrow::Cow;
use std::fmt;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Which decoder produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Plain UTF-8.
    Utf8,
    /// UTF-8 preceded by a byte-order mark.
    Utf8Bom,
    /// Windows-1252.
    Cp1252,
    /// ISO-8859-1, the last resort.
    Latin1,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Bom => "utf-8-sig",
            Self::Cp1252 => "cp1252",
            Self::Latin1 => "latin-1",
        };
        f.write_str(s)
    }
}

/// Decode UTF-8, stripping a leading BOM. `None` if the bytes are not UTF-8.
pub fn decode_utf8(bytes: &[u8]) -> Option<(&str, Encoding)> {
    match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => std::str::from_utf8(rest).ok().map(|s| (s, Encoding::Utf8Bom)),
        None => std::str::from_utf8(bytes).ok().map(|s| (s, Encoding::Utf8)),
    }
}

/// Decode with the full fallback chain. Never fails.
pub fn decode_text(bytes: &[u8]) -> (Cow<'_, str>, Encoding) {
    if let Some((text, encoding)) = decode_utf8(bytes) {
        return (Cow::Borrowed(text), encoding);
    }
    if let Some(text) = decode_cp1252(bytes) {
        return (Cow::Owned(text), Encoding::Cp1252);
    }
    (Cow::Owned(decode_latin1(bytes)), Encoding::Latin1)
}

/// CP1252 code points for 0x80-0x9F. Zero marks the five undefined bytes.
const CP1252_HIGH: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0, 0x017D, 0, 0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, 0x02DC,
    0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

/// Strict CP1252: fails on the undefined bytes 0x81, 0x8D, 0x8F, 0x90, 0x9D.
pub fn decode_cp1252(bytes: &[u8]) -> Option<String> {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => match CP1252_HIGH[usize::from(b - 0x80)] {
                0 => None,
                cp => char::from_u32(cp),
            },
            _ => Some(char::from(b)),
        })
        .collect()
}

/// Latin-1: every byte maps to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
