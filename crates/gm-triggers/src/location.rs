//! Location tokens and keyword matching.
//!
//! Tokens are free-form ("solitude blue palace", "dustmans_silver_hand_camp").
//! They are lower-cased and `_`/`-` become spaces before matching.

use serde_json::Value;

/// How a keyword is compared against a location token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Either string contains the other, ignoring case.
    ///
    /// This is deliberately loose: `"keep"` hits any token mentioning a keep,
    /// and a one-letter token is contained in most keywords.
    #[default]
    Coarse,
    /// The keyword must appear as a whole-word run inside the token.
    Exact,
}

/// A normalised location token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationToken {
    raw: String,
    normalized: String,
}

impl LocationToken {
    /// Parse a token. Empty or whitespace-only input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            normalized,
        })
    }

    /// Parse a JSON token. Anything but a non-empty string yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(Self::parse)
    }

    /// The token as given.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The lower-cased, space-separated form used for matching.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Match one keyword under the given mode.
    pub fn matches(&self, keyword: &str, mode: MatchMode) -> bool {
        let keyword = normalize(keyword);
        if keyword.is_empty() {
            return false;
        }
        match mode {
            MatchMode::Coarse => {
                self.normalized.contains(&keyword) || keyword.contains(&self.normalized)
            }
            MatchMode::Exact => {
                format!(" {} ", self.normalized).contains(&format!(" {keyword} "))
            }
        }
    }

    /// True if any keyword matches.
    pub fn matches_any<S: AsRef<str>>(&self, keywords: &[S], mode: MatchMode) -> bool {
        keywords.iter().any(|k| self.matches(k.as_ref(), mode))
    }

    /// True if every keyword matches (and there is at least one).
    pub fn matches_all<S: AsRef<str>>(&self, keywords: &[S], mode: MatchMode) -> bool {
        !keywords.is_empty() && keywords.iter().all(|k| self.matches(k.as_ref(), mode))
    }
}

/// Lower-case, turn `_` and `-` into spaces, and collapse runs of whitespace.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
