use std::fmt;

/// Two-character escape generators use for a line break.
const ESCAPED_NEWLINE: &str = "\\n";

/// Text produced by a content generator, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText(String);

impl GeneratedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The text with escaped line breaks turned into real ones.
    pub fn normalized(&self) -> String {
        normalize(&self.0)
    }
}

impl fmt::Display for GeneratedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for GeneratedText {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GeneratedText {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Replace every literal `\n` (backslash, n) with a line break.
///
/// Idempotent: a line break is never re-escaped and a replacement cannot
/// form a new backslash-n pair, so a second pass finds nothing to do.
pub fn normalize(text: &str) -> String {
    text.replace(ESCAPED_NEWLINE, "\n")
}
