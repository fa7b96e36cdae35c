//! The failure marker carried by an absent [`Maybe`](super::Maybe)

use serde::{Deserialize, Serialize};
use std::fmt;

const HIGHLIGHT: &str = "\x1b[1;4;91m";
const NORMAL: &str = "\x1b[0;0m";

/// Marker for a failed or absent result, with an optional reason
///
/// `Display` highlights the message for a terminal; the alternate form
/// (`{:#}`) prints the same text without escape codes.
///
/// # Example
///
/// ```
/// use guarded_dsp::Empty;
///
/// assert_eq!(format!("{:#}", Empty::new()), "This is empty!");
/// assert_eq!(format!("{:#}", Empty::because("no samples")), "Empty since: no samples");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Empty {
    reason: String,
}

impl Empty {
    /// Empty without a reason
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty explained by `reason`
    pub fn because(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The reason, or `""` when none was given
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Whether a non-empty reason was supplied
    pub fn has_reason(&self) -> bool {
        !self.reason.is_empty()
    }

    /// Highlighted diagnostic message, same as `to_string()`
    pub fn to_diagnostic_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Empty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = if f.alternate() {
            ("", "")
        } else {
            (HIGHLIGHT, NORMAL)
        };
        if self.has_reason() {
            write!(f, "{open}Empty since{close}: {}", self.reason)
        } else {
            write!(f, "{open}This is empty{close}!")
        }
    }
}

impl std::error::Error for Empty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_reason() {
        let empty = Empty::new();
        assert!(!empty.has_reason());
        assert_eq!(empty.reason(), "");
        assert_eq!(
            empty.to_diagnostic_string(),
            "\x1b[1;4;91mThis is empty\x1b[0;0m!"
        );
    }

    #[test]
    fn test_with_reason() {
        let empty = Empty::because("division by zero");
        assert!(empty.has_reason());
        assert_eq!(
            empty.to_string(),
            "\x1b[1;4;91mEmpty since\x1b[0;0m: division by zero"
        );
        assert_eq!(format!("{:#}", empty), "Empty since: division by zero");
    }

    #[test]
    fn test_empty_string_reason_is_no_reason() {
        assert_eq!(Empty::because(""), Empty::new());
    }

    #[test]
    fn test_json_carries_plain_reason() {
        let empty = Empty::because("I/O error: missing file");
        let json = serde_json::to_string(&empty).unwrap();
        assert_eq!(json, r#"{"reason":"I/O error: missing file"}"#);
        assert_eq!(serde_json::from_str::<Empty>(&json).unwrap(), empty);
    }
}
