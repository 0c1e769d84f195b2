//! Keystroke-level filtering for the free-text numeric fields.
//!
//! Every edit moves the field through `pending text → {valid partial, rejected}`.
//! A rejected edit restores the last valid partial, so the field never holds
//! text that could not grow into a number.

use log::trace;

/// The permissive partial-number grammar: `[+-]? digit* ('.' digit*)?`.
///
/// Accepts in-progress entries such as `""`, `"-"`, `"2."` and `".5"`.
pub struct PartialNumber;

impl PartialNumber {
    pub fn matches(text: &str) -> bool {
        let body = text.strip_prefix(['+', '-']).unwrap_or(text);
        let mut parts = body.splitn(2, '.');
        let int = parts.next().unwrap_or("");
        let frac = parts.next().unwrap_or("");
        let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        digits(int) && digits(frac)
    }

    /// Comma-to-dot normalization applied before matching.
    pub fn normalize(text: &str) -> String {
        text.replace(',', ".")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The normalized text was kept.
    ValidPartial,
    /// The edit was undone; the field holds its last valid partial again.
    Rejected,
}

/// A text field that only ever holds a valid partial number, plus its invalid marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericInput {
    text: String,
    invalid: bool,
}

impl NumericInput {
    pub fn new(initial: &str) -> Self {
        let mut input = Self::default();
        input.edit(initial);
        input
    }

    /// Apply the field's new raw text. Always clears the invalid marker.
    pub fn edit(&mut self, raw: &str) -> EditOutcome {
        self.invalid = false;
        let pending = PartialNumber::normalize(raw);
        if PartialNumber::matches(&pending) {
            self.text = pending;
            EditOutcome::ValidPartial
        } else {
            trace!("rejected {:?}, keeping {:?}", raw, self.text);
            EditOutcome::Rejected
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn set_invalid(&mut self, invalid: bool) {
        self.invalid = invalid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_number_rule() {
        for ok in ["", "-", "+", "2", "2.", "2.5", "-2.5", ".5", "-.", "007"] {
            assert!(PartialNumber::matches(ok), "{:?} should match", ok);
        }
        for bad in ["a", "2a", "2.5.", "--1", "1-", " 1", "1e3", "+-1"] {
            assert!(!PartialNumber::matches(bad), "{:?} should not match", bad);
        }
    }

    #[test]
    fn test_typing_sequence() {
        let mut input = NumericInput::default();
        for (raw, expected) in [("-", "-"), ("-2", "-2"), ("-2,", "-2."), ("-2.5", "-2.5")] {
            assert_eq!(input.edit(raw), EditOutcome::ValidPartial);
            assert_eq!(input.text(), expected);
        }
    }

    #[test]
    fn test_reject_reverts() {
        let mut input = NumericInput::new("2.5");
        assert_eq!(input.edit("2.5x"), EditOutcome::Rejected);
        assert_eq!(input.text(), "2.5");
        assert_eq!(input.edit("2.5,"), EditOutcome::Rejected);
        assert_eq!(input.text(), "2.5");
        // pasted garbage also falls back to the last valid partial
        assert_eq!(input.edit("abc"), EditOutcome::Rejected);
        assert_eq!(input.text(), "2.5");
    }

    #[test]
    fn test_edit_clears_invalid() {
        let mut input = NumericInput::new("9");
        input.set_invalid(true);
        input.edit("x");
        assert!(!input.is_invalid());
    }

    #[test]
    fn test_comma_normalizes() {
        let mut input = NumericInput::default();
        input.edit("2,5");
        assert_eq!(input.text(), "2.5");
    }
}
