//! Truncation heuristic for the continuation controller.
//!
//! A reply is considered truncated when it is non-empty and its trimmed
//! form does not end with a sentence-terminating punctuation mark. The
//! heuristic is intentionally simple; the continuation budget bounds how
//! often it can fire.

/// The fixed follow-up instruction sent when a reply looks truncated.
pub const CONTINUE_INSTRUCTION: &str = "Please continue the previous response.";

/// Whether `text` looks like it was cut off before completion.
pub fn looks_truncated(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    !matches!(trimmed.chars().last(), Some('.' | '!' | '?'))
}
