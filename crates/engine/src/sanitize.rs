//! Response sanitizer — rewrites model self-identification to the
//! configured alias.
//!
//! Pure text transform over a fixed, case-insensitive token set. Idempotent
//! as long as the alias itself does not match the pattern (the default
//! alias does not).

use regex::Regex;
use std::sync::OnceLock;

/// Disallowed self-identification tokens: "chat gpt"/"chatgpt",
/// "open ai"/"openai", and "gpt"/"gpt-<digits>" on word boundaries.
fn identity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(chat\s?gpt|open\s?ai|openai|gpt-?\d*)\b")
            .expect("identity pattern must compile")
    })
}

/// Replace every disallowed token in `text` with `alias`.
/// Unrelated text is untouched.
pub fn sanitize(text: &str, alias: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    identity_pattern().replace_all(text, alias).into_owned()
}
