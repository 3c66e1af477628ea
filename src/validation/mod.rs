//! Input Safety Validation
//!
//! Allow-list predicates applied to untrusted usernames and email addresses
//! before they reach storage or rendering.
//!
//! Both predicates are pure: no I/O, no panics, always a `bool`.
//!
//! - Usernames are limited to `[A-Za-z0-9_.-]` with 3 to 30 characters. This
//!   keeps quotes, semicolons and whitespace (and therefore SQL payloads) out.
//!   It is a lexical check only, so `admin.or.1-1` is accepted.
//! - Emails must look like `local@domain.tld`, with no `@` or whitespace in
//!   either part and at least one `.` after the `@`.
//! - Both reject any case-insensitive `<script ...> ... </script>` pair, even
//!   when it spans several lines.

use regex::Regex;
use std::sync::LazyLock;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.\-]{3,30}$").expect("username pattern is valid"));

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

// `s` lets `.` cross newlines, `i` makes the tag match case-insensitive.
static SCRIPT_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?>.*?</script>").expect("script pattern is valid"));

/// Returns `true` when `username` is safe to store and render.
pub fn is_safe_username(username: &str) -> bool {
    USERNAME_PATTERN.is_match(username) && !contains_script(username)
}

/// Returns `true` when `email` is safe to store and render.
pub fn is_safe_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email) && !contains_script(email)
}

fn contains_script(input: &str) -> bool {
    SCRIPT_TAG_PATTERN.is_match(input)
}
