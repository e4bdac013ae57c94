//! Noise removal for scraped restaurant names.

use std::sync::LazyLock;

use regex::Regex;

/// "verified 3 weeks ago" and anything after it.
static VERIFIED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)verified.*").expect("valid regex"));

/// "No longer Halal" status banner and anything after it.
static NO_LONGER_HALAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)No longer Halal.*").expect("valid regex"));

static PARENTHESIZED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid regex"));

/// Strips verification timestamps, status annotations and parenthetical
/// asides, then trims.
///
/// Passes repeat until nothing changes, so removing `(...)` can never leave
/// behind a fresh "verified" that a second call would strip.
pub fn clean(raw: &str) -> String {
    let mut current = clean_once(raw);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(raw: &str) -> String {
    let text = VERIFIED_RE.replace(raw, "");
    let text = NO_LONGER_HALAL_RE.replace(&text, "");
    let text = PARENTHESIZED_RE.replace_all(&text, "");
    text.trim().to_string()
}
