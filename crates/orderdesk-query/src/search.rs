//! Free-text search sanitization.
//!
//! Search input ends up inside pattern-matching queries, so it passes two
//! gates: an allow-list of characters (Unicode letters and digits for
//! localized text, whitespace, hyphen, underscore, dot) and metacharacter
//! escaping so the accepted string always matches literally. Anything outside
//! the allow-list is a hard rejection, not a silent drop.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use orderdesk_core::AppError;

/// Maximum accepted search term length, in characters.
pub const MAX_SEARCH_CHARS: usize = 100;

static ALLOWED_SEARCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}\s._-]+$").expect("valid search allow-list regex"));

/// An accepted search term.
///
/// `text` is the trimmed, validated input; `pattern` is the same string with
/// every regex metacharacter escaped, safe to hand to a pattern-matching
/// repository. Re-normalizing `text` yields an identical term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerm {
    pub text: String,
    pub pattern: String,
}

/// Sanitize free-text search input.
///
/// Trims the input; an empty result means "no search" rather than an error.
pub fn sanitize_search(raw: &str) -> Result<Option<SearchTerm>, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_SEARCH_CHARS {
        return Err(AppError::Validation("search term is too long".to_string()));
    }
    if !ALLOWED_SEARCH.is_match(trimmed) {
        return Err(AppError::Validation(
            "search term contains unsupported characters".to_string(),
        ));
    }
    Ok(Some(SearchTerm {
        text: trimmed.to_string(),
        pattern: regex::escape(trimmed),
    }))
}
