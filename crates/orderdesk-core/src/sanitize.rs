//! Text sanitization for user-controlled strings headed for storage or HTML
//! rendering: entity escaping, length capping, and phone normalization.

use crate::config::PhoneRegion;

/// Maximum stored length of a payment method label.
pub const PAYMENT_MAX_CHARS: usize = 50;
/// Maximum stored length of an email address.
pub const EMAIL_MAX_CHARS: usize = 100;
/// Maximum stored length of a delivery address.
pub const ADDRESS_MAX_CHARS: usize = 200;
/// Maximum stored length of an order comment.
pub const COMMENT_MAX_CHARS: usize = 1000;

/// Escape HTML-significant characters so the string renders as literal text.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Cap a string at `max_chars` characters without splitting a code point.
pub fn clip(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Sanitize a free-text field for persistence: trim, escape, cap.
pub fn sanitize_text(s: &str, max_chars: usize) -> String {
    clip(&escape_html(s.trim()), max_chars)
}

/// Normalize a phone number into canonical E.164 for the given default region.
///
/// Accepted forms: explicit `+<digits>` international numbers, numbers with
/// the region's domestic trunk prefix, numbers starting with the region's
/// country code, and bare national numbers. Common separators (spaces, dots,
/// hyphens, parentheses) are stripped first. Returns `None` when the input
/// cannot be read as a valid number; callers map that to a bad-request error.
pub fn normalize_phone(input: &str, region: &PhoneRegion) -> Option<String> {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    let (international, digits) = match cleaned.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    if international {
        // E.164 allows at most 15 digits; require a plausible minimum too.
        if (8..=15).contains(&digits.len()) {
            return Some(format!("+{}", digits));
        }
        return None;
    }

    let cc = region.country_code.as_str();
    let national = region.national_digits;

    if let Some(trunk) = region.trunk_prefix {
        if digits.len() == national + 1 && digits.starts_with(trunk) {
            return Some(format!("+{}{}", cc, &digits[1..]));
        }
    }
    if digits.len() == cc.len() + national && digits.starts_with(cc) {
        return Some(format!("+{}", digits));
    }
    if digits.len() == national {
        return Some(format!("+{}{}", cc, digits));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("1")</script>"#),
            "&lt;script&gt;alert(&quot;1&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_clip_respects_char_boundaries() {
        assert_eq!(clip("привет", 4), "прив");
        assert_eq!(clip("short", 50), "short");
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  <b>hi</b>  ", 100), "&lt;b&gt;hi&lt;/b&gt;");
    }

    #[test]
    fn test_normalize_phone_forms() {
        let region = PhoneRegion::default();
        assert_eq!(
            normalize_phone("+7 (999) 123-45-67", &region).as_deref(),
            Some("+79991234567")
        );
        assert_eq!(
            normalize_phone("89991234567", &region).as_deref(),
            Some("+79991234567")
        );
        assert_eq!(
            normalize_phone("79991234567", &region).as_deref(),
            Some("+79991234567")
        );
        assert_eq!(
            normalize_phone("9991234567", &region).as_deref(),
            Some("+79991234567")
        );
    }

    #[test]
    fn test_normalize_phone_rejects_garbage() {
        let region = PhoneRegion::default();
        assert_eq!(normalize_phone("", &region), None);
        assert_eq!(normalize_phone("call me", &region), None);
        assert_eq!(normalize_phone("123", &region), None);
        assert_eq!(normalize_phone("+1", &region), None);
        assert_eq!(normalize_phone("+123456789012345678", &region), None);
    }
}
