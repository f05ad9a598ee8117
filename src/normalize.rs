//! Rewrites free-form input into a more useful payload: e-mail addresses get
//! `mailto:`, phone numbers `tel:`, bare domains `https://`.
//!
//! Checks run in a fixed order and the first match wins, so an input that
//! looks like an e-mail address is never retested as a domain.

/// Counted over digits only, so `(555) 123-456` (9 digits) stays plain text
/// even though it has more than ten non-space characters.
const MIN_PHONE_DIGITS: usize = 10;
const SCHEME_PREFIXES: [&str; 4] = ["http://", "https://", "mailto:", "tel:"];

pub fn normalize(raw: &str) -> String {
    let data = raw.trim();

    if looks_like_email(data) {
        return format!("mailto:{data}");
    }
    if looks_like_phone(data) {
        return format!("tel:{}", dial_string(data));
    }
    if !SCHEME_PREFIXES.iter().any(|p| data.starts_with(p)) && starts_with_domain(data) {
        return format!("https://{data}");
    }

    data.to_string()
}

fn looks_like_email(data: &str) -> bool {
    data.contains('@')
        && data.contains('.')
        && !data.starts_with("mailto:")
        && !data.chars().any(char::is_whitespace)
        && !data.starts_with("http")
}

fn looks_like_phone(data: &str) -> bool {
    let allowed = |c: char| c.is_ascii_digit() || c.is_whitespace() || "-+()".contains(c);
    !data.is_empty()
        && data.chars().all(allowed)
        && data.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
        && !data.starts_with("tel:")
}

/// Digits only, keeping a `+` that precedes them.
fn dial_string(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for c in data.chars() {
        if c.is_ascii_digit() || (c == '+' && out.is_empty()) {
            out.push(c);
        }
    }
    out
}

/// `^[A-Za-z0-9-]+\.[A-Za-z]{2,}`, matched against the start only.
fn starts_with_domain(data: &str) -> bool {
    let label_len = data
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .count();
    if label_len == 0 {
        return false;
    }
    let Some(rest) = data.get(label_len..).and_then(|r| r.strip_prefix('.')) else {
        return false;
    };
    rest.chars().take_while(char::is_ascii_alphabetic).count() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_gets_mailto() {
        assert_eq!(normalize("user@example.com"), "mailto:user@example.com");
        assert_eq!(normalize("  user@example.com\n"), "mailto:user@example.com");
    }

    #[test]
    fn email_heuristic_exclusions() {
        assert_eq!(normalize("mailto:user@example.com"), "mailto:user@example.com");
        assert_eq!(normalize("http://user@example.com"), "http://user@example.com");
        // Whitespace blocks the e-mail rule; the domain rule then sees no leading domain.
        assert_eq!(normalize("write to user@example.com"), "write to user@example.com");
        // `@` without a dot is not an address.
        assert_eq!(normalize("@handle"), "@handle");
    }

    #[test]
    fn phone_gets_tel() {
        assert_eq!(normalize("+1 555 123 4567"), "tel:+15551234567");
        assert_eq!(normalize("(555) 123-4567"), "tel:5551234567");
        assert_eq!(normalize("8-800-555-35-35"), "tel:88005553535");
    }

    #[test]
    fn short_numbers_are_not_phones() {
        assert_eq!(normalize("123 456 789"), "123 456 789");
        assert_eq!(normalize("(555) 123-456"), "(555) 123-456");
        assert_eq!(normalize("+(1) - -"), "+(1) - -");
    }

    #[test]
    fn only_leading_plus_survives() {
        assert_eq!(normalize("+44 20+7946 0958"), "tel:+442079460958");
    }

    #[test]
    fn bare_domain_gets_https() {
        assert_eq!(normalize("example.com"), "https://example.com");
        assert_eq!(normalize("www.example.com/path?q=1"), "https://www.example.com/path?q=1");
        assert_eq!(normalize("my-site.io"), "https://my-site.io");
    }

    #[test]
    fn domain_rule_requires_letter_tld() {
        assert_eq!(normalize("version 1.2"), "version 1.2");
        assert_eq!(normalize("3.14159"), "3.14159");
        assert_eq!(normalize("a.b"), "a.b");
        assert_eq!(normalize(".com"), ".com");
    }

    #[test]
    fn schemes_pass_through() {
        assert_eq!(normalize("https://example.com"), "https://example.com");
        assert_eq!(normalize("http://example.com"), "http://example.com");
        assert_eq!(normalize("tel:+15551234567"), "tel:+15551234567");
    }

    #[test]
    fn plain_text_is_trimmed_only() {
        assert_eq!(normalize("  Hello, world!  "), "Hello, world!");
        assert_eq!(normalize("WIFI:S:home;T:WPA;P:secret;;"), "WIFI:S:home;T:WPA;P:secret;;");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "user@example.com",
            "+1 555 123 4567",
            "(555) 123-4567",
            "example.com",
            "https://example.com",
            "  spaced out text ",
            "mailto:a@b.co",
            "tel:+15551234567",
            "12345",
            "Привет, мир",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "normalize not idempotent for {input:?}");
        }
    }
}
