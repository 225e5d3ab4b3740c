use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

/// Conservative address-shape check: restricted local part, dotted domain,
/// labels of at most 63 characters.
pub fn is_valid_email(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.len() <= MAX_EMAIL_LENGTH && EMAIL_REGEX.is_match(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.co"));
        assert!(is_valid_email("o'brien@mail-server.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "no-at-sign", "a@", "@example.com", "a@localhost", "a b@example.com",
                    "a@-example.com", "a@example-.com", "a@example..com", "<a>@example.com"] {
            assert!(!is_valid_email(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn rejects_overlong_address() {
        let local = "a".repeat(64);
        let domain = format!("{}.{}.{}.com", "b".repeat(63), "c".repeat(63), "d".repeat(58));
        let address = format!("{local}@{domain}");
        assert_eq!(address.len(), 255);
        assert!(!is_valid_email(&address));
    }

    #[test]
    fn rejects_overlong_label() {
        let address = format!("user@{}.com", "x".repeat(64));
        assert!(!is_valid_email(&address));
        let address = format!("user@{}.com", "x".repeat(63));
        assert!(is_valid_email(&address));
    }
}
