//! Field validators for applicant input.
//!
//! Every predicate accepts the empty string so it can run on each keystroke; emptiness and
//! exact lengths are enforced by the submission rules in [`super::form`].

use std::sync::OnceLock;

use regex::Regex;

pub const FULL_NAME_MIN_CHARS: usize = 3;
pub const FULL_NAME_MAX_CHARS: usize = 50;
pub const PHONE_DIGITS: usize = 10;

const EMAIL_LOCAL_MAX_CHARS: usize = 64;
const DOMAIN_LABEL_MAX_CHARS: usize = 63;

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

fn letters_and_spaces() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    compiled(&PATTERN, r"^[a-zA-Z\s]*$")
}

fn digits() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    compiled(&PATTERN, r"^[0-9]*$")
}

fn email_shape() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    compiled(&PATTERN, r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
}

fn email_local_part() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    compiled(&PATTERN, r"^[a-zA-Z0-9]([a-zA-Z0-9._%-]*[a-zA-Z0-9])?$")
}

fn domain_label() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    compiled(&PATTERN, r"^[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?$")
}

fn top_level_domain() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    compiled(&PATTERN, r"^[a-zA-Z]{2,}$")
}

/// Letters and whitespace only, at most 50 characters.
pub fn is_valid_full_name(value: &str) -> bool {
    has_name_charset(value) && value.chars().count() <= FULL_NAME_MAX_CHARS
}

pub(crate) fn has_name_charset(value: &str) -> bool {
    letters_and_spaces().is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    if !email_shape().is_match(value) {
        return false;
    }

    let parts: Vec<&str> = value.split('@').collect();
    let [local, domain] = parts.as_slice() else {
        return false;
    };

    if !email_local_part().is_match(local)
        || local.chars().count() > EMAIL_LOCAL_MAX_CHARS
        || local.contains("..")
    {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let last = labels.len() - 1;
    labels.iter().enumerate().all(|(index, label)| {
        let length = label.chars().count();
        if length == 0 || length > DOMAIN_LABEL_MAX_CHARS {
            return false;
        }
        if index == last {
            top_level_domain().is_match(label)
        } else {
            domain_label().is_match(label)
        }
    })
}

/// Digits only; any length including zero.
pub fn is_valid_phone(value: &str) -> bool {
    digits().is_match(value)
}

/// Letters and whitespace only. Applies to free-text college entry.
pub fn is_valid_college(value: &str) -> bool {
    letters_and_spaces().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_rejects_anything_outside_letters_and_spaces() {
        for sample in ["Asha1", "Asha-Rao", "O'Neil", "Rao!", "José", "a_b", "4"] {
            assert!(!is_valid_full_name(sample), "{sample} should be rejected");
        }
        assert!(is_valid_full_name(""));
        assert!(is_valid_full_name("Asha Rao"));
        assert!(is_valid_full_name("  Asha\tRao "));
    }

    #[test]
    fn full_name_caps_length_at_fifty() {
        assert!(is_valid_full_name(&"a".repeat(50)));
        assert!(!is_valid_full_name(&"a".repeat(51)));
    }

    #[test]
    fn email_accepts_common_addresses() {
        for sample in [
            "asha@example.com",
            "user@sub-domain.co",
            "first.last@mail.example.org",
            "a_b%c-d@x1.io",
            "a@b.cd",
        ] {
            assert!(is_valid_email(sample), "{sample} should be accepted");
        }
    }

    #[test]
    fn email_rejects_digit_in_top_level_domain() {
        assert!(!is_valid_email("a@b.c0m"));
        assert!(!is_valid_email("asha@example.c"));
    }

    #[test]
    fn email_rejects_consecutive_dots_in_local_part() {
        assert!(!is_valid_email("a..b@domain.com"));
    }

    #[test]
    fn email_rejects_hyphen_at_label_edges() {
        assert!(!is_valid_email("user@-sub.co"));
        assert!(!is_valid_email("user@sub-.co"));
    }

    #[test]
    fn email_rejects_malformed_shapes() {
        for sample in [
            "",
            "plain",
            "a@b",
            "a@@b.com",
            "a@b@c.com",
            ".a@b.com",
            "a.@b.com",
            "a@b..com",
            "a b@c.com",
            "a+b@c.com",
        ] {
            assert!(!is_valid_email(sample), "{sample} should be rejected");
        }
    }

    #[test]
    fn email_limits_local_part_and_label_lengths() {
        let local = "a".repeat(64);
        assert!(is_valid_email(&format!("{local}@example.com")));
        let local = "a".repeat(65);
        assert!(!is_valid_email(&format!("{local}@example.com")));

        let label = "b".repeat(63);
        assert!(is_valid_email(&format!("a@{label}.com")));
        let label = "b".repeat(64);
        assert!(!is_valid_email(&format!("a@{label}.com")));
    }

    #[test]
    fn phone_accepts_digits_of_any_length() {
        assert!(is_valid_phone(""));
        assert!(is_valid_phone("98765"));
        assert!(is_valid_phone("98765432101"));
        assert!(!is_valid_phone("98765-4321"));
        assert!(!is_valid_phone("+919876543210"));
    }

    #[test]
    fn college_allows_letters_and_spaces_only() {
        assert!(is_valid_college("Rungta International Skills University"));
        assert!(!is_valid_college("IIT-Delhi"));
        assert!(!is_valid_college("NIT 2"));
    }
}
