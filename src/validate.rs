/// Validates an email address shape (`local@domain.tld`).
///
/// A valid email is:
/// - Exactly one `@`, with a non-empty local part
/// - A domain containing a `.` that neither starts nor ends it
/// - No whitespace anywhere
#[must_use]
pub fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .rsplit_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// Validates a phone number: exactly 10 ASCII digits.
#[must_use]
pub fn is_valid_phone(s: &str) -> bool {
    s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Validates password strength.
///
/// At least 8 characters with an uppercase letter, a lowercase letter, a
/// digit and a non-alphanumeric character.
#[must_use]
pub fn is_strong_password(s: &str) -> bool {
    s.chars().count() >= 8
        && s.chars().any(|c| c.is_ascii_uppercase())
        && s.chars().any(|c| c.is_ascii_lowercase())
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("asha@kiit.ac.in"));
        assert!(is_valid_email("a@b.co"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("asha"));
        assert!(!is_valid_email("@kiit.ac.in"));
        assert!(!is_valid_email("asha@kiit"));
        assert!(!is_valid_email("asha@.in"));
        assert!(!is_valid_email("asha@kiit."));
        assert!(!is_valid_email("as ha@kiit.in"));
        assert!(!is_valid_email("a@b@c.in"));
    }

    #[test]
    fn test_phone() {
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("987654321")); // 9 digits
        assert!(!is_valid_phone("98765432100")); // 11 digits
        assert!(!is_valid_phone("98765o3210"));
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("Canteen#42"));
        assert!(!is_strong_password("Can#4")); // too short
        assert!(!is_strong_password("canteen#42")); // no uppercase
        assert!(!is_strong_password("CANTEEN#42")); // no lowercase
        assert!(!is_strong_password("Canteen#xy")); // no digit
        assert!(!is_strong_password("Canteen42x")); // no special
    }
}
