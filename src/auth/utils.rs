//! Small helpers for auth input handling.

use rand::{rngs::OsRng, Rng};
use regex::Regex;
use secrecy::SecretString;

const PASSWORD_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const PASSWORD_RANDOM_LEN: usize = 10;
// Satisfies the provider's password policy (upper case, digit, symbol).
const PASSWORD_SUFFIX: &str = "A1!";

/// Trim surrounding whitespace from an email before lookup.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Throwaway password for account creation. Users never log in with it; the
/// OTP flow is the only way in.
pub(super) fn generate_password() -> SecretString {
    let mut rng = OsRng;
    let mut password: String = (0..PASSWORD_RANDOM_LEN)
        .map(|_| char::from(PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())]))
        .collect();
    password.push_str(PASSWORD_SUFFIX);
    SecretString::from(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn normalize_email_trims() {
        assert_eq!(normalize_email("  alice@example.com \n"), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
        assert!(!valid_email(""));
    }

    #[test]
    fn generated_password_shape() {
        let password = generate_password();
        let value = password.expose_secret();
        assert_eq!(value.len(), PASSWORD_RANDOM_LEN + PASSWORD_SUFFIX.len());
        assert!(value.ends_with(PASSWORD_SUFFIX));
        assert!(value[..PASSWORD_RANDOM_LEN]
            .bytes()
            .all(|b| PASSWORD_ALPHABET.contains(&b)));
    }

    #[test]
    fn generated_passwords_differ() {
        let first = generate_password();
        let second = generate_password();
        assert_ne!(first.expose_secret(), second.expose_secret());
    }
}
