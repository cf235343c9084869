//! Password selection for new instance accounts

use rand::Rng;
use rand::seq::SliceRandom;

use crate::instance::AccountName;

/// Minimum length of a generated password
pub const MIN_GENERATED_LEN: usize = 64;

const DIGIT_COUNT: usize = 10;
const SYMBOL_COUNT: usize = 10;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"~!@#$%^&*()_+-={}[]:<>?,.";

/// Placeholder that makes `sysadminctl` prompt for the password itself
pub const PROMPT_PLACEHOLDER: &str = "-";

/// Where the new account's password comes from.
///
/// Chosen once, before the create plan is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordSource {
    /// Given on the command line
    Explicit(String),
    /// Typed by the operator at the sysadminctl prompt
    Prompt,
    /// Generated because no terminal is attached
    Generated(String),
}

impl PasswordSource {
    /// Pick the source for `account`.
    ///
    /// A generated password is logged at warn level: with no terminal
    /// attached there is no other way to hand it to the operator.
    pub fn select(account: &AccountName, explicit: Option<String>, tty: bool) -> Self {
        if let Some(secret) = explicit {
            return Self::Explicit(secret);
        }
        if tty {
            return Self::Prompt;
        }

        let secret = generate(MIN_GENERATED_LEN);
        log::warn!(
            "Generated a random password, as tty is not available. THE PASSWORD IS SHOWN IN THIS SCREEN. user={account} password={secret}"
        );
        Self::Generated(secret)
    }

    /// Value passed to `sysadminctl -password`.
    pub fn argument(&self) -> &str {
        match self {
            Self::Explicit(secret) | Self::Generated(secret) => secret,
            Self::Prompt => PROMPT_PLACEHOLDER,
        }
    }
}

/// Generate a random password of at least [`MIN_GENERATED_LEN`] characters.
///
/// Always contains digits, symbols and letters.
pub fn generate(len: usize) -> String {
    let len = len.max(MIN_GENERATED_LEN);
    let mut rng = rand::rng();

    let mut pick = |set: &[u8], n: usize| -> Vec<u8> {
        (0..n).map(|_| set[rng.random_range(0..set.len())]).collect()
    };

    let mut bytes = pick(DIGITS, DIGIT_COUNT);
    bytes.extend(pick(SYMBOLS, SYMBOL_COUNT));
    bytes.extend(pick(LETTERS, len - DIGIT_COUNT - SYMBOL_COUNT));
    bytes.shuffle(&mut rand::rng());

    bytes.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> AccountName {
        AccountName::new_unchecked("alcove_alice_dev")
    }

    #[test]
    fn test_generated_length_and_classes() {
        for _ in 0..20 {
            let pw = generate(MIN_GENERATED_LEN);
            assert!(pw.len() >= 64);
            assert!(pw.chars().any(|c| c.is_ascii_alphabetic()));
            assert!(pw.chars().any(|c| c.is_ascii_digit()));
            assert_eq!(pw.chars().filter(char::is_ascii_digit).count(), DIGIT_COUNT);
        }
    }

    #[test]
    fn test_generate_raises_short_lengths() {
        assert_eq!(generate(8).len(), MIN_GENERATED_LEN);
        assert_eq!(generate(100).len(), 100);
    }

    #[test]
    fn test_generated_passwords_differ() {
        assert_ne!(generate(64), generate(64));
    }

    #[test]
    fn test_select_explicit_wins() {
        let source = PasswordSource::select(&account(), Some("hunter2".to_string()), false);
        assert_eq!(source, PasswordSource::Explicit("hunter2".to_string()));
        assert_eq!(source.argument(), "hunter2");

        let source = PasswordSource::select(&account(), Some(String::new()), true);
        assert_eq!(source, PasswordSource::Explicit(String::new()));
    }

    #[test]
    fn test_select_prompt_with_tty() {
        let source = PasswordSource::select(&account(), None, true);
        assert_eq!(source, PasswordSource::Prompt);
        assert_eq!(source.argument(), "-");
    }

    #[test]
    fn test_select_generates_without_tty() {
        let source = PasswordSource::select(&account(), None, false);
        match &source {
            PasswordSource::Generated(secret) => {
                assert!(secret.len() >= MIN_GENERATED_LEN);
                assert_eq!(source.argument(), secret);
            }
            other => panic!("expected generated password, got {other:?}"),
        }
    }
}
