//! Pronounceable usernames and throwaway e-mail addresses.

use rand::seq::SliceRandom;
use rand::Rng;

const CONSONANTS: &[u8] = b"bcdfghjklmnprstvwxyz";
const VOWELS: &[u8] = b"aeiou";

/// Domain used for generated e-mail addresses.
pub const EMAIL_DOMAIN: &str = "example.com";

/// Length of the username part of generated e-mail addresses.
pub const EMAIL_USER_LENGTH: usize = 5;

/// Generates a pronounceable username of `length` letters.
///
/// The first letter is an upper-case consonant; the rest alternate vowel,
/// consonant, vowel, ... A `length` of zero still yields the initial letter.
///
/// # Example
///
/// ```
/// use sealdb_store::identity::generate_user;
///
/// let user = generate_user(5);
/// assert_eq!(user.len(), 5);
/// assert!(user.starts_with(|c: char| c.is_ascii_uppercase()));
/// ```
#[must_use]
pub fn generate_user(length: usize) -> String {
    generate_user_with(&mut rand::thread_rng(), length)
}

fn pick<R: Rng + ?Sized>(rng: &mut R, letters: &[u8]) -> char {
    char::from(*letters.choose(rng).unwrap_or(&b'x'))
}

fn generate_user_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    let mut user = String::with_capacity(length.max(1));
    user.push(pick(rng, CONSONANTS).to_ascii_uppercase());
    for i in 0..length.saturating_sub(1) {
        let letters = if i % 2 == 0 { VOWELS } else { CONSONANTS };
        user.push(pick(rng, letters));
    }
    user
}

/// Generates a lower-case e-mail address such as `bokat@example.com`.
#[must_use]
pub fn generate_email() -> String {
    format!("{}@{EMAIL_DOMAIN}", generate_user(EMAIL_USER_LENGTH).to_lowercase())
}

/// Extracts a display name from the local part of an e-mail address.
///
/// The first character is upper-cased and the rest lower-cased. Returns
/// `None` if there is no `@` or nothing before it.
///
/// # Example
///
/// ```
/// use sealdb_store::identity::extract_user_from_email;
///
/// assert_eq!(extract_user_from_email("bokat@example.com").as_deref(), Some("Bokat"));
/// assert_eq!(extract_user_from_email("no-at-sign"), None);
/// ```
#[must_use]
pub fn extract_user_from_email(email: &str) -> Option<String> {
    let (local, _) = email.split_once('@')?;
    let mut chars = local.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect())
}
