// src/utils/random.rs

use rand::{Rng, distr::Alphanumeric};
use uuid::Uuid;

/// Length of module and question slugs.
pub const SLUG_LENGTH: usize = 12;

/// Length of the student-facing submission code.
pub const SUBMISSION_CODE_LENGTH: usize = 16;

pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

/// Generates a random `[A-Za-z0-9]` string from the thread-local CSPRNG.
pub fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_alphanumeric_length_and_charset() {
        let slug = random_alphanumeric(SLUG_LENGTH);
        assert_eq!(slug.len(), SLUG_LENGTH);
        assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_random_alphanumeric_differs_between_calls() {
        assert_ne!(
            random_alphanumeric(SUBMISSION_CODE_LENGTH),
            random_alphanumeric(SUBMISSION_CODE_LENGTH)
        );
    }
}
