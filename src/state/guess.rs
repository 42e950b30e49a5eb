//! Guess normalization
//!
//! Drops every character that is neither alphanumeric nor whitespace, trims,
//! then lowercases. A guess matches only if both sides normalize identically.

pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_lowercase()
}

pub fn is_match(guess: &str, secret: &str) -> bool {
    normalize(guess) == normalize(secret)
}
