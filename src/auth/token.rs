use rand::{distributions::Alphanumeric, Rng};

/// Token length mirrors the 40-character keys issued by the previous system,
/// so existing clients keep working.
pub const TOKEN_LEN: usize = 40;

/// Generates a candidate bearer token. Whether it becomes the user's token is
/// up to the credential store's get-or-create; an existing token wins.
pub fn generate() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_have_fixed_length_and_charset() {
        let token = generate();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_are_unique_enough() {
        assert_ne!(generate(), generate());
    }
}
