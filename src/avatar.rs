//! Deterministic avatar URLs
//!
//! Derives a public gravatar-convention URL from the registration email so
//! every account has an avatar without an upload step. The hash input is
//! the trimmed, lowercased address.

use sha2::{Digest, Sha256};

/// Avatar URL for an email address (200px, PG-rated, "mystery person" fallback)
pub fn avatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let digest = hasher.finalize();

    format!(
        "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
        hex::encode(digest)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_url_is_deterministic_and_normalized() {
        let a = avatar_url("alice@example.com");
        let b = avatar_url("  Alice@Example.COM ");
        assert_eq!(a, b);
        assert!(a.starts_with("https://www.gravatar.com/avatar/"));
        assert!(a.ends_with("?s=200&r=pg&d=mm"));
    }

    #[test]
    fn different_emails_differ() {
        assert_ne!(avatar_url("alice@example.com"), avatar_url("bob@example.com"));
    }
}
