//! Stable hashing for cache signatures

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `parts` joined by `separator`.
pub fn stable_hash(parts: &[String], separator: &str) -> String {
    let mut hasher = Sha256::new();
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            hasher.update(separator.as_bytes());
        }
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::stable_hash;

    #[test]
    fn hash_matches_joined_input() {
        let parts = vec!["a|1|2".to_string(), "b|3|4".to_string()];
        let joined = stable_hash(&["a|1|2;b|3|4".to_string()], ";");
        assert_eq!(stable_hash(&parts, ";"), joined);
    }

    #[test]
    fn hash_is_order_sensitive() {
        let ab = vec!["a".to_string(), "b".to_string()];
        let ba = vec!["b".to_string(), "a".to_string()];
        assert_ne!(stable_hash(&ab, ";"), stable_hash(&ba, ";"));
    }
}
