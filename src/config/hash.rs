//! Content fingerprinting for synthesized configurations.

use sha2::{Digest, Sha256};

/// Hash a serialized configuration into a version fingerprint.
///
/// The digest is used purely for change detection between runs, never as a
/// security boundary. Byte-identical inputs always hash identically.
pub fn hash_config(config: &str) -> String {
    format!("{:x}", Sha256::digest(config.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_input_hashes_identically() {
        let config = "repos:\n  - repo: https://example.com/hooks\n";
        assert_eq!(hash_config(config), hash_config(config));
    }

    #[test]
    fn different_input_hashes_differently() {
        assert_ne!(hash_config("repos: []\n"), hash_config("repos: [] \n"));
    }

    #[test]
    fn hash_is_hex_encoded() {
        let digest = hash_config("anything");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
