// src/core/utils/crypto.rs
use rand::{distributions::Alphanumeric, Rng, RngCore};
use sha2::{Digest, Sha256};

/// Length of generated document ids, matching the document database's
/// auto-id format.
const DOCUMENT_ID_LEN: usize = 20;

/// Generates a random alphanumeric document id.
pub fn generate_document_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DOCUMENT_ID_LEN)
        .map(char::from)
        .collect()
}

/// Generates a random hex string of `num_bytes` bytes (twice as many chars).
pub fn generate_random_hex_string(num_bytes: usize) -> String {
    let mut bytes = vec![0u8; num_bytes];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(&bytes)
}

/// Calculates the SHA256 hash of byte data and returns it as a hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_ids_are_alphanumeric_and_distinct() {
        let a = generate_document_id();
        let b = generate_document_id();
        assert_eq!(a.len(), DOCUMENT_ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn hex_string_length() {
        assert_eq!(generate_random_hex_string(16).len(), 32);
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
