//! Hashing and Encoding Utilities

use sha2::{Digest, Sha256};

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Fold the first 8 bytes of a SHA-256 digest into a `u64` (big-endian)
pub fn sha256_u64(data: &[u8]) -> u64 {
    let hash = sha256(data);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash[..8]);
    u64::from_be_bytes(prefix)
}

/// Encode an unsigned integer in lowercase base 36
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(BASE36_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    // Alphabet is ASCII
    digits.into_iter().map(char::from).collect()
}

/// Whether a character belongs to the lowercase base 36 alphabet
pub fn is_base36_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_lowercase()
}
