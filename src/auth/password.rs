// src/auth/password.rs
use sha2::{Digest, Sha256};

/// Hashing sits behind this trait so the digest scheme can be upgraded
/// without touching the store or the handlers. The shipped implementation
/// is unsalted hex SHA-256 for parity with the legacy user file; that
/// weakness is inherited knowingly, not endorsed.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> String;

    fn verify(&self, password: &str, digest: &str) -> bool {
        digests_equal(&self.hash(password), digest)
    }
}

/// Hex-encoded SHA-256 of the plaintext, no salt.
pub struct Sha256PasswordHasher;

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hex_encode(&hasher.finalize())
    }
}

/// Constant-time-ish compare for hex digests (simple and sufficient here).
pub fn digests_equal(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing to a String cannot fail.
        let _ = write!(out, "{byte:02x}");
    }
    out
}
