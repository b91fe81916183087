//! Password hashing and session token primitives.
//!
//! Passwords are stored as `salt$digest` where the digest is an
//! HMAC-SHA256 of the password keyed by a random per-user salt, both
//! hex-encoded. Session tokens are 256-bit random values in base64url.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

/// Generate an opaque bearer token (43 characters of base64url).
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let mut random_bytes = [0u8; 32];
    rng.fill_bytes(&mut random_bytes);
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = hex::encode(salt);
    let digest = digest_password(&salt, password);
    format!("{}${}", salt, digest)
}

/// Check a password against a stored `salt$digest` hash in constant time.
pub fn verify_password(stored: &str, password: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    let candidate = digest_password(salt, password);
    constant_time_eq(candidate.as_bytes(), digest.as_bytes())
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(salt.as_bytes()).expect("HMAC can take key of any size");
    mac.update(password.as_bytes());
    let digest = mac.finalize().into_bytes();
    hex::encode(digest)
}
