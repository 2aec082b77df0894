//! Opaque token and one-time code generation.
//!
//! Every credential in the platform (session tokens, refresh tokens, invite
//! tokens, login codes) is minted here so the entropy requirements live in
//! one place. All generation draws from a cryptographically secure source;
//! if the system randomness source is unavailable the process aborts, since
//! no credential may ever be minted from a weaker generator.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;

/// Number of random bytes behind every opaque token.
pub const OPAQUE_TOKEN_BYTES: usize = 32;

/// Generate a cryptographically random opaque token
/// (32 bytes → base64url-encoded, no padding).
///
/// Used for session, refresh, and invite tokens.
pub fn opaque_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; OPAQUE_TOKEN_BYTES] = rng.random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a numeric one-time code of `len` decimal digits.
///
/// Leading zeros are allowed; every digit is drawn independently so the
/// code space is exactly `10^len`.
pub fn numeric_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}
