//! Tamper-evident value tokens for client-held cookies.
//!
//! Wraps a plaintext value together with its digest into a single
//! `value|digest` token, and validates such tokens on the way back in. A
//! token survives the round trip through a client only if the digest
//! recomputed from its value half matches the digest half exactly; anything
//! else fails closed.
//!
//! The digest is MD5, kept for compatibility with the cookie values this
//! scheme replaces. MD5 is collision-findable and the token carries no
//! secret, so this provides tamper *evidence* against casual clients, not
//! cryptographic integrity. Do not use it for anything security-critical.

/// Separator between the value and its digest in a token.
const SEPARATOR: char = '|';

/// Returns the MD5 digest of `input` as 32 lowercase hex characters.
///
/// Deterministic: equal inputs always produce equal digests. The empty
/// string digests like any other input.
pub fn digest(input: &str) -> String {
    format!("{:x}", md5::compute(input))
}

/// Wraps `value` into a `value|digest` token.
pub fn encode(value: &str) -> String {
    format!("{}{}{}", value, SEPARATOR, digest(value))
}

/// Validates a token and extracts its value.
///
/// The candidate value is everything before the first `|`, or the whole
/// token when no separator is present. Returns `Some(value)` only when
/// re-encoding the candidate reproduces the token exactly; malformed or
/// tampered tokens yield `None`. Never panics.
pub fn decode(token: &str) -> Option<&str> {
    let value = match token.split_once(SEPARATOR) {
        Some((value, _)) => value,
        None => token,
    };
    if encode(value) == token {
        Some(value)
    } else {
        None
    }
}
