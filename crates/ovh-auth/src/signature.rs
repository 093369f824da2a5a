//! OVH request signature
//!
//! The signature is `$1$` followed by the lowercase hex SHA-1 of
//!
//! ```text
//! secret+consumer_key+METHOD+url+body+timestamp
//! ```
//!
//! The remote side recomputes it from the same inputs, so every byte
//! matters: `url` is the exact URL dispatched (query included) and `body`
//! the exact bytes sent. An empty consumer key still contributes its
//! separator.

use sha1::{Digest, Sha1};

use crate::method::Method;

/// Version tag prepended to every signature
pub const SIGNATURE_PREFIX: &str = "$1$";

const SEPARATOR: &[u8] = b"+";

/// Compute the `X-Ovh-Signature` value for one request
pub fn sign(
    secret: &str,
    consumer_key: &str,
    method: Method,
    url: &str,
    body: &[u8],
    timestamp: i64,
) -> String {
    let mut hasher = Sha1::new();
    hasher.update(secret.as_bytes());
    hasher.update(SEPARATOR);
    hasher.update(consumer_key.as_bytes());
    hasher.update(SEPARATOR);
    hasher.update(method.as_str().as_bytes());
    hasher.update(SEPARATOR);
    hasher.update(url.as_bytes());
    hasher.update(SEPARATOR);
    hasher.update(body);
    hasher.update(SEPARATOR);
    hasher.update(timestamp.to_string().as_bytes());

    format!("{}{}", SIGNATURE_PREFIX, hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://eu.api.ovh.com/1.0/auth/currentCredential";

    #[test]
    fn test_known_vector() {
        let signature = sign(
            "EgWIz07P0HYwtQDs",
            "MtSwSrPpNjqfVSmJhLbPyr2i45lSwPU1",
            Method::Get,
            URL,
            b"",
            1457018875,
        );
        assert_eq!(signature, "$1$755618cd738a9b1a8596f65f936a58c242a798e7");
    }

    #[test]
    fn test_empty_consumer_key_keeps_separator() {
        let signature = sign(
            "secret",
            "",
            Method::Post,
            "https://eu.api.ovh.com/1.0/domain/zone/example.com/record",
            br#"{"fieldType":"A"}"#,
            1700000000,
        );
        assert_eq!(signature, "$1$685ed6ec63b4705e04e0d4964f8b0cc56c2cfb8f");
    }

    #[test]
    fn test_format() {
        let signature = sign("s", "c", Method::Get, URL, b"", 1);
        let digest = signature.strip_prefix(SIGNATURE_PREFIX).unwrap();
        assert_eq!(digest.len(), 40);
        assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_deterministic() {
        let a = sign("s", "c", Method::Put, URL, b"{}", 42);
        let b = sign("s", "c", Method::Put, URL, b"{}", 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_input_changes_output() {
        let base = sign("s", "c", Method::Get, URL, b"{}", 42);
        assert_ne!(base, sign("t", "c", Method::Get, URL, b"{}", 42));
        assert_ne!(base, sign("s", "d", Method::Get, URL, b"{}", 42));
        assert_ne!(base, sign("s", "c", Method::Delete, URL, b"{}", 42));
        assert_ne!(base, sign("s", "c", Method::Get, "https://eu.api.ovh.com/1.0/me", b"{}", 42));
        assert_ne!(base, sign("s", "c", Method::Get, URL, b"{ }", 42));
        assert_ne!(base, sign("s", "c", Method::Get, URL, b"{}", 43));
    }

    #[test]
    fn test_negative_timestamp_is_signed_in_decimal() {
        let a = sign("s", "c", Method::Get, URL, b"", -5);
        let b = sign("s", "c", Method::Get, URL, b"", 5);
        assert_ne!(a, b);
    }
}
