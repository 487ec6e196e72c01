//! Webhook signature verification
//!
//! Deliveries carry two headers: `X-Crebain-Timestamp` and
//! `X-Crebain-Signature`. The signature has the form `v1=<hex>`, where the
//! hex digest is HMAC-SHA256, keyed by the shared secret, over
//! `"{timestamp}.{raw body}"`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery timestamp
pub const TIMESTAMP_HEADER: &str = "X-Crebain-Timestamp";

/// Header carrying the delivery signature
pub const SIGNATURE_HEADER: &str = "X-Crebain-Signature";

/// Version prefix of the signature header value
pub const SIGNATURE_PREFIX: &str = "v1=";

/// Decides whether a delivery was signed with the shared secret
pub trait SignatureVerifier: Send + Sync {
    /// `timestamp` and `signature` are the raw header values, if present.
    /// `body` must be the bytes exactly as received.
    fn verify(&self, timestamp: Option<&str>, body: &[u8], signature: Option<&str>) -> bool;
}

/// HMAC-SHA256 verifier for `v1=` signatures
#[derive(Clone)]
pub struct HmacVerifier {
    secret: Vec<u8>,
}

impl HmacVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self, timestamp: &str, body: &[u8]) -> HmacSha256 {
        // HMAC accepts keys of any length, including empty ones
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .unwrap_or_else(|_| unreachable!("HMAC key length is unrestricted"));
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        mac
    }

    /// Compute the `v1=<hex>` header value for a delivery
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> String {
        let digest = self.mac(timestamp, body).finalize().into_bytes();
        format!("{}{}", SIGNATURE_PREFIX, hex::encode(digest))
    }
}

impl SignatureVerifier for HmacVerifier {
    fn verify(&self, timestamp: Option<&str>, body: &[u8], signature: Option<&str>) -> bool {
        let (Some(timestamp), Some(signature)) = (timestamp, signature) else {
            return false;
        };
        let Some(digest_hex) = signature.strip_prefix(SIGNATURE_PREFIX) else {
            return false;
        };
        let Ok(digest) = hex::decode(digest_hex) else {
            return false;
        };

        // Constant-time comparison
        self.mac(timestamp, body).verify_slice(&digest).is_ok()
    }
}

impl std::fmt::Debug for HmacVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacVerifier").finish_non_exhaustive()
    }
}
