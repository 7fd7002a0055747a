//! `X-Hub-Signature-256` verification

use super::error::WebhookError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

/// Compute the `sha256=<hex>` signature GitHub sends for `payload`
pub fn sign(secret: &[u8], payload: &[u8]) -> String {
    format!("{SIGNATURE_PREFIX}{}", hex::encode(digest(secret, payload)))
}

fn digest(secret: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Check a signature header against the payload
pub fn verify(secret: &[u8], payload: &[u8], header: &str) -> Result<(), WebhookError> {
    let encoded = header
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or_else(|| WebhookError::InvalidSignatureFormat("missing sha256= prefix".into()))?;

    let provided = hex::decode(encoded)
        .map_err(|e| WebhookError::InvalidSignatureFormat(format!("invalid hex: {e}")))?;

    let expected = digest(secret, payload);

    if expected.len() != provided.len() {
        return Err(WebhookError::InvalidSignature);
    }
    if bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
        Ok(())
    } else {
        Err(WebhookError::InvalidSignature)
    }
}
