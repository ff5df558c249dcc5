//! Payment gateway webhook signature verification.
//!
//! The gateway signs the raw request body with HMAC-SHA256 using the shared
//! webhook secret and sends the lowercase hex digest in a header.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::webhook_errors::WebhookError;
use super::GatewayWebhook;

type HmacSha256 = Hmac<Sha256>;

/// Returns true when `signature_header` is the hex HMAC-SHA256 of `raw_body`.
///
/// Comparison is constant-time. Malformed hex or an empty secret never
/// verify.
pub fn verify_signature(raw_body: &[u8], signature_header: &str, secret: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    let Ok(provided) = hex::decode(signature_header.trim()) else {
        return false;
    };
    let Some(expected) = compute_signature(raw_body, secret) else {
        return false;
    };
    constant_time_compare(&expected, &provided)
}

/// Hex-encoded signature for `raw_body`, as the gateway would send it.
pub fn sign(raw_body: &[u8], secret: &str) -> Option<String> {
    compute_signature(raw_body, secret).map(hex::encode)
}

fn compute_signature(raw_body: &[u8], secret: &str) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(raw_body);
    Some(mac.finalize().into_bytes().to_vec())
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Verifier bound to one webhook secret.
#[derive(Clone)]
pub struct GatewaySignatureVerifier {
    secret: String,
}

impl GatewaySignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn verify(&self, raw_body: &[u8], signature_header: &str) -> bool {
        verify_signature(raw_body, signature_header, &self.secret)
    }

    /// Verifies the signature and parses the payload.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - signature missing or wrong
    /// - `ParseError` - body is not a webhook payload
    pub fn verify_and_parse(
        &self,
        raw_body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<GatewayWebhook, WebhookError> {
        let header = signature_header.ok_or(WebhookError::InvalidSignature)?;
        if !self.verify(raw_body, header) {
            return Err(WebhookError::InvalidSignature);
        }
        serde_json::from_slice(raw_body).map_err(|e| WebhookError::ParseError(e.to_string()))
    }
}

impl std::fmt::Debug for GatewaySignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySignatureVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_funbookr_test";
    const BODY: &[u8] = br#"{"event":"payment.captured","payload":{}}"#;

    #[test]
    fn valid_signature_verifies() {
        let signature = sign(BODY, SECRET).unwrap();
        assert!(verify_signature(BODY, &signature, SECRET));
    }

    #[test]
    fn signature_with_surrounding_whitespace_verifies() {
        let signature = format!(" {}\n", sign(BODY, SECRET).unwrap());
        assert!(verify_signature(BODY, &signature, SECRET));
    }

    #[test]
    fn tampered_body_fails() {
        let signature = sign(BODY, SECRET).unwrap();
        assert!(!verify_signature(br#"{"event":"payment.failed"}"#, &signature, SECRET));
    }

    #[test]
    fn wrong_secret_fails() {
        let signature = sign(BODY, "other").unwrap();
        assert!(!verify_signature(BODY, &signature, SECRET));
    }

    #[test]
    fn malformed_or_truncated_signatures_fail() {
        let signature = sign(BODY, SECRET).unwrap();
        assert!(!verify_signature(BODY, "not-hex", SECRET));
        assert!(!verify_signature(BODY, &signature[..32], SECRET));
        assert!(!verify_signature(BODY, "", SECRET));
    }

    #[test]
    fn empty_secret_never_verifies() {
        let signature = sign(BODY, "").unwrap();
        assert!(!verify_signature(BODY, &signature, ""));
    }

    #[test]
    fn verify_and_parse_requires_header() {
        let verifier = GatewaySignatureVerifier::new(SECRET);
        let result = verifier.verify_and_parse(BODY, None);
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_and_parse_rejects_signed_garbage() {
        let verifier = GatewaySignatureVerifier::new(SECRET);
        let body = b"not json";
        let signature = sign(body, SECRET).unwrap();
        let result = verifier.verify_and_parse(body, Some(&signature));
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn verify_and_parse_returns_event() {
        let verifier = GatewaySignatureVerifier::new(SECRET);
        let signature = sign(BODY, SECRET).unwrap();
        let webhook = verifier.verify_and_parse(BODY, Some(&signature)).unwrap();
        assert_eq!(webhook.event, "payment.captured");
    }

    #[test]
    fn debug_output_hides_secret() {
        let verifier = GatewaySignatureVerifier::new(SECRET);
        assert!(!format!("{:?}", verifier).contains(SECRET));
    }
}
