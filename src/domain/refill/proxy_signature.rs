//! Storefront app proxy signature verification.
//!
//! Requests routed through the storefront's app proxy carry an HMAC-SHA256
//! signature over their query parameters. Verification steps:
//!
//! 1. Drop the signature parameters (`hmac` and the legacy `signature`)
//! 2. Sort the remaining keys lexicographically
//! 3. Join repeated values with `,` and build `key=value` pairs joined by `&`
//! 4. HMAC-SHA256 the message with the app proxy secret, hex-encode it
//! 5. Compare against the supplied signature in constant time
//!
//! When a `shop` parameter is present it must also match the configured shop.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Query parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "hmac";

/// Legacy name for the signature parameter.
pub const LEGACY_SIGNATURE_PARAM: &str = "signature";

/// Query parameter naming the shop the request came through.
pub const SHOP_PARAM: &str = "shop";

/// Why a proxied request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProxyRejection {
    #[error("Missing signature")]
    MissingSignature,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Shop mismatch")]
    ShopMismatch,
}

/// Outcome of verifying one proxied request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyVerification {
    Authentic,
    Rejected(ProxyRejection),
}

impl ProxyVerification {
    pub fn is_authentic(&self) -> bool {
        matches!(self, ProxyVerification::Authentic)
    }

    /// Converts to a `Result` for `?`-style call sites.
    pub fn into_result(self) -> Result<(), ProxyRejection> {
        match self {
            ProxyVerification::Authentic => Ok(()),
            ProxyVerification::Rejected(reason) => Err(reason),
        }
    }
}

/// Builds the signed message from raw query parameters.
///
/// Signature parameters are excluded. Keys are sorted by their raw string
/// value; repeated keys have their values joined with `,` in arrival order.
pub fn canonical_message(params: &[(String, String)]) -> String {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (key, value) in params {
        if key == SIGNATURE_PARAM || key == LEGACY_SIGNATURE_PARAM {
            continue;
        }
        grouped.entry(key.as_str()).or_default().push(value.as_str());
    }

    grouped
        .iter()
        .map(|(key, values)| format!("{}={}", key, values.join(",")))
        .collect::<Vec<_>>()
        .join("&")
}

/// Compares two byte strings without short-circuiting on the first mismatch.
///
/// Lengths are compared first; equal-length inputs are compared in constant time.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Verifier for app proxy signatures.
#[derive(Clone)]
pub struct ProxySignatureVerifier {
    secret: SecretString,
    shop: Option<String>,
}

impl ProxySignatureVerifier {
    /// Creates a verifier. `shop`, when set, is the only shop accepted in a `shop` parameter.
    pub fn new(secret: SecretString, shop: Option<String>) -> Self {
        Self { secret, shop }
    }

    /// Computes the hex-encoded HMAC-SHA256 signature for `params`.
    pub fn sign(&self, params: &[(String, String)]) -> String {
        sign_message(&self.secret, &canonical_message(params))
    }

    /// Verifies a request's query parameters. Never panics on malformed input.
    pub fn verify(&self, params: &[(String, String)]) -> ProxyVerification {
        let Some(supplied) = supplied_signature(params) else {
            tracing::warn!("App proxy request without signature");
            return ProxyVerification::Rejected(ProxyRejection::MissingSignature);
        };

        let expected = self.sign(params);
        if !constant_time_compare(expected.as_bytes(), supplied.as_bytes()) {
            tracing::warn!(
                supplied_len = supplied.len(),
                "Invalid app proxy signature"
            );
            return ProxyVerification::Rejected(ProxyRejection::InvalidSignature);
        }

        if let Some(configured) = &self.shop {
            let requested = params
                .iter()
                .find(|(key, _)| key == SHOP_PARAM)
                .map(|(_, value)| value.as_str())
                .unwrap_or_default();
            if !requested.is_empty() && !requested.eq_ignore_ascii_case(configured) {
                tracing::warn!(shop = requested, "App proxy request for foreign shop");
                return ProxyVerification::Rejected(ProxyRejection::ShopMismatch);
            }
        }

        ProxyVerification::Authentic
    }
}

impl std::fmt::Debug for ProxySignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxySignatureVerifier")
            .field("secret", &"[REDACTED]")
            .field("shop", &self.shop)
            .finish()
    }
}

/// Picks the supplied signature, preferring `hmac` over the legacy name.
fn supplied_signature(params: &[(String, String)]) -> Option<&str> {
    let find = |name: &str| {
        params
            .iter()
            .find(|(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| value.as_str())
    };
    find(SIGNATURE_PARAM).or_else(|| find(LEGACY_SIGNATURE_PARAM))
}

fn sign_message(secret: &SecretString, message: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "proxy_test_secret";
    const SHOP: &str = "white-boutique-sa.myshopify.com";

    fn verifier() -> ProxySignatureVerifier {
        ProxySignatureVerifier::new(SecretString::new(SECRET.to_string()), Some(SHOP.to_string()))
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn signed(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut params = pairs(raw);
        let signature = verifier().sign(&params);
        params.push((SIGNATURE_PARAM.to_string(), signature));
        params
    }

    fn proxy_params() -> Vec<(String, String)> {
        signed(&[
            ("shop", SHOP),
            ("path_prefix", "/apps/refill"),
            ("timestamp", "1704067200"),
            ("email", "jane@example.com"),
        ])
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Canonical Message Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn canonical_message_sorts_keys() {
        let params = pairs(&[("timestamp", "1"), ("email", "a@b.c"), ("path_prefix", "/apps/x")]);
        assert_eq!(
            canonical_message(&params),
            "email=a@b.c&path_prefix=/apps/x&timestamp=1"
        );
    }

    #[test]
    fn canonical_message_drops_signature_params() {
        let params = pairs(&[("hmac", "abc"), ("signature", "def"), ("shop", "x")]);
        assert_eq!(canonical_message(&params), "shop=x");
    }

    #[test]
    fn canonical_message_joins_repeated_values() {
        let params = pairs(&[("ids", "1"), ("a", "z"), ("ids", "2"), ("ids", "3")]);
        assert_eq!(canonical_message(&params), "a=z&ids=1,2,3");
    }

    #[test]
    fn canonical_message_sorts_by_raw_bytes() {
        let params = pairs(&[("b", "1"), ("B", "2"), ("a", "3")]);
        assert_eq!(canonical_message(&params), "B=2&a=3&b=1");
    }

    #[test]
    fn canonical_message_of_nothing_is_empty() {
        assert_eq!(canonical_message(&[]), "");
    }

    #[test]
    fn sign_matches_known_vector() {
        let v = ProxySignatureVerifier::new(SecretString::new(SECRET.to_string()), None);
        let params = pairs(&[("timestamp", "1"), ("shop", "example.myshopify.com")]);
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(b"shop=example.myshopify.com&timestamp=1");
        assert_eq!(v.sign(&params), hex::encode(mac.finalize().into_bytes()));
        assert_eq!(v.sign(&params).len(), 64);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Verification Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn verify_accepts_valid_signature() {
        assert_eq!(verifier().verify(&proxy_params()), ProxyVerification::Authentic);
    }

    #[test]
    fn verify_accepts_legacy_signature_name() {
        let mut params = pairs(&[("shop", SHOP), ("timestamp", "1704067200")]);
        let signature = verifier().sign(&params);
        params.push((LEGACY_SIGNATURE_PARAM.to_string(), signature));
        assert!(verifier().verify(&params).is_authentic());
    }

    #[test]
    fn verify_prefers_hmac_over_legacy_name() {
        let mut params = proxy_params();
        params.push((LEGACY_SIGNATURE_PARAM.to_string(), "garbage".to_string()));
        assert!(verifier().verify(&params).is_authentic());
    }

    #[test]
    fn verify_rejects_missing_signature() {
        let params = pairs(&[("shop", SHOP), ("timestamp", "1")]);
        assert_eq!(
            verifier().verify(&params),
            ProxyVerification::Rejected(ProxyRejection::MissingSignature)
        );
    }

    #[test]
    fn verify_rejects_empty_signature() {
        let params = pairs(&[("shop", SHOP), ("hmac", "")]);
        assert_eq!(
            verifier().verify(&params),
            ProxyVerification::Rejected(ProxyRejection::MissingSignature)
        );
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let other = ProxySignatureVerifier::new(SecretString::new("wrong".to_string()), None);
        let mut params = pairs(&[("shop", SHOP)]);
        params.push((SIGNATURE_PARAM.to_string(), other.sign(&params)));
        assert_eq!(
            verifier().verify(&params),
            ProxyVerification::Rejected(ProxyRejection::InvalidSignature)
        );
    }

    #[test]
    fn verify_rejects_tampered_parameter() {
        let mut params = proxy_params();
        for (key, value) in params.iter_mut() {
            if key == "email" {
                *value = "mallory@example.com".to_string();
            }
        }
        assert_eq!(
            verifier().verify(&params),
            ProxyVerification::Rejected(ProxyRejection::InvalidSignature)
        );
    }

    #[test]
    fn verify_rejects_truncated_signature() {
        let mut params = proxy_params();
        let last = params.len() - 1;
        params[last].1.pop();
        assert_eq!(
            verifier().verify(&params),
            ProxyVerification::Rejected(ProxyRejection::InvalidSignature)
        );
    }

    #[test]
    fn verify_rejects_uppercase_hex() {
        let mut params = proxy_params();
        let last = params.len() - 1;
        params[last].1 = params[last].1.to_uppercase();
        assert!(!verifier().verify(&params).is_authentic());
    }

    #[test]
    fn verify_rejects_unsorted_serialization() {
        let mut params = pairs(&[("timestamp", "1704067200"), ("shop", SHOP)]);
        let unsorted = sign_message(
            &SecretString::new(SECRET.to_string()),
            "timestamp=1704067200&shop=white-boutique-sa.myshopify.com",
        );
        params.push((SIGNATURE_PARAM.to_string(), unsorted));
        assert_eq!(
            verifier().verify(&params),
            ProxyVerification::Rejected(ProxyRejection::InvalidSignature)
        );
    }

    #[test]
    fn verify_accepts_shop_in_other_case() {
        let params = signed(&[("shop", "White-Boutique-SA.myshopify.com")]);
        assert!(verifier().verify(&params).is_authentic());
    }

    #[test]
    fn verify_rejects_foreign_shop() {
        let params = signed(&[("shop", "someone-else.myshopify.com")]);
        assert_eq!(
            verifier().verify(&params),
            ProxyVerification::Rejected(ProxyRejection::ShopMismatch)
        );
    }

    #[test]
    fn verify_allows_missing_shop_param() {
        let params = signed(&[("timestamp", "1")]);
        assert!(verifier().verify(&params).is_authentic());
    }

    #[test]
    fn verification_into_result() {
        assert_eq!(ProxyVerification::Authentic.into_result(), Ok(()));
        assert_eq!(
            ProxyVerification::Rejected(ProxyRejection::ShopMismatch).into_result(),
            Err(ProxyRejection::ShopMismatch)
        );
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", verifier());
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("[REDACTED]"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Constant-Time Compare Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_equal_values() {
        assert!(constant_time_compare(b"abcdef", b"abcdef"));
    }

    #[test]
    fn constant_time_compare_different_values() {
        assert!(!constant_time_compare(b"abcdef", b"abcdeg"));
    }

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(b"abc", b"abcd"));
    }

    #[test]
    fn constant_time_compare_empty_slices() {
        assert!(constant_time_compare(b"", b""));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Properties
    // ════════════════════════════════════════════════════════════════════════════

    fn arb_params() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec(("[a-z_]{1,10}", "[A-Za-z0-9@./:_-]{0,16}"), 0..6).prop_map(
            |params| {
                params
                    .into_iter()
                    .filter(|(k, _)| {
                        k != SIGNATURE_PARAM && k != LEGACY_SIGNATURE_PARAM && k != SHOP_PARAM
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn valid_signatures_always_verify(params in arb_params()) {
            let mut params = params;
            let signature = verifier().sign(&params);
            params.push((SIGNATURE_PARAM.to_string(), signature));
            prop_assert!(verifier().verify(&params).is_authentic());
        }

        #[test]
        fn any_single_character_flip_is_rejected(params in arb_params(), index in 0usize..64) {
            let mut params = params;
            let signature = verifier().sign(&params);
            let mut chars: Vec<char> = signature.chars().collect();
            chars[index] = if chars[index] == '0' { '1' } else { '0' };
            params.push((SIGNATURE_PARAM.to_string(), chars.into_iter().collect()));
            prop_assert_eq!(
                verifier().verify(&params),
                ProxyVerification::Rejected(ProxyRejection::InvalidSignature)
            );
        }
    }
}
