//! CheckEligibilityHandler - Query handler for refill eligibility.
//!
//! Steps, in order, all before the single directory call:
//! 1. Required settings present (shop, admin token, tag, variant, proxy secret when signed)
//! 2. App proxy signature valid (signed access only)
//! 3. Email given exactly once and non-empty after normalization

use std::sync::Arc;

use secrecy::SecretString;

use crate::config::AppConfig;
use crate::domain::refill::{
    CustomerEmail, EligibilityOutcome, EligibilityPolicy, ProxySignatureVerifier, RefillError,
};
use crate::ports::CustomerDirectory;

/// Query parameter holding the customer email.
pub const EMAIL_PARAM: &str = "email";

/// How a request reached the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Called directly; no signature required.
    Direct,
    /// Routed through the storefront app proxy; signature required.
    ProxySigned,
}

/// Query to check whether a customer may refill.
#[derive(Debug, Clone)]
pub struct CheckEligibilityQuery {
    /// Raw query parameters in arrival order.
    pub params: Vec<(String, String)>,
    pub access_mode: AccessMode,
}

impl CheckEligibilityQuery {
    pub fn new(params: Vec<(String, String)>, access_mode: AccessMode) -> Self {
        Self {
            params,
            access_mode,
        }
    }

    /// The `email` parameter, unnormalized.
    ///
    /// A repeated `email` key is rejected: the signature covers every value,
    /// so picking one of them would look up an address the caller never singled out.
    pub fn email(&self) -> Result<Option<&str>, RefillError> {
        let mut values = self
            .params
            .iter()
            .filter(|(key, _)| key == EMAIL_PARAM)
            .map(|(_, value)| value.as_str());

        let first = values.next();
        if values.next().is_some() {
            return Err(RefillError::validation(EMAIL_PARAM, "Email must be given once"));
        }
        Ok(first)
    }
}

/// Handler for refill eligibility checks.
///
/// Holds no per-request state; every call performs a fresh lookup.
pub struct CheckEligibilityHandler {
    directory: Arc<dyn CustomerDirectory>,
    config: Arc<AppConfig>,
}

impl CheckEligibilityHandler {
    pub fn new(directory: Arc<dyn CustomerDirectory>, config: Arc<AppConfig>) -> Self {
        Self { directory, config }
    }

    pub async fn handle(
        &self,
        query: CheckEligibilityQuery,
    ) -> Result<EligibilityOutcome, RefillError> {
        let policy = self.policy()?;

        if query.access_mode == AccessMode::ProxySigned {
            self.proxy_verifier()?
                .verify(&query.params)
                .into_result()
                .map_err(RefillError::Authentication)?;
        }

        let email = CustomerEmail::parse(query.email()?)?;

        let customer = self.directory.find_by_email(&email).await?;
        let outcome = policy.evaluate(customer.as_ref());

        tracing::debug!(
            email = %email.redacted(),
            eligible = outcome.is_eligible(),
            reason = outcome.reason().map(|r| r.as_str()),
            "Refill eligibility resolved"
        );

        Ok(outcome)
    }

    /// Resolves the eligibility policy, failing on any missing setting.
    fn policy(&self) -> Result<EligibilityPolicy, RefillError> {
        let shopify = &self.config.shopify;
        shopify
            .shop_host()
            .ok_or(RefillError::Configuration("shopify.shop"))?;
        shopify
            .admin_token()
            .ok_or(RefillError::Configuration("shopify.admin_token"))?;

        let refill = &self.config.refill;
        let tag = refill
            .eligible_tag()
            .ok_or(RefillError::Configuration("refill.eligible_tag"))?;
        let variant_id = refill
            .variant_id()
            .ok_or(RefillError::Configuration("refill.variant_id"))?;

        Ok(EligibilityPolicy::new(tag, variant_id))
    }

    fn proxy_verifier(&self) -> Result<ProxySignatureVerifier, RefillError> {
        let secret: &SecretString = self
            .config
            .proxy
            .secret()
            .ok_or(RefillError::Configuration("proxy.secret"))?;
        let shop = self.config.shopify.shop_host().map(str::to_string);
        Ok(ProxySignatureVerifier::new(secret.clone(), shop))
    }
}
