//! App proxy configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// App proxy signing configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    /// Shared secret used to sign proxied requests
    pub secret: Option<SecretString>,

    /// Require a valid proxy signature on the direct `/refill/check` route too
    #[serde(default)]
    pub require_signature: bool,
}

impl ProxyConfig {
    /// Signing secret, if set and non-blank
    pub fn secret(&self) -> Option<&SecretString> {
        self.secret
            .as_ref()
            .filter(|secret| !secret.expose_secret().is_empty())
    }
}
