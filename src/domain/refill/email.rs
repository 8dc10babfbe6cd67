//! Customer email value object.

use std::fmt;

use super::errors::RefillError;

/// Trims surrounding whitespace and lower-cases an email address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A normalized, non-empty customer email address.
///
/// This is the only form in which an email reaches the customer directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerEmail(String);

impl CustomerEmail {
    /// Normalizes `raw` and rejects it if nothing is left.
    ///
    /// # Errors
    ///
    /// Returns `RefillError::Validation` for a missing or blank email.
    pub fn parse(raw: Option<&str>) -> Result<Self, RefillError> {
        let normalized = normalize_email(raw.unwrap_or_default());
        if normalized.is_empty() {
            return Err(RefillError::validation("email", "Email required"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a log-safe form (`j***@example.com`).
    pub fn redacted(&self) -> String {
        match self.0.split_once('@') {
            Some((local, domain)) => {
                let first = local.chars().next().map(String::from).unwrap_or_default();
                format!("{}***@{}", first, domain)
            }
            None => "***".to_string(),
        }
    }
}

impl fmt::Display for CustomerEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
