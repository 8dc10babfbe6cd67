//! Mock customer directory for testing.
//!
//! Provides a configurable implementation of `CustomerDirectory` for unit
//! and integration tests. Supports:
//! - A pre-configured customer (or none)
//! - Error injection
//! - Call tracking, to prove when no lookup happened

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::refill::{CustomerEmail, CustomerRecord};
use crate::ports::{CustomerDirectory, DirectoryError};

/// Mock customer directory for testing.
///
/// Clones share state, so a test can keep one handle and give another to
/// the code under test.
///
/// # Example
///
/// ```ignore
/// let mock = MockCustomerDirectory::with_tags(&["refill_eligible"]);
/// let handler = CheckEligibilityHandler::new(Arc::new(mock.clone()), config);
/// handler.handle(query).await?;
/// assert_eq!(mock.call_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockCustomerDirectory {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Customer returned by every lookup.
    customer: Option<CustomerRecord>,

    /// Error returned instead of the customer.
    error: Option<DirectoryError>,

    /// Emails looked up, in call order.
    lookups: Vec<String>,
}

impl MockCustomerDirectory {
    /// A directory with no customers.
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory holding one customer with the given tags.
    pub fn with_tags(tags: &[&str]) -> Self {
        let mock = Self::new();
        mock.set_customer(CustomerRecord {
            id: "gid://shopify/Customer/1001".to_string(),
            email: Some("jane@example.com".to_string()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
        mock
    }

    /// A directory whose lookups fail with `error`.
    pub fn failing(error: DirectoryError) -> Self {
        let mock = Self::new();
        mock.set_error(error);
        mock
    }

    pub fn set_customer(&self, customer: CustomerRecord) {
        self.inner.lock().unwrap().customer = Some(customer);
    }

    pub fn set_error(&self, error: DirectoryError) {
        self.inner.lock().unwrap().error = Some(error);
    }

    /// Number of lookups performed so far.
    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().lookups.len()
    }

    /// Emails looked up so far.
    pub fn lookups(&self) -> Vec<String> {
        self.inner.lock().unwrap().lookups.clone()
    }
}

#[async_trait]
impl CustomerDirectory for MockCustomerDirectory {
    async fn find_by_email(
        &self,
        email: &CustomerEmail,
    ) -> Result<Option<CustomerRecord>, DirectoryError> {
        let mut state = self.inner.lock().unwrap();
        state.lookups.push(email.as_str().to_string());

        if let Some(error) = &state.error {
            return Err(error.clone());
        }
        Ok(state.customer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> CustomerEmail {
        CustomerEmail::parse(Some("jane@example.com")).unwrap()
    }

    #[tokio::test]
    async fn empty_directory_returns_none() {
        let mock = MockCustomerDirectory::new();
        assert_eq!(mock.find_by_email(&email()).await, Ok(None));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn returns_configured_customer() {
        let mock = MockCustomerDirectory::with_tags(&["vip"]);
        let customer = mock.find_by_email(&email()).await.unwrap().unwrap();
        assert_eq!(customer.tags, vec!["vip"]);
    }

    #[tokio::test]
    async fn returns_injected_error() {
        let mock = MockCustomerDirectory::failing(DirectoryError::Timeout);
        assert_eq!(
            mock.find_by_email(&email()).await,
            Err(DirectoryError::Timeout)
        );
    }

    #[tokio::test]
    async fn clones_share_call_log() {
        let mock = MockCustomerDirectory::new();
        let handle = mock.clone();
        mock.find_by_email(&email()).await.unwrap();
        assert_eq!(handle.lookups(), vec!["jane@example.com"]);
    }
}
