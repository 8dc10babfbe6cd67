//! Refill eligibility rules.
//!
//! Eligibility is a pure function of the customer record returned by the
//! directory and the configured tag / variant pair.

use serde::{Deserialize, Serialize};

/// Read-only view of a storefront customer, fetched fresh per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CustomerRecord {
    /// Returns true if any tag equals `tag` after Unicode lower-casing both sides.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }
}

/// Why a customer was not offered a refill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibleReason {
    CustomerNotFound,
    MissingTag,
}

impl IneligibleReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IneligibleReason::CustomerNotFound => "customer_not_found",
            IneligibleReason::MissingTag => "missing_tag",
        }
    }
}

/// Result of a successful eligibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityOutcome {
    /// No customer matched the email.
    NotFound,
    /// A customer matched but lacks the eligible tag.
    Ineligible { reason: IneligibleReason },
    /// The customer may refill via `checkout_url`.
    Eligible { checkout_url: String },
}

impl EligibilityOutcome {
    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityOutcome::Eligible { .. })
    }

    /// Reason reported for a negative answer, if any.
    pub fn reason(&self) -> Option<IneligibleReason> {
        match self {
            EligibilityOutcome::NotFound => Some(IneligibleReason::CustomerNotFound),
            EligibilityOutcome::Ineligible { reason } => Some(*reason),
            EligibilityOutcome::Eligible { .. } => None,
        }
    }

    pub fn checkout_url(&self) -> Option<&str> {
        match self {
            EligibilityOutcome::Eligible { checkout_url } => Some(checkout_url),
            _ => None,
        }
    }
}

/// Builds the cart permalink that adds one unit of `variant_id` and jumps to checkout.
pub fn checkout_url(variant_id: &str) -> String {
    format!("/cart/{}:1?checkout", variant_id)
}

/// The business constants that decide eligibility for one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityPolicy {
    eligible_tag: String,
    variant_id: String,
}

impl EligibilityPolicy {
    pub fn new(eligible_tag: impl Into<String>, variant_id: impl Into<String>) -> Self {
        Self {
            eligible_tag: eligible_tag.into(),
            variant_id: variant_id.into(),
        }
    }

    /// Decides eligibility for the (possibly absent) customer record.
    pub fn evaluate(&self, customer: Option<&CustomerRecord>) -> EligibilityOutcome {
        match customer {
            None => EligibilityOutcome::NotFound,
            Some(customer) if customer.has_tag(&self.eligible_tag) => {
                EligibilityOutcome::Eligible {
                    checkout_url: checkout_url(&self.variant_id),
                }
            }
            Some(_) => EligibilityOutcome::Ineligible {
                reason: IneligibleReason::MissingTag,
            },
        }
    }
}
