//! Refill business constants

use serde::Deserialize;

/// Refill business configuration (single-valued per deployment)
#[derive(Debug, Clone, Deserialize)]
pub struct RefillConfig {
    /// Customer tag that grants refill eligibility
    #[serde(default = "default_eligible_tag")]
    pub eligible_tag: String,

    /// Product variant added to the cart for a refill
    #[serde(default = "default_variant_id")]
    pub variant_id: String,
}

impl RefillConfig {
    /// Eligible tag, if non-blank
    pub fn eligible_tag(&self) -> Option<&str> {
        Some(self.eligible_tag.trim()).filter(|tag| !tag.is_empty())
    }

    /// Variant id, if non-blank
    pub fn variant_id(&self) -> Option<&str> {
        Some(self.variant_id.trim()).filter(|id| !id.is_empty())
    }
}

impl Default for RefillConfig {
    fn default() -> Self {
        Self {
            eligible_tag: default_eligible_tag(),
            variant_id: default_variant_id(),
        }
    }
}

fn default_eligible_tag() -> String {
    "refill_eligible".to_string()
}

fn default_variant_id() -> String {
    "8084838154410".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RefillConfig::default();
        assert_eq!(config.eligible_tag(), Some("refill_eligible"));
        assert_eq!(config.variant_id(), Some("8084838154410"));
    }

    #[test]
    fn test_blank_tag_is_missing() {
        let config = RefillConfig {
            eligible_tag: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.eligible_tag(), None);
    }

    #[test]
    fn test_blank_variant_is_missing() {
        let config = RefillConfig {
            variant_id: String::new(),
            ..Default::default()
        };
        assert_eq!(config.variant_id(), None);
    }
}
