//! SKU synthesis for variants and combinations left without one.
//!
//! Format: `<PREFIX>-<unix millis>` for variants and
//! `<PREFIX>-<unix millis>-<ordinal>` for generated combinations. Nothing
//! checks the result against SKUs already in use, so two operations within
//! the same millisecond can collide (see [`crate::duplicate_skus`]).

use chrono::{DateTime, Utc};

use crate::config::SkuConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuSynthesizer {
    prefix: String,
    millis: i64,
}

impl SkuSynthesizer {
    pub fn new(config: &SkuConfig, product_name: &str, at: DateTime<Utc>) -> Self {
        let prefix: String = product_name
            .chars()
            .filter(|c| !c.is_whitespace())
            .take(config.prefix_len)
            .flat_map(char::to_uppercase)
            .collect();
        let prefix = if prefix.is_empty() {
            config.fallback_prefix.clone()
        } else {
            prefix
        };
        Self {
            prefix,
            millis: at.timestamp_millis(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn variant_sku(&self) -> String {
        format!("{}-{}", self.prefix, self.millis)
    }

    /// SKU of the `ordinal`-th (1-based) combination of one generation run.
    pub fn combination_sku(&self, ordinal: usize) -> String {
        format!("{}-{}-{}", self.prefix, self.millis, ordinal)
    }
}
