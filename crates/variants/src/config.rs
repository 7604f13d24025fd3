//! Engine configuration.
//!
//! Read from the process environment by binaries; library code takes an
//! explicit [`EngineConfig`].

pub const ENV_SEPARATOR: &str = "SOUQ_COMBINATION_SEPARATOR";
pub const ENV_SKU_PREFIX_LEN: &str = "SOUQ_SKU_PREFIX_LEN";
pub const ENV_SKU_FALLBACK_PREFIX: &str = "SOUQ_SKU_FALLBACK_PREFIX";

pub const DEFAULT_SEPARATOR: &str = " - ";
pub const DEFAULT_SKU_PREFIX_LEN: usize = 3;
pub const DEFAULT_SKU_FALLBACK_PREFIX: &str = "SKU";

/// SKU synthesis settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuConfig {
    /// Number of product-name characters used as the SKU prefix.
    pub prefix_len: usize,
    /// Prefix used when the product name yields no characters.
    pub fallback_prefix: String,
}

impl Default for SkuConfig {
    fn default() -> Self {
        Self {
            prefix_len: DEFAULT_SKU_PREFIX_LEN,
            fallback_prefix: DEFAULT_SKU_FALLBACK_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Joins variant names into a combination name.
    pub name_separator: String,
    pub sku: SkuConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name_separator: DEFAULT_SEPARATOR.to_string(),
            sku: SkuConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides through `lookup`; unusable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(separator) = lookup(ENV_SEPARATOR) {
            if separator.is_empty() {
                tracing::warn!("{ENV_SEPARATOR} is empty; using default {DEFAULT_SEPARATOR:?}");
            } else {
                config.name_separator = separator;
            }
        }

        if let Some(raw) = lookup(ENV_SKU_PREFIX_LEN) {
            match raw.trim().parse::<usize>() {
                Ok(len) if len > 0 => config.sku.prefix_len = len,
                _ => tracing::warn!(
                    "{ENV_SKU_PREFIX_LEN}={raw:?} is not a positive integer; using default {DEFAULT_SKU_PREFIX_LEN}"
                ),
            }
        }

        if let Some(prefix) = lookup(ENV_SKU_FALLBACK_PREFIX) {
            let prefix = prefix.trim();
            if prefix.is_empty() {
                tracing::warn!(
                    "{ENV_SKU_FALLBACK_PREFIX} is empty; using default {DEFAULT_SKU_FALLBACK_PREFIX:?}"
                );
            } else {
                config.sku.fallback_prefix = prefix.to_string();
            }
        }

        config
    }
}
