//! Combination generator: cartesian product of variants across attributes.
//!
//! Enumeration is an iterative mixed-radix counter over per-attribute variant
//! indices. The first attribute varies slowest and the last fastest, so the
//! output order follows the input order of attributes and variants.

use souq_core::{CombinationId, DomainError, DomainResult};

use crate::attribute::ProductAttribute;
use crate::combination::{AttributeValue, Combination};
use crate::config::EngineConfig;
use crate::sku::SkuSynthesizer;

/// Fewer attributes than this cannot be turned into combinations.
pub const MIN_ATTRIBUTES: usize = 2;

/// Odometer over index tuples `[d0, .., dn]` with `0 <= di < radices[i]`.
///
/// Yields nothing when any radix is zero and a single empty tuple when there
/// are no radices at all.
#[derive(Debug, Clone)]
pub struct MixedRadix {
    radices: Vec<usize>,
    digits: Vec<usize>,
    exhausted: bool,
}

impl MixedRadix {
    pub fn new(radices: Vec<usize>) -> Self {
        let exhausted = radices.contains(&0);
        let digits = vec![0; radices.len()];
        Self {
            radices,
            digits,
            exhausted,
        }
    }
}

impl Iterator for MixedRadix {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let current = self.digits.clone();

        // Increment from the rightmost digit, carrying leftwards.
        let mut pos = self.digits.len();
        loop {
            if pos == 0 {
                self.exhausted = true;
                break;
            }
            pos -= 1;
            self.digits[pos] += 1;
            if self.digits[pos] < self.radices[pos] {
                break;
            }
            self.digits[pos] = 0;
        }

        Some(current)
    }
}

/// Number of combinations `attributes` expand to, `None` on overflow.
pub fn count_combinations(attributes: &[ProductAttribute]) -> Option<usize> {
    attributes
        .iter()
        .try_fold(1usize, |acc, attribute| acc.checked_mul(attribute.variants.len()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationGenerator {
    separator: String,
}

impl Default for CombinationGenerator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl CombinationGenerator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            separator: config.name_separator.clone(),
        }
    }

    /// Enumerate every variant tuple of `attributes`.
    ///
    /// Each combination starts at `base_price`, zero stock, available, with a
    /// freshly synthesized SKU. Variant price deltas are not added in. The
    /// result is meant to replace any previous combination list wholesale.
    pub fn generate(
        &self,
        attributes: &[ProductAttribute],
        base_price: u64,
        sku: &SkuSynthesizer,
    ) -> DomainResult<Vec<Combination>> {
        if attributes.len() < MIN_ATTRIBUTES {
            return Err(DomainError::precondition(format!(
                "at least {MIN_ATTRIBUTES} attributes are required to generate combinations (got {})",
                attributes.len()
            )));
        }
        if let Some(empty) = attributes.iter().find(|a| a.variants.is_empty()) {
            return Err(DomainError::precondition(format!(
                "attribute '{}' has no variants",
                empty.name
            )));
        }
        let total = count_combinations(attributes)
            .ok_or_else(|| DomainError::precondition("too many combinations to enumerate"))?;

        let radices = attributes.iter().map(|a| a.variants.len()).collect();
        let mut combinations = Vec::with_capacity(total);

        for (ordinal, digits) in MixedRadix::new(radices).enumerate() {
            let chosen: Vec<_> = attributes
                .iter()
                .zip(digits)
                .map(|(attribute, idx)| (attribute, &attribute.variants[idx]))
                .collect();

            let name = chosen
                .iter()
                .map(|(_, variant)| variant.name.as_str())
                .collect::<Vec<_>>()
                .join(&self.separator);
            let attribute_values: Vec<AttributeValue> = chosen
                .iter()
                .map(|(attribute, variant)| AttributeValue {
                    attribute_id: attribute.id,
                    variant_id: variant.id,
                })
                .collect();
            let id = CombinationId::derive(
                attribute_values
                    .iter()
                    .map(|pair| (&pair.attribute_id, &pair.variant_id)),
            );

            combinations.push(Combination {
                id,
                name,
                attribute_values,
                price: base_price,
                stock: 0,
                sku: sku.combination_sku(ordinal + 1),
                is_available: true,
                weight: None,
                dimensions: None,
            });
        }

        tracing::debug!(
            attributes = attributes.len(),
            combinations = combinations.len(),
            "generated variant combinations"
        );
        Ok(combinations)
    }
}

/// [`CombinationGenerator::generate`] with the default configuration.
pub fn generate(
    attributes: &[ProductAttribute],
    base_price: u64,
    sku: &SkuSynthesizer,
) -> DomainResult<Vec<Combination>> {
    CombinationGenerator::default().generate(attributes, base_price, sku)
}
