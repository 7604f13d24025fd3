//! Combinations and the per-combination override layer.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use souq_core::{AttributeId, CombinationId, Entity, ValueObject, VariantId};

use crate::attribute::ProductAttribute;
use crate::variant::{Dimensions, WeightSpec};

/// One `(attribute, chosen variant)` pair of a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub attribute_id: AttributeId,
    pub variant_id: VariantId,
}

impl ValueObject for AttributeValue {}

/// A purchasable selection of exactly one variant per attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    pub id: CombinationId,
    pub name: String,
    pub attribute_values: Vec<AttributeValue>,
    /// Price in smallest currency unit.
    pub price: u64,
    pub stock: u32,
    pub sku: String,
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<WeightSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

impl Entity for Combination {
    type Id = CombinationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// An operator edit of one editable combination field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldUpdate {
    Price(u64),
    Stock(u32),
    Sku(String),
    #[serde(rename = "isAvailable")]
    Available(bool),
}

impl FieldUpdate {
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldUpdate::Price(_) => "price",
            FieldUpdate::Stock(_) => "stock",
            FieldUpdate::Sku(_) => "sku",
            FieldUpdate::Available(_) => "isAvailable",
        }
    }
}

impl Combination {
    /// Copy of `self` with one field replaced.
    pub fn with_field(&self, update: &FieldUpdate) -> Combination {
        let mut next = self.clone();
        match update {
            FieldUpdate::Price(price) => next.price = *price,
            FieldUpdate::Stock(stock) => next.stock = *stock,
            FieldUpdate::Sku(sku) => next.sku = sku.clone(),
            FieldUpdate::Available(available) => next.is_available = *available,
        }
        next
    }

    pub fn variant_for(&self, attribute_id: &AttributeId) -> Option<VariantId> {
        self.attribute_values
            .iter()
            .find(|pair| pair.attribute_id == *attribute_id)
            .map(|pair| pair.variant_id)
    }

    /// True when this combination picks exactly one existing variant of
    /// every attribute in `attributes`, and nothing else.
    pub fn matches(&self, attributes: &[ProductAttribute]) -> bool {
        self.attribute_values.len() == attributes.len()
            && attributes.iter().all(|attribute| {
                self.variant_for(&attribute.id)
                    .is_some_and(|variant_id| attribute.variant(&variant_id).is_some())
            })
    }
}

/// Replace `update`'s field on the combination `id`, leaving the others untouched.
///
/// An unknown `id` returns the list unchanged.
pub fn update_field(
    combinations: &[Combination],
    id: &CombinationId,
    update: &FieldUpdate,
) -> Vec<Combination> {
    combinations
        .iter()
        .map(|combination| {
            if combination.id == *id {
                combination.with_field(update)
            } else {
                combination.clone()
            }
        })
        .collect()
}

/// Combinations no longer matching the current attributes.
///
/// Happens after an attribute or variant is removed (or a new attribute is
/// committed) once combinations exist. Diagnostic only.
pub fn stale_combinations(
    attributes: &[ProductAttribute],
    combinations: &[Combination],
) -> Vec<CombinationId> {
    combinations
        .iter()
        .filter(|combination| !combination.matches(attributes))
        .map(|combination| combination.id)
        .collect()
}

/// SKUs used by more than one combination, sorted.
pub fn duplicate_skus(combinations: &[Combination]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for combination in combinations {
        *counts.entry(combination.sku.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(sku, _)| sku.to_string())
        .collect()
}

/// True when no two combinations select the same tuple.
pub fn selections_are_unique(combinations: &[Combination]) -> bool {
    let mut seen = HashSet::with_capacity(combinations.len());
    combinations
        .iter()
        .all(|combination| seen.insert(combination.attribute_values.as_slice()))
}
