//! Variants section of the product creation payload.

use serde::{Deserialize, Serialize};

use crate::attribute::ProductAttribute;
use crate::combination::Combination;

/// Embedded as-is in the body sent to the product creation API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsPayload {
    pub has_variants: bool,
    pub attributes: Vec<ProductAttribute>,
    pub variant_combinations: Vec<Combination>,
}

impl VariantsPayload {
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
