//! Product variant combination engine.
//!
//! Attributes (axes such as Color or Size) own ordered variants. Once at
//! least two attributes are committed, the generator expands them into every
//! variant combination, which the operator can then edit one field at a time.
//! Everything here is deterministic domain logic (no IO, no HTTP, no storage).

pub mod attribute;
pub mod combination;
pub mod config;
pub mod draft;
pub mod generator;
pub mod payload;
pub mod sku;
pub mod variant;

pub use attribute::{AttributeDraft, AttributeSet, ProductAttribute};
pub use combination::{
    AttributeValue, Combination, FieldUpdate, duplicate_skus, selections_are_unique,
    stale_combinations, update_field,
};
pub use config::{EngineConfig, SkuConfig};
pub use draft::{
    AddVariant, AttributeCommitted, AttributeDescribed, AttributeRemoved, CombinationUpdated,
    CombinationsGenerated, CommitAttribute, DescribeAttribute, GenerateCombinations,
    ProductDetailsSet, ProductDraft, ProductDraftCommand, ProductDraftEvent, RemoveAttribute,
    RemoveVariant, SetProductDetails, UpdateCombination, VariantAdded, VariantRemoved,
    VariantsPhase,
};
pub use generator::{CombinationGenerator, MIN_ATTRIBUTES, MixedRadix, count_combinations, generate};
pub use payload::VariantsPayload;
pub use sku::SkuSynthesizer;
pub use variant::{
    AttributeType, Dimensions, HexColor, LengthUnit, Variant, VariantDetails, VariantInput,
    WeightSpec, WeightUnit,
};
