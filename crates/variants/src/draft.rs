//! Product draft aggregate: the variants section of the product form.
//!
//! Commands are validated by `handle` (pure, returns events) and state evolves
//! only through `apply`. Removals and updates aimed at unknown ids are silent
//! no-ops: `handle` returns no events for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use souq_core::{
    Aggregate, AggregateRoot, AttributeId, CombinationId, DomainError, Event, ProductId,
    VariantId, find_by_id,
};

use crate::attribute::{AttributeDraft, AttributeSet, ProductAttribute};
use crate::combination::{
    Combination, FieldUpdate, duplicate_skus, stale_combinations, update_field,
};
use crate::config::EngineConfig;
use crate::generator::{CombinationGenerator, MIN_ATTRIBUTES};
use crate::payload::VariantsPayload;
use crate::sku::SkuSynthesizer;
use crate::variant::{AttributeType, Variant, VariantInput};

/// Where the operator is in the variants workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantsPhase {
    NoVariants,
    BuildingAttribute,
    AttributeListed,
    CombinationsGenerated,
    CombinationsEdited,
}

/// Aggregate root: ProductDraft.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    id: ProductId,
    config: EngineConfig,
    product_name: String,
    base_price: u64,
    attribute_draft: AttributeDraft,
    attributes: AttributeSet,
    combinations: Vec<Combination>,
    phase: VariantsPhase,
    version: u64,
}

impl ProductDraft {
    /// Fresh draft with the default engine configuration.
    pub fn empty(id: ProductId) -> Self {
        Self::with_config(id, EngineConfig::default())
    }

    pub fn with_config(id: ProductId, config: EngineConfig) -> Self {
        Self {
            id,
            config,
            product_name: String::new(),
            base_price: 0,
            attribute_draft: AttributeDraft::default(),
            attributes: AttributeSet::new(),
            combinations: Vec::new(),
            phase: VariantsPhase::NoVariants,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn base_price(&self) -> u64 {
        self.base_price
    }

    pub fn attribute_draft(&self) -> &AttributeDraft {
        &self.attribute_draft
    }

    pub fn attributes(&self) -> &[ProductAttribute] {
        self.attributes.as_slice()
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn combination(&self, id: &CombinationId) -> Option<&Combination> {
        find_by_id(&self.combinations, id)
    }

    pub fn phase(&self) -> VariantsPhase {
        self.phase
    }

    pub fn has_variants(&self) -> bool {
        self.attributes.has_variants()
    }

    /// Generation is offered once enough attributes are listed.
    pub fn can_generate(&self) -> bool {
        self.attributes.len() >= MIN_ATTRIBUTES
    }

    /// Combinations left behind by attribute changes after generation.
    ///
    /// They are kept as-is until the operator regenerates.
    pub fn stale_combinations(&self) -> Vec<CombinationId> {
        stale_combinations(self.attributes.as_slice(), &self.combinations)
    }

    /// The variants part of the product creation payload.
    pub fn variants_payload(&self) -> VariantsPayload {
        VariantsPayload {
            has_variants: self.has_variants(),
            attributes: self.attributes.as_slice().to_vec(),
            variant_combinations: self.combinations.clone(),
        }
    }

    fn sku_synthesizer(&self, at: DateTime<Utc>) -> SkuSynthesizer {
        SkuSynthesizer::new(&self.config.sku, &self.product_name, at)
    }
}

impl AggregateRoot for ProductDraft {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: SetProductDetails (name feeds SKU prefixes, price seeds combinations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetProductDetails {
    pub product_id: ProductId,
    pub name: String,
    pub base_price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DescribeAttribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribeAttribute {
    pub product_id: ProductId,
    pub name: String,
    pub display_name: String,
    pub attribute_type: AttributeType,
    pub is_required: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddVariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddVariant {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub input: VariantInput,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveVariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveVariant {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CommitAttribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAttribute {
    pub product_id: ProductId,
    pub attribute_id: AttributeId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveAttribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveAttribute {
    pub product_id: ProductId,
    pub attribute_id: AttributeId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: GenerateCombinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateCombinations {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateCombination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCombination {
    pub product_id: ProductId,
    pub combination_id: CombinationId,
    pub update: FieldUpdate,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductDraftCommand {
    SetProductDetails(SetProductDetails),
    DescribeAttribute(DescribeAttribute),
    AddVariant(AddVariant),
    RemoveVariant(RemoveVariant),
    CommitAttribute(CommitAttribute),
    RemoveAttribute(RemoveAttribute),
    GenerateCombinations(GenerateCombinations),
    UpdateCombination(UpdateCombination),
}

/// Event: ProductDetailsSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetailsSet {
    pub product_id: ProductId,
    pub name: String,
    pub base_price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AttributeDescribed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescribed {
    pub product_id: ProductId,
    pub name: String,
    pub display_name: String,
    pub attribute_type: AttributeType,
    pub is_required: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VariantAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantAdded {
    pub product_id: ProductId,
    pub variant: Variant,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VariantRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRemoved {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AttributeCommitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeCommitted {
    pub product_id: ProductId,
    pub attribute: ProductAttribute,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AttributeRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRemoved {
    pub product_id: ProductId,
    pub attribute_id: AttributeId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CombinationsGenerated (carries the full replacement list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationsGenerated {
    pub product_id: ProductId,
    pub combinations: Vec<Combination>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CombinationUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationUpdated {
    pub product_id: ProductId,
    pub combination_id: CombinationId,
    pub update: FieldUpdate,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductDraftEvent {
    ProductDetailsSet(ProductDetailsSet),
    AttributeDescribed(AttributeDescribed),
    VariantAdded(VariantAdded),
    VariantRemoved(VariantRemoved),
    AttributeCommitted(AttributeCommitted),
    AttributeRemoved(AttributeRemoved),
    CombinationsGenerated(CombinationsGenerated),
    CombinationUpdated(CombinationUpdated),
}

impl Event for ProductDraftEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductDraftEvent::ProductDetailsSet(_) => "products.draft.details_set",
            ProductDraftEvent::AttributeDescribed(_) => "products.draft.attribute_described",
            ProductDraftEvent::VariantAdded(_) => "products.draft.variant_added",
            ProductDraftEvent::VariantRemoved(_) => "products.draft.variant_removed",
            ProductDraftEvent::AttributeCommitted(_) => "products.draft.attribute_committed",
            ProductDraftEvent::AttributeRemoved(_) => "products.draft.attribute_removed",
            ProductDraftEvent::CombinationsGenerated(_) => "products.draft.combinations_generated",
            ProductDraftEvent::CombinationUpdated(_) => "products.draft.combination_updated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductDraftEvent::ProductDetailsSet(e) => e.occurred_at,
            ProductDraftEvent::AttributeDescribed(e) => e.occurred_at,
            ProductDraftEvent::VariantAdded(e) => e.occurred_at,
            ProductDraftEvent::VariantRemoved(e) => e.occurred_at,
            ProductDraftEvent::AttributeCommitted(e) => e.occurred_at,
            ProductDraftEvent::AttributeRemoved(e) => e.occurred_at,
            ProductDraftEvent::CombinationsGenerated(e) => e.occurred_at,
            ProductDraftEvent::CombinationUpdated(e) => e.occurred_at,
        }
    }
}

impl Aggregate for ProductDraft {
    type Command = ProductDraftCommand;
    type Event = ProductDraftEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductDraftEvent::ProductDetailsSet(e) => {
                self.product_name = e.name.clone();
                self.base_price = e.base_price;
            }
            ProductDraftEvent::AttributeDescribed(e) => {
                self.attribute_draft.describe(
                    e.name.clone(),
                    e.display_name.clone(),
                    e.attribute_type,
                    e.is_required,
                );
                self.phase = VariantsPhase::BuildingAttribute;
            }
            ProductDraftEvent::VariantAdded(e) => {
                self.attribute_draft.push_variant(e.variant.clone());
                self.phase = VariantsPhase::BuildingAttribute;
            }
            ProductDraftEvent::VariantRemoved(e) => {
                self.attribute_draft.remove_variant(&e.variant_id);
            }
            ProductDraftEvent::AttributeCommitted(e) => {
                self.attributes.insert(e.attribute.clone());
                self.attribute_draft = AttributeDraft::default();
                self.phase = VariantsPhase::AttributeListed;
            }
            ProductDraftEvent::AttributeRemoved(e) => {
                self.attributes.remove(&e.attribute_id);
                if self.phase != VariantsPhase::BuildingAttribute {
                    self.phase = if self.attributes.has_variants() {
                        VariantsPhase::AttributeListed
                    } else {
                        VariantsPhase::NoVariants
                    };
                }
                if !self.combinations.is_empty() {
                    tracing::warn!(
                        product_id = %self.id,
                        attribute_id = %e.attribute_id,
                        stale = self.stale_combinations().len(),
                        "attribute removed after combinations were generated; existing combinations kept until regenerated"
                    );
                }
            }
            ProductDraftEvent::CombinationsGenerated(e) => {
                self.combinations = e.combinations.clone();
                self.phase = VariantsPhase::CombinationsGenerated;
                let duplicates = duplicate_skus(&self.combinations);
                if !duplicates.is_empty() {
                    tracing::warn!(
                        product_id = %self.id,
                        ?duplicates,
                        "generated combinations share SKUs"
                    );
                }
            }
            ProductDraftEvent::CombinationUpdated(e) => {
                self.combinations = update_field(&self.combinations, &e.combination_id, &e.update);
                if matches!(
                    self.phase,
                    VariantsPhase::CombinationsGenerated | VariantsPhase::CombinationsEdited
                ) {
                    self.phase = VariantsPhase::CombinationsEdited;
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductDraftCommand::SetProductDetails(cmd) => self.handle_set_details(cmd),
            ProductDraftCommand::DescribeAttribute(cmd) => self.handle_describe(cmd),
            ProductDraftCommand::AddVariant(cmd) => self.handle_add_variant(cmd),
            ProductDraftCommand::RemoveVariant(cmd) => self.handle_remove_variant(cmd),
            ProductDraftCommand::CommitAttribute(cmd) => self.handle_commit(cmd),
            ProductDraftCommand::RemoveAttribute(cmd) => self.handle_remove_attribute(cmd),
            ProductDraftCommand::GenerateCombinations(cmd) => self.handle_generate(cmd),
            ProductDraftCommand::UpdateCombination(cmd) => self.handle_update(cmd),
        }
    }
}

impl ProductDraft {
    fn ensure_product_id(&self, product_id: ProductId) -> Result<(), DomainError> {
        if self.id != product_id {
            return Err(DomainError::invariant("product_id mismatch"));
        }
        Ok(())
    }

    fn handle_set_details(
        &self,
        cmd: &SetProductDetails,
    ) -> Result<Vec<ProductDraftEvent>, DomainError> {
        self.ensure_product_id(cmd.product_id)?;
        Ok(vec![ProductDraftEvent::ProductDetailsSet(ProductDetailsSet {
            product_id: cmd.product_id,
            name: cmd.name.trim().to_string(),
            base_price: cmd.base_price,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_describe(
        &self,
        cmd: &DescribeAttribute,
    ) -> Result<Vec<ProductDraftEvent>, DomainError> {
        self.ensure_product_id(cmd.product_id)?;
        Ok(vec![ProductDraftEvent::AttributeDescribed(AttributeDescribed {
            product_id: cmd.product_id,
            name: cmd.name.clone(),
            display_name: cmd.display_name.clone(),
            attribute_type: cmd.attribute_type,
            is_required: cmd.is_required,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_variant(&self, cmd: &AddVariant) -> Result<Vec<ProductDraftEvent>, DomainError> {
        self.ensure_product_id(cmd.product_id)?;
        let sku = self.sku_synthesizer(cmd.occurred_at);
        let variant = self
            .attribute_draft
            .prepare_variant(cmd.variant_id, cmd.input.clone(), &sku)?;
        Ok(vec![ProductDraftEvent::VariantAdded(VariantAdded {
            product_id: cmd.product_id,
            variant,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_variant(
        &self,
        cmd: &RemoveVariant,
    ) -> Result<Vec<ProductDraftEvent>, DomainError> {
        self.ensure_product_id(cmd.product_id)?;
        if find_by_id(self.attribute_draft.variants(), &cmd.variant_id).is_none() {
            return Ok(Vec::new());
        }
        Ok(vec![ProductDraftEvent::VariantRemoved(VariantRemoved {
            product_id: cmd.product_id,
            variant_id: cmd.variant_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_commit(&self, cmd: &CommitAttribute) -> Result<Vec<ProductDraftEvent>, DomainError> {
        self.ensure_product_id(cmd.product_id)?;
        let attribute = self.attributes.prepare(cmd.attribute_id, &self.attribute_draft)?;
        Ok(vec![ProductDraftEvent::AttributeCommitted(AttributeCommitted {
            product_id: cmd.product_id,
            attribute,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_attribute(
        &self,
        cmd: &RemoveAttribute,
    ) -> Result<Vec<ProductDraftEvent>, DomainError> {
        self.ensure_product_id(cmd.product_id)?;
        if self.attributes.get(&cmd.attribute_id).is_none() {
            return Ok(Vec::new());
        }
        Ok(vec![ProductDraftEvent::AttributeRemoved(AttributeRemoved {
            product_id: cmd.product_id,
            attribute_id: cmd.attribute_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_generate(
        &self,
        cmd: &GenerateCombinations,
    ) -> Result<Vec<ProductDraftEvent>, DomainError> {
        self.ensure_product_id(cmd.product_id)?;
        let sku = self.sku_synthesizer(cmd.occurred_at);
        let combinations = CombinationGenerator::new(&self.config).generate(
            self.attributes.as_slice(),
            self.base_price,
            &sku,
        )?;
        Ok(vec![ProductDraftEvent::CombinationsGenerated(CombinationsGenerated {
            product_id: cmd.product_id,
            combinations,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateCombination) -> Result<Vec<ProductDraftEvent>, DomainError> {
        self.ensure_product_id(cmd.product_id)?;
        if self.combination(&cmd.combination_id).is_none() {
            return Ok(Vec::new());
        }
        Ok(vec![ProductDraftEvent::CombinationUpdated(CombinationUpdated {
            product_id: cmd.product_id,
            combination_id: cmd.combination_id,
            update: cmd.update.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_time() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    fn draft() -> ProductDraft {
        let mut draft = ProductDraft::empty(ProductId::new());
        let cmd = SetProductDetails {
            product_id: draft.id_typed(),
            name: "Linen Shirt".to_string(),
            base_price: 100,
            occurred_at: test_time(),
        };
        draft
            .execute(&ProductDraftCommand::SetProductDetails(cmd))
            .unwrap();
        draft
    }

    fn describe(draft: &mut ProductDraft, name: &str, attribute_type: AttributeType) {
        let cmd = DescribeAttribute {
            product_id: draft.id_typed(),
            name: name.to_lowercase(),
            display_name: name.to_string(),
            attribute_type,
            is_required: true,
            occurred_at: test_time(),
        };
        draft
            .execute(&ProductDraftCommand::DescribeAttribute(cmd))
            .unwrap();
    }

    fn add_variant(draft: &mut ProductDraft, name: &str) -> Result<Vec<ProductDraftEvent>, DomainError> {
        let cmd = AddVariant {
            product_id: draft.id_typed(),
            variant_id: VariantId::new(),
            input: VariantInput::new(name, name.to_lowercase()),
            occurred_at: test_time(),
        };
        draft.execute(&ProductDraftCommand::AddVariant(cmd))
    }

    fn commit(draft: &mut ProductDraft) -> Result<AttributeId, DomainError> {
        let attribute_id = AttributeId::new();
        let cmd = CommitAttribute {
            product_id: draft.id_typed(),
            attribute_id,
            occurred_at: test_time(),
        };
        draft.execute(&ProductDraftCommand::CommitAttribute(cmd))?;
        Ok(attribute_id)
    }

    fn add_attribute(draft: &mut ProductDraft, name: &str, variants: &[&str]) -> AttributeId {
        describe(draft, name, AttributeType::Other);
        for variant in variants {
            add_variant(draft, variant).unwrap();
        }
        commit(draft).unwrap()
    }

    fn generate(draft: &mut ProductDraft) -> Result<Vec<ProductDraftEvent>, DomainError> {
        let cmd = GenerateCombinations {
            product_id: draft.id_typed(),
            occurred_at: test_time(),
        };
        draft.execute(&ProductDraftCommand::GenerateCombinations(cmd))
    }

    fn update(draft: &mut ProductDraft, combination_id: CombinationId, update: FieldUpdate) -> Vec<ProductDraftEvent> {
        let cmd = UpdateCombination {
            product_id: draft.id_typed(),
            combination_id,
            update,
            occurred_at: test_time(),
        };
        draft
            .execute(&ProductDraftCommand::UpdateCombination(cmd))
            .unwrap()
    }

    fn remove_attribute(draft: &mut ProductDraft, attribute_id: AttributeId) -> Vec<ProductDraftEvent> {
        let cmd = RemoveAttribute {
            product_id: draft.id_typed(),
            attribute_id,
            occurred_at: test_time(),
        };
        draft
            .execute(&ProductDraftCommand::RemoveAttribute(cmd))
            .unwrap()
    }

    fn color_by_size(draft: &mut ProductDraft) -> (AttributeId, AttributeId) {
        let color = add_attribute(draft, "Color", &["Red", "Blue"]);
        let size = add_attribute(draft, "Size", &["S", "M", "L"]);
        (color, size)
    }

    #[test]
    fn new_draft_has_no_variants() {
        let draft = ProductDraft::empty(ProductId::new());
        assert_eq!(draft.phase(), VariantsPhase::NoVariants);
        assert!(!draft.has_variants());
        assert!(!draft.can_generate());
        assert_eq!(draft.version(), 0);
    }

    #[test]
    fn phases_follow_the_workflow() {
        let mut draft = draft();
        assert_eq!(draft.phase(), VariantsPhase::NoVariants);

        describe(&mut draft, "Color", AttributeType::Other);
        assert_eq!(draft.phase(), VariantsPhase::BuildingAttribute);

        add_variant(&mut draft, "Red").unwrap();
        commit(&mut draft).unwrap();
        assert_eq!(draft.phase(), VariantsPhase::AttributeListed);
        assert!(draft.has_variants());
        assert!(draft.attribute_draft().is_blank());

        add_attribute(&mut draft, "Size", &["S", "M"]);
        generate(&mut draft).unwrap();
        assert_eq!(draft.phase(), VariantsPhase::CombinationsGenerated);

        let id = draft.combinations()[0].id;
        update(&mut draft, id, FieldUpdate::Stock(3));
        assert_eq!(draft.phase(), VariantsPhase::CombinationsEdited);
        update(&mut draft, id, FieldUpdate::Stock(4));
        assert_eq!(draft.phase(), VariantsPhase::CombinationsEdited);
    }

    #[test]
    fn add_variant_uses_product_name_for_sku() {
        let mut draft = draft();
        describe(&mut draft, "Color", AttributeType::Color);
        let events = add_variant(&mut draft, "Red").unwrap();

        match &events[0] {
            ProductDraftEvent::VariantAdded(e) => assert_eq!(e.variant.sku, "LIN-1700000000000"),
            _ => panic!("Expected VariantAdded event"),
        }
        assert_eq!(draft.attribute_draft().variants().len(), 1);
    }

    #[test]
    fn invalid_variant_leaves_draft_untouched() {
        let mut draft = draft();
        describe(&mut draft, "Color", AttributeType::Other);
        let before = draft.clone();

        let err = add_variant(&mut draft, "").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(draft, before);
    }

    #[test]
    fn commit_without_variants_is_rejected() {
        let mut draft = draft();
        describe(&mut draft, "Color", AttributeType::Other);
        let before = draft.clone();

        let err = commit(&mut draft).unwrap_err();
        assert_eq!(err, DomainError::validation("attribute needs at least one variant"));
        assert_eq!(draft, before);
        assert!(draft.attributes().is_empty());
    }

    #[test]
    fn generate_requires_two_attributes() {
        let mut draft = draft();
        add_attribute(&mut draft, "Color", &["Red", "Blue"]);
        let before = draft.clone();

        let err = generate(&mut draft).unwrap_err();
        assert!(err.is_precondition());
        assert!(draft.combinations().is_empty());
        assert_eq!(draft, before);
    }

    #[test]
    fn generate_seeds_from_base_price() {
        let mut draft = draft();
        color_by_size(&mut draft);
        generate(&mut draft).unwrap();

        assert_eq!(draft.combinations().len(), 6);
        assert!(draft.combinations().iter().all(|c| c.price == 100));
        assert_eq!(draft.combinations()[0].sku, "LIN-1700000000000-1");
    }

    #[test]
    fn regenerating_discards_edits() {
        let mut draft = draft();
        color_by_size(&mut draft);
        generate(&mut draft).unwrap();
        let first = draft.combinations().to_vec();

        let id = first[1].id;
        update(&mut draft, id, FieldUpdate::Price(999));
        update(&mut draft, id, FieldUpdate::Available(false));
        assert_eq!(draft.combination(&id).map(|c| c.price), Some(999));

        generate(&mut draft).unwrap();
        assert_eq!(draft.combinations(), first.as_slice());
        assert_eq!(draft.phase(), VariantsPhase::CombinationsGenerated);
    }

    #[test]
    fn regenerating_after_new_attribute_uses_current_variant_counts() {
        let mut draft = draft();
        color_by_size(&mut draft);
        generate(&mut draft).unwrap();
        let first = draft.combinations().to_vec();
        update(&mut draft, first[0].id, FieldUpdate::Stock(40));

        add_attribute(&mut draft, "Material", &["Cotton", "Linen"]);
        assert_eq!(draft.stale_combinations().len(), 6);

        generate(&mut draft).unwrap();

        assert_eq!(draft.combinations().len(), 2 * 3 * 2);
        assert!(draft.stale_combinations().is_empty());
        assert!(draft.combinations().iter().all(|c| first.iter().all(|f| f.id != c.id)));
        for combination in draft.combinations() {
            assert_eq!(combination.attribute_values.len(), 3);
            assert_eq!(combination.price, 100);
            assert_eq!(combination.stock, 0);
            assert!(combination.is_available);
        }
        assert_eq!(draft.combinations()[0].name, "Red - S - Cotton");
        assert_eq!(draft.phase(), VariantsPhase::CombinationsGenerated);
    }

    #[test]
    fn unknown_ids_are_silent_noops() {
        let mut draft = draft();
        color_by_size(&mut draft);
        generate(&mut draft).unwrap();
        let before = draft.clone();

        let unknown = CombinationId::derive([(&AttributeId::new(), &VariantId::new())]);
        assert!(update(&mut draft, unknown, FieldUpdate::Stock(1)).is_empty());
        assert!(remove_attribute(&mut draft, AttributeId::new()).is_empty());

        let cmd = RemoveVariant {
            product_id: draft.id_typed(),
            variant_id: VariantId::new(),
            occurred_at: test_time(),
        };
        let events = draft.execute(&ProductDraftCommand::RemoveVariant(cmd)).unwrap();
        assert!(events.is_empty());

        assert_eq!(draft, before);
    }

    #[test]
    fn remove_variant_from_draft() {
        let mut draft = draft();
        describe(&mut draft, "Color", AttributeType::Other);
        add_variant(&mut draft, "Red").unwrap();
        let variant_id = draft.attribute_draft().variants()[0].id;

        let cmd = RemoveVariant {
            product_id: draft.id_typed(),
            variant_id,
            occurred_at: test_time(),
        };
        let events = draft.execute(&ProductDraftCommand::RemoveVariant(cmd)).unwrap();
        assert_eq!(events.len(), 1);
        assert!(draft.attribute_draft().variants().is_empty());
    }

    #[test]
    fn removing_attribute_keeps_stale_combinations() {
        let mut draft = draft();
        let (color, _size) = color_by_size(&mut draft);
        generate(&mut draft).unwrap();
        assert!(draft.stale_combinations().is_empty());

        remove_attribute(&mut draft, color);

        assert_eq!(draft.phase(), VariantsPhase::AttributeListed);
        assert_eq!(draft.attributes().len(), 1);
        assert!(draft.has_variants());
        assert_eq!(draft.combinations().len(), 6);
        assert_eq!(draft.stale_combinations().len(), 6);
        assert!(!draft.can_generate());
    }

    #[test]
    fn removing_last_attribute_clears_has_variants() {
        let mut draft = draft();
        let color = add_attribute(&mut draft, "Color", &["Red"]);
        remove_attribute(&mut draft, color);
        assert!(!draft.has_variants());
        assert_eq!(draft.phase(), VariantsPhase::NoVariants);
    }

    #[test]
    fn rejects_foreign_product_id() {
        let draft = draft();
        let cmd = GenerateCombinations {
            product_id: ProductId::new(),
            occurred_at: test_time(),
        };
        let err = draft
            .handle(&ProductDraftCommand::GenerateCombinations(cmd))
            .unwrap_err();
        match err {
            DomainError::InvariantViolation(_) => {}
            _ => panic!("Expected InvariantViolation error for product_id mismatch"),
        }
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let mut draft = draft();
        color_by_size(&mut draft);
        let before = draft.clone();

        let cmd = ProductDraftCommand::GenerateCombinations(GenerateCombinations {
            product_id: draft.id_typed(),
            occurred_at: test_time(),
        });
        let events1 = draft.handle(&cmd).unwrap();
        let events2 = draft.handle(&cmd).unwrap();

        assert_eq!(draft, before);
        assert_eq!(events1, events2);
    }

    #[test]
    fn version_increments_on_apply() {
        let mut draft = draft();
        assert_eq!(draft.version(), 1);
        describe(&mut draft, "Color", AttributeType::Other);
        add_variant(&mut draft, "Red").unwrap();
        commit(&mut draft).unwrap();
        assert_eq!(draft.version(), 4);
    }

    #[test]
    fn event_metadata() {
        let mut draft = draft();
        color_by_size(&mut draft);
        let events = generate(&mut draft).unwrap();
        assert_eq!(events[0].event_type(), "products.draft.combinations_generated");
        assert_eq!(events[0].version(), 1);
        assert_eq!(events[0].occurred_at(), test_time());
    }

    #[test]
    fn replaying_events_rebuilds_the_draft() {
        let mut draft = draft();
        let mut history = Vec::new();
        let id = draft.id_typed();

        for (name, variants) in [("Color", ["Red", "Blue"]), ("Size", ["S", "M"])] {
            history.extend(
                draft
                    .execute(&ProductDraftCommand::DescribeAttribute(DescribeAttribute {
                        product_id: id,
                        name: name.to_lowercase(),
                        display_name: name.to_string(),
                        attribute_type: AttributeType::Other,
                        is_required: false,
                        occurred_at: test_time(),
                    }))
                    .unwrap(),
            );
            for variant in variants {
                history.extend(add_variant(&mut draft, variant).unwrap());
            }
            history.extend(
                draft
                    .execute(&ProductDraftCommand::CommitAttribute(CommitAttribute {
                        product_id: id,
                        attribute_id: AttributeId::new(),
                        occurred_at: test_time(),
                    }))
                    .unwrap(),
            );
        }
        history.extend(generate(&mut draft).unwrap());

        let mut replayed = ProductDraft::empty(id);
        replayed.apply(&ProductDraftEvent::ProductDetailsSet(ProductDetailsSet {
            product_id: id,
            name: "Linen Shirt".to_string(),
            base_price: 100,
            occurred_at: test_time(),
        }));
        for event in &history {
            replayed.apply(event);
        }

        assert_eq!(replayed, draft);
    }
}
