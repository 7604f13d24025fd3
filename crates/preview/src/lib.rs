//! Offline preview of a product's variants section.
//!
//! Takes the attributes an operator would enter in the product form, drives a
//! [`ProductDraft`] through the same commands the form issues, and returns the
//! payload the creation API would receive.

use anyhow::{Context, bail};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use souq_core::{Aggregate, AttributeId, ProductId, VariantId};
use souq_variants::{
    AddVariant, AttributeType, CommitAttribute, DescribeAttribute, EngineConfig, FieldUpdate,
    GenerateCombinations, ProductDraft, ProductDraftCommand, SetProductDetails, UpdateCombination,
    VariantInput, VariantsPayload,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewInput {
    pub product_name: String,
    /// Smallest currency unit.
    pub base_price: u64,
    pub attributes: Vec<AttributeInput>,
    /// Edits applied after generation, addressed by combination name.
    #[serde(default)]
    pub updates: Vec<UpdateInput>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeInput {
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub is_required: bool,
    pub variants: Vec<VariantInput>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateInput {
    /// e.g. `"Red - M"`.
    pub combination: String,
    pub update: FieldUpdate,
}

impl PreviewInput {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("draft file is not a valid preview input")
    }
}

/// Hands out one timestamp per form action, a millisecond apart, so SKUs
/// synthesized from them do not collide the way same-instant entries would.
#[derive(Debug, Clone, Copy)]
struct FormClock {
    next: DateTime<Utc>,
}

impl FormClock {
    fn starting_at(at: DateTime<Utc>) -> Self {
        Self { next: at }
    }

    fn tick(&mut self) -> DateTime<Utc> {
        let at = self.next;
        self.next = at + Duration::milliseconds(1);
        at
    }
}

/// Build the variants payload for `input`.
///
/// Each command is issued one millisecond after the previous one, starting
/// at `now`. With fewer than two attributes no combinations are generated,
/// matching the product form which only offers generation from two
/// attributes on.
pub fn run(
    input: &PreviewInput,
    config: EngineConfig,
    now: DateTime<Utc>,
) -> anyhow::Result<VariantsPayload> {
    let mut clock = FormClock::starting_at(now);
    let product_id = ProductId::new();
    let mut draft = ProductDraft::with_config(product_id, config);

    draft.execute(&ProductDraftCommand::SetProductDetails(SetProductDetails {
        product_id,
        name: input.product_name.clone(),
        base_price: input.base_price,
        occurred_at: clock.tick(),
    }))?;

    for attribute in &input.attributes {
        draft
            .execute(&ProductDraftCommand::DescribeAttribute(DescribeAttribute {
                product_id,
                name: attribute.name.clone(),
                display_name: attribute.display_name.clone(),
                attribute_type: attribute.attribute_type,
                is_required: attribute.is_required,
                occurred_at: clock.tick(),
            }))
            .with_context(|| format!("attribute '{}'", attribute.name))?;

        for variant in &attribute.variants {
            draft
                .execute(&ProductDraftCommand::AddVariant(AddVariant {
                    product_id,
                    variant_id: VariantId::new(),
                    input: variant.clone(),
                    occurred_at: clock.tick(),
                }))
                .with_context(|| {
                    format!("attribute '{}', variant '{}'", attribute.name, variant.name)
                })?;
        }

        draft
            .execute(&ProductDraftCommand::CommitAttribute(CommitAttribute {
                product_id,
                attribute_id: AttributeId::new(),
                occurred_at: clock.tick(),
            }))
            .with_context(|| format!("attribute '{}'", attribute.name))?;
    }

    if draft.can_generate() {
        draft.execute(&ProductDraftCommand::GenerateCombinations(GenerateCombinations {
            product_id,
            occurred_at: clock.tick(),
        }))?;
    } else {
        tracing::info!(
            attributes = draft.attributes().len(),
            "fewer than two attributes; skipping combination generation"
        );
        if !input.updates.is_empty() {
            bail!("updates were given but no combinations were generated");
        }
    }

    for edit in &input.updates {
        let Some(combination_id) = draft
            .combinations()
            .iter()
            .find(|c| c.name == edit.combination)
            .map(|c| c.id)
        else {
            bail!("no combination named '{}'", edit.combination);
        };
        draft.execute(&ProductDraftCommand::UpdateCombination(UpdateCombination {
            product_id,
            combination_id,
            update: edit.update.clone(),
            occurred_at: clock.tick(),
        }))?;
    }

    Ok(draft.variants_payload())
}
