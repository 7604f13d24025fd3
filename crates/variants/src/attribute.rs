//! Attribute store: the in-progress attribute draft and the committed set.

use serde::{Deserialize, Serialize};

use souq_core::{
    AttributeId, DomainError, DomainResult, Entity, VariantId, find_by_id, remove_by_id,
};

use crate::sku::SkuSynthesizer;
use crate::variant::{AttributeType, Variant, VariantDetails, VariantInput};

/// An attribute committed to the product (e.g. Color with Red and Blue).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttribute {
    pub id: AttributeId,
    /// Internal key, unique within the product.
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    pub display_name: String,
    pub is_required: bool,
    pub variants: Vec<Variant>,
}

impl ProductAttribute {
    pub fn variant(&self, id: &VariantId) -> Option<&Variant> {
        find_by_id(&self.variants, id)
    }

    pub fn default_variant(&self) -> Option<&Variant> {
        self.variants.iter().find(|v| v.is_default)
    }
}

impl Entity for ProductAttribute {
    type Id = AttributeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Attribute being built in the product form, before it is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDraft {
    name: String,
    display_name: String,
    attribute_type: AttributeType,
    is_required: bool,
    variants: Vec<Variant>,
}

impl Default for AttributeDraft {
    fn default() -> Self {
        Self::new(AttributeType::Other)
    }
}

impl AttributeDraft {
    pub fn new(attribute_type: AttributeType) -> Self {
        Self {
            name: String::new(),
            display_name: String::new(),
            attribute_type,
            is_required: false,
            variants: Vec::new(),
        }
    }

    /// Set the header fields. Variants already added are kept, and those
    /// without type-specific data take on the new type.
    pub fn describe(
        &mut self,
        name: impl Into<String>,
        display_name: impl Into<String>,
        attribute_type: AttributeType,
        is_required: bool,
    ) {
        self.name = name.into();
        self.display_name = display_name.into();
        self.is_required = is_required;
        if self.attribute_type != attribute_type {
            self.attribute_type = attribute_type;
            for variant in &mut self.variants {
                variant.details = variant.details.clone().retyped(attribute_type);
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn attribute_type(&self) -> AttributeType {
        self.attribute_type
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.display_name.trim().is_empty()
            && self.variants.is_empty()
    }

    /// Validate `input` and build the variant it describes, without adding it.
    pub fn prepare_variant(
        &self,
        id: VariantId,
        input: VariantInput,
        sku: &SkuSynthesizer,
    ) -> DomainResult<Variant> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("variant name is required"));
        }
        let value = input.value.trim();
        if value.is_empty() {
            return Err(DomainError::validation("variant value is required"));
        }
        if find_by_id(&self.variants, &id).is_some() {
            return Err(DomainError::conflict(format!("variant {id} already exists")));
        }

        let explicit_sku = input.sku.trim();
        if !explicit_sku.is_empty() && self.variants.iter().any(|v| v.sku == explicit_sku) {
            return Err(DomainError::validation(format!(
                "SKU '{explicit_sku}' is already used by another variant"
            )));
        }
        if input.is_default && self.variants.iter().any(|v| v.is_default) {
            return Err(DomainError::validation("attribute already has a default variant"));
        }

        let details = input
            .details
            .unwrap_or_else(|| VariantDetails::plain(self.attribute_type));
        details.validate()?;

        let sku = if explicit_sku.is_empty() {
            sku.variant_sku()
        } else {
            explicit_sku.to_string()
        };

        Ok(Variant {
            id,
            name: name.to_string(),
            value: value.to_string(),
            price: input.price,
            stock: input.stock,
            sku,
            is_default: input.is_default,
            details,
        })
    }

    /// Validate and append a variant. Nothing changes on error.
    pub fn add_variant(
        &mut self,
        id: VariantId,
        input: VariantInput,
        sku: &SkuSynthesizer,
    ) -> DomainResult<Variant> {
        let variant = self.prepare_variant(id, input, sku)?;
        self.variants.push(variant.clone());
        Ok(variant)
    }

    pub(crate) fn push_variant(&mut self, variant: Variant) {
        self.variants.push(variant);
    }

    /// Returns `false` (and changes nothing) when `id` is unknown.
    pub fn remove_variant(&mut self, id: &VariantId) -> bool {
        remove_by_id(&mut self.variants, id).is_some()
    }
}

/// The ordered attributes committed to a product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet {
    attributes: Vec<ProductAttribute>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[ProductAttribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Product-level flag sent with the payload.
    pub fn has_variants(&self) -> bool {
        !self.attributes.is_empty()
    }

    pub fn get(&self, id: &AttributeId) -> Option<&ProductAttribute> {
        find_by_id(&self.attributes, id)
    }

    /// Validate `draft` and build the attribute it would commit, without adding it.
    pub fn prepare(&self, id: AttributeId, draft: &AttributeDraft) -> DomainResult<ProductAttribute> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("attribute name is required"));
        }
        let display_name = draft.display_name.trim();
        if display_name.is_empty() {
            return Err(DomainError::validation("attribute display name is required"));
        }
        if draft.variants.is_empty() {
            return Err(DomainError::validation("attribute needs at least one variant"));
        }
        if self.attributes.iter().any(|a| a.name == name) {
            return Err(DomainError::validation(format!(
                "attribute name '{name}' is already used by this product"
            )));
        }
        if self.get(&id).is_some() {
            return Err(DomainError::conflict(format!("attribute {id} already exists")));
        }
        if let Some(variant) = draft
            .variants
            .iter()
            .find(|v| v.details.attribute_type() != draft.attribute_type)
        {
            return Err(DomainError::validation(format!(
                "variant '{}' has {} details but the attribute type is {}",
                variant.name,
                variant.details.attribute_type(),
                draft.attribute_type
            )));
        }

        Ok(ProductAttribute {
            id,
            name: name.to_string(),
            attribute_type: draft.attribute_type,
            display_name: display_name.to_string(),
            is_required: draft.is_required,
            variants: draft.variants.clone(),
        })
    }

    /// Validate and append the attribute built from `draft`. Nothing changes on error.
    pub fn commit(&mut self, id: AttributeId, draft: &AttributeDraft) -> DomainResult<ProductAttribute> {
        let attribute = self.prepare(id, draft)?;
        self.attributes.push(attribute.clone());
        Ok(attribute)
    }

    pub(crate) fn insert(&mut self, attribute: ProductAttribute) {
        self.attributes.push(attribute);
    }

    /// Returns `None` (and changes nothing) when `id` is unknown.
    pub fn remove(&mut self, id: &AttributeId) -> Option<ProductAttribute> {
        remove_by_id(&mut self.attributes, id)
    }
}
