//! Variants: concrete values along an attribute axis.

use serde::{Deserialize, Serialize};

use souq_core::{DomainError, DomainResult, Entity, ValueObject, VariantId};

/// Kind of axis an attribute varies along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Color,
    Size,
    Weight,
    Material,
    Dimension,
    Capacity,
    Other,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Color => "color",
            AttributeType::Size => "size",
            AttributeType::Weight => "weight",
            AttributeType::Material => "material",
            AttributeType::Dimension => "dimension",
            AttributeType::Capacity => "capacity",
            AttributeType::Other => "other",
        }
    }
}

impl core::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CSS-style hex color (`#RGB` or `#RRGGBB`), stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| DomainError::validation(format!("hex color '{trimmed}' must start with '#'")))?;
        if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::validation(format!(
                "hex color '{trimmed}' must look like #RGB or #RRGGBB"
            )));
        }
        Ok(Self(format!("#{}", digits.to_ascii_uppercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

impl ValueObject for HexColor {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Cm,
    M,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    G,
    Kg,
    Lb,
}

/// Physical package dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub unit: LengthUnit,
}

impl Dimensions {
    pub fn validate(&self) -> DomainResult<()> {
        for (label, value) in [
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::validation(format!(
                    "dimension {label} must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}

impl ValueObject for Dimensions {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSpec {
    pub value: f64,
    pub unit: WeightUnit,
}

impl WeightSpec {
    pub fn validate(&self) -> DomainResult<()> {
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(DomainError::validation("weight must be a non-negative number"));
        }
        Ok(())
    }
}

impl ValueObject for WeightSpec {}

/// Type-specific data carried by a variant.
///
/// Each case holds only what is meaningful for its attribute type: a hex
/// color exists only on color variants, dimensions only on dimension
/// variants, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum VariantDetails {
    Color {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hex_color: Option<HexColor>,
    },
    Size,
    Weight {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<WeightSpec>,
    },
    Material,
    Dimension {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dimensions: Option<Dimensions>,
    },
    Capacity,
    Other,
}

impl VariantDetails {
    /// Details for `attribute_type` with no optional data filled in.
    pub fn plain(attribute_type: AttributeType) -> Self {
        match attribute_type {
            AttributeType::Color => VariantDetails::Color { hex_color: None },
            AttributeType::Size => VariantDetails::Size,
            AttributeType::Weight => VariantDetails::Weight { weight: None },
            AttributeType::Material => VariantDetails::Material,
            AttributeType::Dimension => VariantDetails::Dimension { dimensions: None },
            AttributeType::Capacity => VariantDetails::Capacity,
            AttributeType::Other => VariantDetails::Other,
        }
    }

    pub fn attribute_type(&self) -> AttributeType {
        match self {
            VariantDetails::Color { .. } => AttributeType::Color,
            VariantDetails::Size => AttributeType::Size,
            VariantDetails::Weight { .. } => AttributeType::Weight,
            VariantDetails::Material => AttributeType::Material,
            VariantDetails::Dimension { .. } => AttributeType::Dimension,
            VariantDetails::Capacity => AttributeType::Capacity,
            VariantDetails::Other => AttributeType::Other,
        }
    }

    /// True when no type-specific data (hex color, weight, dimensions) is set.
    pub fn is_plain(&self) -> bool {
        *self == Self::plain(self.attribute_type())
    }

    /// Plain details follow the attribute type; details carrying data keep theirs.
    pub fn retyped(self, attribute_type: AttributeType) -> Self {
        if self.is_plain() {
            Self::plain(attribute_type)
        } else {
            self
        }
    }

    pub fn hex_color(&self) -> Option<&HexColor> {
        match self {
            VariantDetails::Color { hex_color } => hex_color.as_ref(),
            _ => None,
        }
    }

    pub fn weight(&self) -> Option<&WeightSpec> {
        match self {
            VariantDetails::Weight { weight } => weight.as_ref(),
            _ => None,
        }
    }

    pub fn dimensions(&self) -> Option<&Dimensions> {
        match self {
            VariantDetails::Dimension { dimensions } => dimensions.as_ref(),
            _ => None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if let Some(weight) = self.weight() {
            weight.validate()?;
        }
        if let Some(dimensions) = self.dimensions() {
            dimensions.validate()?;
        }
        Ok(())
    }
}

/// A committed variant of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: VariantId,
    pub name: String,
    pub value: String,
    /// Additive price delta in the smallest currency unit.
    pub price: i64,
    pub stock: u32,
    pub sku: String,
    pub is_default: bool,
    pub details: VariantDetails,
}

impl Entity for Variant {
    type Id = VariantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Operator input for a new variant, as entered in the product form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantInput {
    pub name: String,
    pub value: String,
    pub price: i64,
    pub stock: u32,
    /// Left blank to have one synthesized.
    pub sku: String,
    pub is_default: bool,
    /// Falls back to plain details of the attribute's type when absent.
    pub details: Option<VariantDetails>,
}

impl VariantInput {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = sku.into();
        self
    }

    pub fn with_price(mut self, price: i64) -> Self {
        self.price = price;
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn with_details(mut self, details: VariantDetails) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_accepts_short_and_long_forms() {
        assert_eq!(HexColor::parse("#ff0000").unwrap().as_str(), "#FF0000");
        assert_eq!(HexColor::parse(" #0af ").unwrap().as_str(), "#0AF");
    }

    #[test]
    fn hex_color_rejects_malformed_values() {
        for raw in ["ff0000", "#ff00", "#gg0000", ""] {
            let err = HexColor::parse(raw).unwrap_err();
            assert!(err.is_validation(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn hex_color_deserialization_validates() {
        let ok: HexColor = serde_json::from_str("\"#abcdef\"").unwrap();
        assert_eq!(ok.as_str(), "#ABCDEF");
        assert!(serde_json::from_str::<HexColor>("\"red\"").is_err());
    }

    #[test]
    fn details_only_expose_fields_of_their_kind() {
        let color = VariantDetails::Color {
            hex_color: Some(HexColor::parse("#000").unwrap()),
        };
        assert_eq!(color.attribute_type(), AttributeType::Color);
        assert!(color.hex_color().is_some());
        assert!(color.weight().is_none());
        assert!(color.dimensions().is_none());

        let size = VariantDetails::plain(AttributeType::Size);
        assert_eq!(size, VariantDetails::Size);
        assert!(size.hex_color().is_none());
    }

    #[test]
    fn plain_details_match_their_type() {
        for t in [
            AttributeType::Color,
            AttributeType::Size,
            AttributeType::Weight,
            AttributeType::Material,
            AttributeType::Dimension,
            AttributeType::Capacity,
            AttributeType::Other,
        ] {
            assert_eq!(VariantDetails::plain(t).attribute_type(), t);
        }
    }

    #[test]
    fn retyping_only_moves_plain_details() {
        assert_eq!(
            VariantDetails::Other.retyped(AttributeType::Color),
            VariantDetails::Color { hex_color: None }
        );
        assert_eq!(
            VariantDetails::Weight { weight: None }.retyped(AttributeType::Size),
            VariantDetails::Size
        );

        let weight = VariantDetails::Weight {
            weight: Some(WeightSpec { value: 2.5, unit: WeightUnit::Kg }),
        };
        assert!(!weight.is_plain());
        assert_eq!(weight.clone().retyped(AttributeType::Color), weight);
    }

    #[test]
    fn negative_measurements_fail_validation() {
        let details = VariantDetails::Weight {
            weight: Some(WeightSpec { value: -1.0, unit: WeightUnit::Kg }),
        };
        assert!(details.validate().unwrap_err().is_validation());

        let details = VariantDetails::Dimension {
            dimensions: Some(Dimensions {
                length: 10.0,
                width: f64::NAN,
                height: 2.0,
                unit: LengthUnit::Cm,
            }),
        };
        assert!(details.validate().unwrap_err().is_validation());
    }

    #[test]
    fn details_serialize_with_kind_tag() {
        let details = VariantDetails::Color {
            hex_color: Some(HexColor::parse("#112233").unwrap()),
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "color", "hexColor": "#112233"}));

        let json = serde_json::to_value(VariantDetails::Size).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "size"}));
    }

    #[test]
    fn variant_input_defaults_missing_fields() {
        let input: VariantInput = serde_json::from_str(r#"{"name":"Red","value":"red"}"#).unwrap();
        assert_eq!(input, VariantInput::new("Red", "red"));
        assert!(input.sku.is_empty());
        assert!(input.details.is_none());
    }
}
