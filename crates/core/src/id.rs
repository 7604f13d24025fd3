//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a product draft.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

/// Identifier of a product attribute (an axis of variation).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(Uuid);

/// Identifier of a single variant within an attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(Uuid);

/// Identifier of a generated combination.
///
/// Not random: derived from the `(attribute, variant)` tuple it selects.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinationId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

macro_rules! impl_time_ordered {
    ($t:ty) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

impl_uuid_newtype!(ProductId, "ProductId");
impl_uuid_newtype!(AttributeId, "AttributeId");
impl_uuid_newtype!(VariantId, "VariantId");
impl_uuid_newtype!(CombinationId, "CombinationId");

impl_time_ordered!(ProductId);
impl_time_ordered!(AttributeId);
impl_time_ordered!(VariantId);

impl CombinationId {
    /// Derive the identifier of the combination selecting exactly `selection`.
    ///
    /// The same ordered selection always maps to the same id (UUIDv5 over the
    /// concatenated pair bytes), so regenerating combinations keeps identities.
    pub fn derive<'a, I>(selection: I) -> Self
    where
        I: IntoIterator<Item = (&'a AttributeId, &'a VariantId)>,
    {
        let mut bytes = Vec::new();
        for (attribute_id, variant_id) in selection {
            bytes.extend_from_slice(attribute_id.as_uuid().as_bytes());
            bytes.extend_from_slice(variant_id.as_uuid().as_bytes());
        }
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, &bytes))
    }
}
