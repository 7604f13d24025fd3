//! `souq-core`: domain foundation building blocks for the marketplace admin.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod event;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::{Entity, find_by_id, find_by_id_mut, position_of, remove_by_id};
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{AttributeId, CombinationId, ProductId, VariantId};
pub use value_object::ValueObject;
