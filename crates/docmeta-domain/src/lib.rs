//! Docmeta Domain Layer
//!
//! This crate contains the core metadata model and the merge policy for Docmeta.
//! It has ZERO external dependencies and defines the value types, the merge fold,
//! and the trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Value**: A tagged union over the shapes a model may emit for one field
//! - **PartialMetadata**: One chunk's extracted field-value mapping
//! - **MergedMetadata**: The reconciled mapping across all chunks of a document
//! - **MetadataMerger**: Left fold that reconciles partial records in chunk order
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - No external crate dependencies
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod merge;
pub mod traits;
pub mod value;

// Re-exports for convenience
pub use merge::{merge_metadata, MetadataMerger, TypeConflict};
pub use value::{MergedMetadata, PartialMetadata, Value, ValueKind};
