//! Schema descriptor model for typeq
//!
//! This crate holds the static table descriptions that the query engine and the
//! migration planner consume:
//!
//! - [`ColumnType`] - scalar column type tags
//! - [`ColumnDescriptor`], [`TableDescriptor`], [`ForeignKeyDescriptor`], [`IndexDescriptor`]
//! - [`Dialect`] - SQL dialect used when rendering type names and DDL
//!
//! Descriptors are normally emitted by a code generator. They are plain values
//! and can equally be written by hand.
//!
//! # Features
//!
//! - `std` - Standard library support (enabled by default)
//! - `serde` - Enable serde serialization/deserialization

mod column_type;
mod descriptor;
mod dialect;
mod error;

pub use column_type::ColumnType;
pub use descriptor::{ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor, TableDescriptor};
pub use dialect::{Dialect, DialectParseError};
pub use error::DescriptorError;

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{
        ColumnDescriptor, ColumnType, DescriptorError, Dialect, ForeignKeyDescriptor,
        IndexDescriptor, TableDescriptor,
    };
}
