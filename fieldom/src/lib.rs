//! Fieldom core library.
//!
//! Typed field schemas for search-engine document mappings: a registry of
//! field kinds, dispatch from mapping descriptions, value (de)serialization
//! and validation, and composite object/nested fields with wrapped documents.

pub mod dispatch;
pub mod document;
pub mod errors;
pub mod field;
pub mod params;
pub mod registry;
pub mod value;

pub use dispatch::{FieldSpec, construct_field, resolve};
pub use document::InnerDoc;
pub use errors::*;
pub use field::{
    BuiltinType, CustomField, CustomTransform, DateOptions, Field, FieldKind, FieldWalk, FloatKind, IntegerKind,
    KeywordOptions, ObjectField, OpaqueKind, Properties, StringOptions, TextOptions,
};
pub use params::Params;
pub use registry::*;
pub use value::FieldValue;

// Re-export inventory so downstream crates can register field kinds
pub use inventory;
