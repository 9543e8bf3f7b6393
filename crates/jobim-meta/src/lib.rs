//! Entity metadata for the generic CRUD engine
//!
//! A record type declares its shape once with [`EntityMeta`]; the
//! [`MetaRegistry`] classifies that declaration into an immutable
//! [`EntityDescriptor`] and caches it for the lifetime of the process.
//! Everything downstream (filtering, sorting, conditional rules, display
//! resolution) works off the cached descriptor plus the dynamic
//! [`Record`] value accessor.

pub mod descriptor;
pub mod extract;
pub mod reference;
pub mod registry;
pub mod schema;
pub mod value;

pub use descriptor::{EntityDescriptor, FieldDescriptor, FieldKind, MASK_PUNCTUATION};
pub use extract::build_descriptor;
pub use reference::{DisplayItem, ReferenceMetadata, SubtitleField};
pub use registry::MetaRegistry;
pub use schema::{Entity, EntityMeta, FieldMeta, SubtitleMeta, TabMeta};
pub use value::{resolve_path, FieldValue, Record};
