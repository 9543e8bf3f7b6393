//! Jobim — a metadata-driven CRUD engine
//!
//! A single generic controller can serve grid, form and CRUD behavior
//! for an open set of record types: each type declares its shape once,
//! and the engine derives filtering, sorting, conditional field
//! visibility and reference display from the cached metadata. No
//! per-type query or validation code is ever written.
//!
//! The pieces are usable separately ([`jobim_meta`], [`jobim_query`],
//! [`jobim_rules`]); [`Engine`] bundles them behind one object built at
//! startup and shared by reference.

pub use jobim_meta as meta;
pub use jobim_query as query;
pub use jobim_rules as rules;

pub use jobim_meta::{
	build_descriptor, DisplayItem, Entity, EntityDescriptor, EntityMeta, FieldDescriptor,
	FieldKind, FieldMeta, FieldValue, MetaRegistry, Record, ReferenceMetadata, TabMeta,
};
pub use jobim_query::{DynPredicate, FilterBuilder, OrderKey, Predicate, SortBuilder, SEARCH_KEY};
pub use jobim_rules::{Rule, RuleEvaluator};

use std::collections::HashMap;
use std::sync::Arc;

/// One-stop engine: metadata registry, builders and rule evaluator.
///
/// Construct once at startup and pass by reference; all internal
/// caches are build-once and thread-safe.
///
/// # Examples
///
/// ```
/// use jobim::{Engine, Entity, EntityMeta, FieldMeta, FieldValue, Record};
/// use std::collections::HashMap;
///
/// struct Customer {
///     name: String,
///     active: bool,
/// }
///
/// impl Record for Customer {
///     fn get(&self, field: &str) -> FieldValue {
///         match field {
///             "Name" => self.name.as_str().into(),
///             "Active" => self.active.into(),
///             _ => FieldValue::Null,
///         }
///     }
/// }
///
/// impl Entity for Customer {
///     fn meta() -> EntityMeta {
///         EntityMeta::new("Customer")
///             .field(FieldMeta::text("Name"))
///             .field(FieldMeta::boolean("Active"))
///     }
/// }
///
/// let engine = Engine::new();
/// let mut filters = HashMap::new();
/// filters.insert("active".to_string(), "true".to_string());
///
/// let predicate = engine.filter::<Customer>(&filters);
/// assert!(predicate.matches(&Customer { name: "Ana".into(), active: true }));
/// assert!(!predicate.matches(&Customer { name: "Bia".into(), active: false }));
/// ```
#[derive(Default)]
pub struct Engine {
	registry: MetaRegistry,
	rules: RuleEvaluator,
}

impl Engine {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn registry(&self) -> &MetaRegistry {
		&self.registry
	}

	/// The cached descriptor for `T`.
	pub fn descriptor<T: Entity>(&self) -> Arc<EntityDescriptor> {
		self.registry.descriptor::<T>()
	}

	/// Build the filter predicate for `T` from a request filter map.
	pub fn filter<T: Entity>(&self, filters: &HashMap<String, String>) -> Predicate<T> {
		FilterBuilder::new(&self.registry).build_filter::<T>(filters)
	}

	/// Build the order key for `T` from a request sort spec.
	pub fn order<T: Entity>(&self, field: &str, direction: &str) -> OrderKey<T> {
		SortBuilder::new(&self.registry).build_order::<T>(field, direction)
	}

	/// Evaluate a conditional rule against a live record of `T`.
	pub fn evaluate_rule<T: Entity>(&self, rule: &str, record: &T) -> bool {
		self.rules
			.evaluate(rule, record, &self.registry.descriptor::<T>())
	}

	/// Whether the named field should be shown for this record.
	/// Unknown fields are shown.
	pub fn is_visible<T: Entity>(&self, field: &str, record: &T) -> bool {
		let descriptor = self.registry.descriptor::<T>();
		match descriptor.field(field) {
			Some(f) => self.rules.is_visible(f, record, &descriptor),
			None => true,
		}
	}

	/// Whether the named field is conditionally required for this
	/// record. Unknown fields are not.
	pub fn is_required<T: Entity>(&self, field: &str, record: &T) -> bool {
		let descriptor = self.registry.descriptor::<T>();
		match descriptor.field(field) {
			Some(f) => self.rules.is_required(f, record, &descriptor),
			None => false,
		}
	}

	/// Project a record of `T` into its reference display item.
	pub fn display_item<T: Entity>(&self, record: &T) -> DisplayItem {
		self.registry.reference_metadata::<T>().resolve(record)
	}
}

/// Convenient glob import for application code.
pub mod prelude {
	pub use crate::{
		Engine, Entity, EntityMeta, FieldMeta, FieldValue, MetaRegistry, Record, TabMeta,
	};
}
