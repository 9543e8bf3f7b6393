//! Dynamic predicate construction
//!
//! A request-scoped filter map (field name → raw string) becomes one
//! composable boolean closure over record instances. The reserved
//! `search` key fans out into an OR across every searchable field;
//! every other key becomes a typed equality term. Unknown fields and
//! unconvertible values are skipped, never surfaced as errors.

use crate::convert::parse_value;
use jobim_meta::{Entity, EntityDescriptor, FieldValue, MASK_PUNCTUATION, MetaRegistry, Record};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Reserved filter-map key carrying the free-text search term.
pub const SEARCH_KEY: &str = "search";

/// A composable boolean predicate over records of type `T`.
///
/// Side-effect-free and safe to apply repeatedly; it only ever reads
/// fields present on the type's descriptor.
pub struct Predicate<T: ?Sized>(Arc<dyn Fn(&T) -> bool + Send + Sync>);

/// A predicate over type-erased records, the form handed to in-memory
/// query executors.
pub type DynPredicate = Predicate<dyn Record>;

impl<T: ?Sized> Clone for Predicate<T> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}

impl<T: ?Sized> Predicate<T> {
	pub fn new(test: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
		Self(Arc::new(test))
	}

	/// The predicate that matches everything.
	pub fn always() -> Self {
		Self::new(|_| true)
	}

	pub fn matches(&self, record: &T) -> bool {
		(self.0)(record)
	}

	/// Logical AND, short-circuiting.
	pub fn and(self, other: Predicate<T>) -> Predicate<T>
	where
		T: 'static,
	{
		Predicate::new(move |r| self.matches(r) && other.matches(r))
	}

	/// Logical OR, short-circuiting.
	pub fn or(self, other: Predicate<T>) -> Predicate<T>
	where
		T: 'static,
	{
		Predicate::new(move |r| self.matches(r) || other.matches(r))
	}
}

/// Builds filter predicates from request filter maps.
///
/// # Examples
///
/// ```
/// use jobim_meta::{Entity, EntityMeta, FieldMeta, FieldValue, MetaRegistry, Record};
/// use jobim_query::FilterBuilder;
/// use std::collections::HashMap;
///
/// struct City {
///     name: String,
/// }
///
/// impl Record for City {
///     fn get(&self, field: &str) -> FieldValue {
///         match field {
///             "Name" => self.name.as_str().into(),
///             _ => FieldValue::Null,
///         }
///     }
/// }
///
/// impl Entity for City {
///     fn meta() -> EntityMeta {
///         EntityMeta::new("City").field(FieldMeta::text("Name"))
///     }
/// }
///
/// let registry = MetaRegistry::new();
/// let builder = FilterBuilder::new(&registry);
///
/// let mut filters = HashMap::new();
/// filters.insert("search".to_string(), "reci".to_string());
///
/// let predicate = builder.build_filter::<City>(&filters);
/// assert!(predicate.matches(&City { name: "Recife".into() }));
/// assert!(!predicate.matches(&City { name: "Olinda".into() }));
/// ```
pub struct FilterBuilder<'a> {
	registry: &'a MetaRegistry,
}

impl<'a> FilterBuilder<'a> {
	pub fn new(registry: &'a MetaRegistry) -> Self {
		Self { registry }
	}

	/// Build the typed predicate for `T` from a filter map.
	///
	/// An empty or fully skipped map yields a predicate that matches
	/// everything.
	pub fn build_filter<T: Entity>(&self, filters: &HashMap<String, String>) -> Predicate<T> {
		let inner = self.build_filter_dyn(self.registry.descriptor::<T>(), filters);
		Predicate::new(move |record: &T| inner.matches(record))
	}

	/// Build a predicate over type-erased records against an explicit
	/// descriptor.
	pub fn build_filter_dyn(
		&self,
		descriptor: Arc<EntityDescriptor>,
		filters: &HashMap<String, String>,
	) -> DynPredicate {
		let mut terms: Vec<DynPredicate> = Vec::new();

		for (key, raw) in filters {
			if key.eq_ignore_ascii_case(SEARCH_KEY) {
				if !raw.trim().is_empty() {
					terms.push(search_term(&descriptor, raw));
				}
				continue;
			}
			let Some(field) = descriptor.field(key) else {
				debug!(entity = %descriptor.name, field = %key, "unknown filter field skipped");
				continue;
			};
			match parse_value(field, raw) {
				Ok(expected) => terms.push(equality_term(field.name.clone(), expected)),
				Err(err) => {
					debug!(entity = %descriptor.name, field = %field.name, %err, "filter term dropped");
				}
			}
		}

		terms
			.into_iter()
			.fold(Predicate::always(), |acc, term| acc.and(term))
	}
}

// Case-insensitive substring OR across every searchable field. Each
// term is null-guarded; masked fields compare with punctuation stripped
// from both sides.
fn search_term(descriptor: &EntityDescriptor, raw: &str) -> DynPredicate {
	let needle = raw.trim().to_lowercase();
	let stripped_needle = strip_mask(&needle);
	let fields: Vec<(String, bool)> = descriptor
		.searchable_fields()
		.map(|f| (f.name.clone(), f.is_masked()))
		.collect();

	DynPredicate::new(move |record| {
		fields.iter().any(|(name, masked)| {
			let Some(text) = record.get(name).as_text() else {
				return false;
			};
			let haystack = text.to_lowercase();
			if *masked {
				strip_mask(&haystack).contains(&stripped_needle)
			} else {
				haystack.contains(&needle)
			}
		})
	})
}

fn equality_term(field: String, expected: FieldValue) -> DynPredicate {
	DynPredicate::new(move |record| value_eq(&record.get(&field), &expected))
}

fn strip_mask(text: &str) -> String {
	text.chars().filter(|c| !MASK_PUNCTUATION.contains(c)).collect()
}

fn value_eq(actual: &FieldValue, expected: &FieldValue) -> bool {
	match (actual, expected) {
		(FieldValue::Null, _) | (_, FieldValue::Null) => false,
		(FieldValue::Text(a), FieldValue::Text(b)) => a == b,
		(FieldValue::Boolean(a), FieldValue::Boolean(b)) => a == b,
		(FieldValue::Date(a), FieldValue::Date(b)) => a == b,
		_ => match (actual.as_number(), expected.as_number()) {
			(Some(a), Some(b)) => a == b,
			_ => false,
		},
	}
}
