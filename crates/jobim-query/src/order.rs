//! Dynamic sort construction
//!
//! A `(field, direction)` sort spec becomes a comparator validated
//! against the entity descriptor. An unknown field yields the identity
//! order so the caller's existing ordering is preserved; only a single
//! sort key is supported.

use jobim_meta::{Entity, EntityDescriptor, MetaRegistry, Record};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// A comparison key over records of type `T`.
pub struct OrderKey<T: ?Sized> {
	compare: Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>,
	identity: bool,
}

/// An order key over type-erased records.
pub type DynOrderKey = OrderKey<dyn Record>;

impl<T: ?Sized> Clone for OrderKey<T> {
	fn clone(&self) -> Self {
		Self { compare: self.compare.clone(), identity: self.identity }
	}
}

impl<T: ?Sized> OrderKey<T> {
	pub fn new(compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
		Self { compare: Arc::new(compare), identity: false }
	}

	/// The no-op order: every pair compares equal, leaving the
	/// caller's existing ordering untouched.
	pub fn identity() -> Self {
		Self { compare: Arc::new(|_, _| Ordering::Equal), identity: true }
	}

	/// Whether this key leaves the existing ordering unchanged.
	pub fn is_identity(&self) -> bool {
		self.identity
	}

	pub fn compare(&self, a: &T, b: &T) -> Ordering {
		(self.compare)(a, b)
	}

	/// Stable in-memory sort by this key.
	pub fn sort(&self, items: &mut [T])
	where
		T: Sized,
	{
		if self.identity {
			return;
		}
		let compare = self.compare.clone();
		items.sort_by(|a, b| compare(a, b));
	}
}

/// Builds order keys from request sort specs.
///
/// # Examples
///
/// ```
/// use jobim_meta::{Entity, EntityMeta, FieldMeta, FieldValue, MetaRegistry, Record};
/// use jobim_query::SortBuilder;
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
/// let builder = SortBuilder::new(&registry);
///
/// let mut cities = vec![
///     City { name: "Olinda".into() },
///     City { name: "Recife".into() },
/// ];
/// builder.build_order::<City>("Name", "desc").sort(&mut cities);
/// assert_eq!(cities[0].name, "Recife");
/// ```
pub struct SortBuilder<'a> {
	registry: &'a MetaRegistry,
}

impl<'a> SortBuilder<'a> {
	pub fn new(registry: &'a MetaRegistry) -> Self {
		Self { registry }
	}

	/// Build the typed order key for `T`.
	///
	/// `direction` matches `"desc"` case-insensitively; anything else
	/// sorts ascending.
	pub fn build_order<T: Entity>(&self, field: &str, direction: &str) -> OrderKey<T> {
		let inner = self.build_order_dyn(&self.registry.descriptor::<T>(), field, direction);
		if inner.is_identity() {
			return OrderKey::identity();
		}
		OrderKey::new(move |a: &T, b: &T| inner.compare(a, b))
	}

	/// Build an order key over type-erased records against an explicit
	/// descriptor.
	pub fn build_order_dyn(
		&self,
		descriptor: &EntityDescriptor,
		field: &str,
		direction: &str,
	) -> DynOrderKey {
		let Some(resolved) = descriptor.field(field) else {
			debug!(entity = %descriptor.name, field = %field, "unknown sort field, keeping existing order");
			return OrderKey::identity();
		};
		let name = resolved.name.clone();
		let descending = direction.trim().eq_ignore_ascii_case("desc");
		DynOrderKey::new(move |a, b| {
			let ordering = a.get(&name).compare(&b.get(&name));
			if descending {
				ordering.reverse()
			} else {
				ordering
			}
		})
	}
}
