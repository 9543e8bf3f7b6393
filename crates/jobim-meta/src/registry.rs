//! Process-wide descriptor cache
//!
//! The registry is an explicit object constructed at startup and passed
//! by reference; there is no hidden global state. The first access for
//! a type pays the classification cost, every later access (from any
//! thread) returns the same immutable instance.

use crate::descriptor::EntityDescriptor;
use crate::extract::build_descriptor;
use crate::reference::ReferenceMetadata;
use crate::schema::Entity;
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;
use tracing::debug;

/// Per-type cache of [`EntityDescriptor`] and [`ReferenceMetadata`].
///
/// Get-or-create is atomic: concurrent first accesses for the same type
/// never publish two different descriptor instances and no caller ever
/// observes a half-built one.
///
/// # Examples
///
/// ```
/// use jobim_meta::{Entity, EntityMeta, FieldMeta, FieldValue, MetaRegistry, Record};
///
/// struct Tag {
///     name: String,
/// }
///
/// impl Record for Tag {
///     fn get(&self, field: &str) -> FieldValue {
///         match field {
///             "Name" => self.name.as_str().into(),
///             _ => FieldValue::Null,
///         }
///     }
/// }
///
/// impl Entity for Tag {
///     fn meta() -> EntityMeta {
///         EntityMeta::new("Tag").field(FieldMeta::text("Name"))
///     }
/// }
///
/// let registry = MetaRegistry::new();
/// let a = registry.descriptor::<Tag>();
/// let b = registry.descriptor::<Tag>();
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// ```
#[derive(Default)]
pub struct MetaRegistry {
	descriptors: DashMap<TypeId, Arc<EntityDescriptor>>,
	references: DashMap<TypeId, Arc<ReferenceMetadata>>,
}

impl MetaRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Get the cached descriptor for `T`, building it on first access.
	pub fn descriptor<T: Entity>(&self) -> Arc<EntityDescriptor> {
		self.descriptors
			.entry(TypeId::of::<T>())
			.or_insert_with(|| {
				debug!(entity = std::any::type_name::<T>(), "building entity descriptor");
				Arc::new(build_descriptor(T::meta()))
			})
			.value()
			.clone()
	}

	/// Get the cached reference metadata for `T` as a reference target.
	pub fn reference_metadata<T: Entity>(&self) -> Arc<ReferenceMetadata> {
		if let Some(cached) = self.references.get(&TypeId::of::<T>()) {
			return cached.value().clone();
		}
		let descriptor = self.descriptor::<T>();
		self.references
			.entry(TypeId::of::<T>())
			.or_insert_with(|| Arc::new(ReferenceMetadata::from_descriptor(&descriptor)))
			.value()
			.clone()
	}

	/// Number of descriptors built so far, for diagnostics.
	pub fn len(&self) -> usize {
		self.descriptors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.descriptors.is_empty()
	}
}
