//! Immutable, classified entity and field descriptors

use crate::schema::{SubtitleMeta, TabMeta};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Semantic kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
	Text,
	Integer,
	Decimal,
	Date,
	Boolean,
	Enum,
	Reference,
}

/// Characters a masked display format carries and that are stripped
/// from both sides of a substring comparison.
pub const MASK_PUNCTUATION: &[char] = &['.', '-', '/', '(', ')', ' '];

/// Classified, immutable metadata about one field of a record type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
	pub name: String,
	pub kind: FieldKind,
	pub searchable: bool,
	pub sortable: bool,
	pub is_navigation: bool,
	pub is_enum: bool,
	pub is_date: bool,
	pub is_reference: bool,
	pub primary_key: bool,
	pub id_like: bool,
	pub reference_text: bool,
	pub reference_target: Option<String>,
	pub display_format: Option<String>,
	pub grid_order: Option<u32>,
	pub form_order: Option<u32>,
	pub tab: Option<String>,
	pub section: Option<String>,
	pub subtitle: Option<SubtitleMeta>,
	pub variants: Vec<(String, i64)>,
	pub show_when: Option<String>,
	pub required_when: Option<String>,
}

impl FieldDescriptor {
	/// Whether the declared display format carries punctuation that a
	/// stored value would also carry (document numbers, phone numbers).
	///
	/// # Examples
	///
	/// ```
	/// use jobim_meta::{build_descriptor, EntityMeta, FieldMeta};
	///
	/// let desc = build_descriptor(
	///     EntityMeta::new("Person")
	///         .field(FieldMeta::text("TaxId").formatted("###.###.###-##"))
	///         .field(FieldMeta::text("Name")),
	/// );
	/// assert!(desc.field("TaxId").unwrap().is_masked());
	/// assert!(!desc.field("Name").unwrap().is_masked());
	/// ```
	pub fn is_masked(&self) -> bool {
		self.display_format
			.as_deref()
			.is_some_and(|f| f.contains(MASK_PUNCTUATION))
	}

	/// Resolve an enum member by name, case-insensitively.
	pub fn variant_ordinal(&self, name: &str) -> Option<i64> {
		self.variants
			.iter()
			.find(|(v, _)| v.eq_ignore_ascii_case(name))
			.map(|(_, o)| *o)
	}

	/// Resolve an enum member name by its ordinal.
	pub fn variant_name(&self, ordinal: i64) -> Option<&str> {
		self.variants
			.iter()
			.find(|(_, o)| *o == ordinal)
			.map(|(v, _)| v.as_str())
	}
}

/// Classified, immutable metadata about a whole record type.
///
/// Built once per type by [`crate::build_descriptor`] and cached by the
/// [`crate::MetaRegistry`]; callers only ever receive shared read-only
/// views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDescriptor {
	pub name: String,
	pub title: String,
	pub icon: Option<String>,
	pub page_size: usize,
	pub tabs: Vec<TabMeta>,
	pub default_order: String,
	fields: Vec<FieldDescriptor>,
	#[serde(skip)]
	index: HashMap<String, usize>,
}

impl EntityDescriptor {
	pub(crate) fn new(
		name: String,
		title: String,
		icon: Option<String>,
		page_size: usize,
		tabs: Vec<TabMeta>,
		default_order: String,
		fields: Vec<FieldDescriptor>,
	) -> Self {
		let index = fields
			.iter()
			.enumerate()
			.map(|(i, f)| (f.name.to_lowercase(), i))
			.collect();
		Self { name, title, icon, page_size, tabs, default_order, fields, index }
	}

	/// All fields in declaration order.
	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	/// Look a field up by case-insensitive name.
	pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.index
			.get(&name.to_lowercase())
			.map(|&i| &self.fields[i])
	}

	/// Fields eligible for free-text OR-search.
	pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
		self.fields.iter().filter(|f| f.searchable)
	}

	/// The primary key field, if one was declared.
	pub fn primary_key(&self) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|f| f.primary_key)
	}

	/// Fields carrying a grid hint, in grid order.
	pub fn grid_fields(&self) -> Vec<&FieldDescriptor> {
		let mut fields: Vec<_> = self
			.fields
			.iter()
			.filter(|f| f.grid_order.is_some())
			.collect();
		fields.sort_by_key(|f| f.grid_order);
		fields
	}

	/// Fields carrying a form hint, in form order.
	pub fn form_fields(&self) -> Vec<&FieldDescriptor> {
		let mut fields: Vec<_> = self
			.fields
			.iter()
			.filter(|f| f.form_order.is_some())
			.collect();
		fields.sort_by_key(|f| f.form_order);
		fields
	}
}
