//! Declarative entity schema
//!
//! A record type describes its shape once with [`EntityMeta`] — a plain
//! data table of [`FieldMeta`] entries plus type-level presentation
//! config. The registry classifies this declaration into an immutable
//! [`crate::EntityDescriptor`] on first access.

use crate::descriptor::FieldKind;
use crate::value::Record;
use serde::{Deserialize, Serialize};

/// A record type manageable by the generic CRUD layer.
///
/// `meta()` is the compile-time-registered replacement for runtime
/// reflection: it is invoked exactly once per type per process by the
/// [`crate::MetaRegistry`].
pub trait Entity: Record + 'static {
	/// The declarative schema of this record type.
	fn meta() -> EntityMeta;
}

/// Type-level declarative configuration for one record type.
///
/// # Examples
///
/// ```
/// use jobim_meta::{EntityMeta, FieldMeta, TabMeta};
///
/// let meta = EntityMeta::new("Customer")
///     .title("Customers")
///     .icon("people")
///     .page_size(25)
///     .tab(TabMeta::new("main", "Main"))
///     .field(FieldMeta::integer("Id").primary_key())
///     .field(FieldMeta::text("Name").searchable());
///
/// assert_eq!(meta.name, "Customer");
/// assert_eq!(meta.fields.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMeta {
	/// Entity name, also used as the default title
	pub name: String,
	pub title: Option<String>,
	pub icon: Option<String>,
	pub page_size: Option<usize>,
	pub tabs: Vec<TabMeta>,
	pub fields: Vec<FieldMeta>,
}

impl EntityMeta {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			title: None,
			icon: None,
			page_size: None,
			tabs: Vec::new(),
			fields: Vec::new(),
		}
	}

	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(icon.into());
		self
	}

	pub fn page_size(mut self, size: usize) -> Self {
		self.page_size = Some(size);
		self
	}

	pub fn tab(mut self, tab: TabMeta) -> Self {
		self.tabs.push(tab);
		self
	}

	pub fn field(mut self, field: FieldMeta) -> Self {
		self.fields.push(field);
		self
	}
}

/// A form tab declared at type level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabMeta {
	pub id: String,
	pub title: String,
}

impl TabMeta {
	pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
		Self { id: id.into(), title: title.into() }
	}
}

/// Subtitle participation of a field in reference display resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubtitleMeta {
	/// Position among the subtitle fields
	pub order: u32,
	/// Optional label prepended to the formatted value
	pub prefix: Option<String>,
}

/// Declarative description of one field of a record type.
///
/// Constructed through the per-kind constructors and refined with the
/// builder methods; the extractor derives the final flags.
///
/// # Examples
///
/// ```
/// use jobim_meta::FieldMeta;
///
/// let tax_id = FieldMeta::text("TaxId")
///     .searchable()
///     .formatted("##.###.###/####-##");
/// assert!(tax_id.searchable);
/// assert!(tax_id.display_format.is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMeta {
	pub name: String,
	pub kind: FieldKind,
	/// Explicit opt-in; textual fields are searchable regardless
	pub searchable: bool,
	pub sortable: bool,
	/// Lazy-loadable relation, candidate for navigation classification
	pub relation: bool,
	pub reference_target: Option<String>,
	pub display_format: Option<String>,
	pub grid_order: Option<u32>,
	pub form_order: Option<u32>,
	pub tab: Option<String>,
	pub section: Option<String>,
	pub primary_key: bool,
	/// Preferred default-ordering field
	pub id_like: bool,
	/// Preferred display-text field when this type is a reference target
	pub reference_text: bool,
	pub subtitle: Option<SubtitleMeta>,
	/// Enum members as (variant name, underlying ordinal)
	pub variants: Vec<(String, i64)>,
	/// Conditional visibility rule evaluated against the live record
	pub show_when: Option<String>,
	/// Conditional requiredness rule evaluated against the live record
	pub required_when: Option<String>,
}

impl FieldMeta {
	fn with_kind(name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			name: name.into(),
			kind,
			searchable: false,
			sortable: true,
			relation: false,
			reference_target: None,
			display_format: None,
			grid_order: None,
			form_order: None,
			tab: None,
			section: None,
			primary_key: false,
			id_like: false,
			reference_text: false,
			subtitle: None,
			variants: Vec::new(),
			show_when: None,
			required_when: None,
		}
	}

	pub fn text(name: impl Into<String>) -> Self {
		Self::with_kind(name, FieldKind::Text)
	}

	pub fn integer(name: impl Into<String>) -> Self {
		Self::with_kind(name, FieldKind::Integer)
	}

	pub fn decimal(name: impl Into<String>) -> Self {
		Self::with_kind(name, FieldKind::Decimal)
	}

	pub fn date(name: impl Into<String>) -> Self {
		Self::with_kind(name, FieldKind::Date)
	}

	pub fn boolean(name: impl Into<String>) -> Self {
		Self::with_kind(name, FieldKind::Boolean)
	}

	/// An enum field with its members as (variant, ordinal) pairs.
	pub fn enumeration<V: Into<String>>(
		name: impl Into<String>,
		variants: impl IntoIterator<Item = (V, i64)>,
	) -> Self {
		let mut field = Self::with_kind(name, FieldKind::Enum);
		field.variants = variants
			.into_iter()
			.map(|(v, o)| (v.into(), o))
			.collect();
		field
	}

	/// A field holding a related record of the named target type.
	pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
		let mut field = Self::with_kind(name, FieldKind::Reference);
		field.reference_target = Some(target.into());
		field
	}

	pub fn searchable(mut self) -> Self {
		self.searchable = true;
		self
	}

	pub fn sortable(mut self, sortable: bool) -> Self {
		self.sortable = sortable;
		self
	}

	/// Mark the field as a lazy-loadable relation.
	pub fn relation(mut self) -> Self {
		self.relation = true;
		self
	}

	pub fn primary_key(mut self) -> Self {
		self.primary_key = true;
		self
	}

	pub fn id_like(mut self) -> Self {
		self.id_like = true;
		self
	}

	pub fn reference_text(mut self) -> Self {
		self.reference_text = true;
		self
	}

	/// Declare the canonical display format (masked formats drive
	/// search normalization).
	pub fn formatted(mut self, format: impl Into<String>) -> Self {
		self.display_format = Some(format.into());
		self
	}

	pub fn grid(mut self, order: u32) -> Self {
		self.grid_order = Some(order);
		self
	}

	pub fn form(mut self, order: u32) -> Self {
		self.form_order = Some(order);
		self
	}

	pub fn tab(mut self, tab: impl Into<String>) -> Self {
		self.tab = Some(tab.into());
		self
	}

	pub fn section(mut self, section: impl Into<String>) -> Self {
		self.section = Some(section.into());
		self
	}

	pub fn subtitle(mut self, order: u32) -> Self {
		self.subtitle = Some(SubtitleMeta { order, prefix: None });
		self
	}

	pub fn subtitle_with_prefix(mut self, order: u32, prefix: impl Into<String>) -> Self {
		self.subtitle = Some(SubtitleMeta { order, prefix: Some(prefix.into()) });
		self
	}

	pub fn show_when(mut self, rule: impl Into<String>) -> Self {
		self.show_when = Some(rule.into());
		self
	}

	pub fn required_when(mut self, rule: impl Into<String>) -> Self {
		self.required_when = Some(rule.into());
		self
	}
}
