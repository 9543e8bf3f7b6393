//! Field classification
//!
//! Turns a declarative [`EntityMeta`] into the classified, immutable
//! [`EntityDescriptor`]. A field declaration that cannot be classified
//! is skipped with a warning; building never fails wholesale because of
//! a single bad field.

use crate::descriptor::{EntityDescriptor, FieldDescriptor, FieldKind};
use crate::schema::{EntityMeta, FieldMeta};
use std::collections::HashSet;
use thiserror::Error;
use tracing::warn;

const DEFAULT_PAGE_SIZE: usize = 20;

// Audit/ownership back-references are never treated as navigations, so
// include chains cannot cycle through them.
const EXCLUDED_NAVIGATIONS: &[&str] = &["CreatedBy", "UpdatedBy", "Owner"];

/// Why a declared field was rejected during classification.
#[derive(Debug, Error)]
pub enum SchemaError {
	#[error("field has an empty name")]
	EmptyName,
	#[error("duplicate field name `{0}`")]
	DuplicateName(String),
	#[error("enum field `{0}` declares no variants")]
	EmptyEnum(String),
}

/// Build the classified descriptor for one entity declaration.
///
/// Classification is convention-based:
/// - a field is searchable when it is textual or explicitly flagged;
/// - a reference field marked as a relation becomes a navigation unless
///   its name is on the audit back-reference exclusion list;
/// - the default ordering field resolves id-like → `Code` → `Name` →
///   primary key.
///
/// # Examples
///
/// ```
/// use jobim_meta::{build_descriptor, EntityMeta, FieldMeta};
///
/// let desc = build_descriptor(
///     EntityMeta::new("Customer")
///         .field(FieldMeta::integer("Id").primary_key())
///         .field(FieldMeta::text("Name"))
///         .field(FieldMeta::reference("Company", "Company").relation()),
/// );
///
/// assert_eq!(desc.default_order, "Name");
/// assert!(desc.field("Name").unwrap().searchable);
/// assert!(desc.field("Company").unwrap().is_navigation);
/// ```
pub fn build_descriptor(meta: EntityMeta) -> EntityDescriptor {
	let mut seen: HashSet<String> = HashSet::new();
	let mut fields = Vec::with_capacity(meta.fields.len());

	for spec in meta.fields {
		match classify(&spec, &mut seen) {
			Ok(field) => fields.push(field),
			Err(err) => {
				warn!(entity = %meta.name, field = %spec.name, %err, "skipping field declaration");
			}
		}
	}

	let default_order = resolve_default_order(&fields);
	let title = meta.title.unwrap_or_else(|| meta.name.clone());

	EntityDescriptor::new(
		meta.name,
		title,
		meta.icon,
		meta.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
		meta.tabs,
		default_order,
		fields,
	)
}

fn classify(spec: &FieldMeta, seen: &mut HashSet<String>) -> Result<FieldDescriptor, SchemaError> {
	if spec.name.trim().is_empty() {
		return Err(SchemaError::EmptyName);
	}
	if spec.kind == FieldKind::Enum && spec.variants.is_empty() {
		return Err(SchemaError::EmptyEnum(spec.name.clone()));
	}
	if !seen.insert(spec.name.to_lowercase()) {
		return Err(SchemaError::DuplicateName(spec.name.clone()));
	}

	let is_reference = spec.kind == FieldKind::Reference;
	let is_navigation = is_reference && spec.relation && !is_excluded_navigation(&spec.name);

	if is_reference && spec.reference_target.is_none() {
		warn!(field = %spec.name, "reference field declares no target type");
	}

	Ok(FieldDescriptor {
		name: spec.name.clone(),
		kind: spec.kind,
		searchable: spec.kind == FieldKind::Text || spec.searchable,
		sortable: spec.sortable,
		is_navigation,
		is_enum: spec.kind == FieldKind::Enum,
		is_date: spec.kind == FieldKind::Date,
		is_reference,
		primary_key: spec.primary_key,
		id_like: spec.id_like,
		reference_text: spec.reference_text,
		reference_target: spec.reference_target.clone(),
		display_format: spec.display_format.clone(),
		grid_order: spec.grid_order,
		form_order: spec.form_order,
		tab: spec.tab.clone(),
		section: spec.section.clone(),
		subtitle: spec.subtitle.clone(),
		variants: spec.variants.clone(),
		show_when: spec.show_when.clone(),
		required_when: spec.required_when.clone(),
	})
}

fn is_excluded_navigation(name: &str) -> bool {
	EXCLUDED_NAVIGATIONS
		.iter()
		.any(|excluded| excluded.eq_ignore_ascii_case(name))
}

// Priority: explicitly id-like field, then "Code", then "Name", then the
// primary key, then the first declared field.
fn resolve_default_order(fields: &[FieldDescriptor]) -> String {
	if let Some(f) = fields.iter().find(|f| f.id_like) {
		return f.name.clone();
	}
	for candidate in ["Code", "Name"] {
		if let Some(f) = fields.iter().find(|f| f.name.eq_ignore_ascii_case(candidate)) {
			return f.name.clone();
		}
	}
	if let Some(f) = fields.iter().find(|f| f.primary_key) {
		return f.name.clone();
	}
	fields.first().map(|f| f.name.clone()).unwrap_or_default()
}
