//! Reference display resolution
//!
//! When a field points at another record type, grids, autocomplete
//! endpoints and form widgets need a human-readable representation of
//! the related record. [`ReferenceMetadata`] picks the display-text
//! field by declared priority and assembles an optional subtitle from
//! the declared subtitle fields.

use crate::descriptor::EntityDescriptor;
use crate::value::{resolve_path, Record};
use serde::{Deserialize, Serialize};

const SUBTITLE_SEPARATOR: &str = " | ";

/// One field participating in a reference subtitle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubtitleField {
	/// Field name, possibly a dotted navigation path
	pub name: String,
	pub prefix: Option<String>,
}

/// Cached display metadata for a reference-target type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceMetadata {
	/// Field whose value identifies the record (primary key or id-like)
	pub key_field: Option<String>,
	/// Field shown as the main display text
	pub display_field: Option<String>,
	/// Subtitle fields in declared order
	pub subtitle_fields: Vec<SubtitleField>,
	/// Fields eligible for free-text search against this target
	pub search_fields: Vec<String>,
}

/// Human-readable projection of one related record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayItem {
	pub value: String,
	pub text: String,
	pub subtitle: Option<String>,
}

impl ReferenceMetadata {
	/// Derive the reference metadata from a classified descriptor.
	///
	/// Display-text priority: explicitly flagged field → `Name` →
	/// `Description` → first textual field that is not the identifier.
	pub fn from_descriptor(descriptor: &EntityDescriptor) -> Self {
		let display_field = pick_display_field(descriptor);

		let mut subtitle_fields: Vec<(u32, SubtitleField)> = descriptor
			.fields()
			.iter()
			.filter_map(|f| {
				f.subtitle.as_ref().map(|s| {
					(
						s.order,
						SubtitleField { name: f.name.clone(), prefix: s.prefix.clone() },
					)
				})
			})
			.collect();
		subtitle_fields.sort_by_key(|(order, _)| *order);

		let key_field = descriptor
			.primary_key()
			.or_else(|| descriptor.fields().iter().find(|f| f.id_like))
			.map(|f| f.name.clone());

		Self {
			key_field,
			display_field,
			subtitle_fields: subtitle_fields.into_iter().map(|(_, f)| f).collect(),
			search_fields: descriptor
				.searchable_fields()
				.map(|f| f.name.clone())
				.collect(),
		}
	}

	/// Project a live record into a [`DisplayItem`].
	///
	/// Subtitle fields with null or blank values are skipped; dotted
	/// navigation paths are walked null-safely.
	pub fn resolve(&self, record: &dyn Record) -> DisplayItem {
		let value = self
			.key_field
			.as_deref()
			.and_then(|f| resolve_path(record, f).as_text())
			.unwrap_or_default();

		let text = self
			.display_field
			.as_deref()
			.and_then(|f| resolve_path(record, f).as_text())
			.unwrap_or_default();

		let parts: Vec<String> = self
			.subtitle_fields
			.iter()
			.filter_map(|field| {
				let rendered = resolve_path(record, &field.name).as_text()?;
				if rendered.trim().is_empty() {
					return None;
				}
				Some(match &field.prefix {
					Some(prefix) => format!("{prefix}{rendered}"),
					None => rendered,
				})
			})
			.collect();

		DisplayItem {
			value,
			text,
			subtitle: if parts.is_empty() {
				None
			} else {
				Some(parts.join(SUBTITLE_SEPARATOR))
			},
		}
	}
}

fn pick_display_field(descriptor: &EntityDescriptor) -> Option<String> {
	if let Some(f) = descriptor.fields().iter().find(|f| f.reference_text) {
		return Some(f.name.clone());
	}
	for candidate in ["Name", "Description"] {
		if let Some(f) = descriptor
			.fields()
			.iter()
			.find(|f| f.name.eq_ignore_ascii_case(candidate))
		{
			return Some(f.name.clone());
		}
	}
	descriptor
		.fields()
		.iter()
		.find(|f| {
			f.kind == crate::descriptor::FieldKind::Text && !f.primary_key && !f.id_like
		})
		.map(|f| f.name.clone())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::extract::build_descriptor;
	use crate::schema::{EntityMeta, FieldMeta};
	use crate::value::FieldValue;

	struct Supplier {
		id: i64,
		trade_name: String,
		city: String,
		phone: String,
	}

	impl Record for Supplier {
		fn get(&self, field: &str) -> FieldValue {
			match field {
				"Id" => self.id.into(),
				"TradeName" => self.trade_name.as_str().into(),
				"City" => self.city.as_str().into(),
				"Phone" => self.phone.as_str().into(),
				_ => FieldValue::Null,
			}
		}
	}

	fn supplier_descriptor() -> EntityDescriptor {
		build_descriptor(
			EntityMeta::new("Supplier")
				.field(FieldMeta::integer("Id").primary_key())
				.field(FieldMeta::text("TradeName").reference_text())
				.field(FieldMeta::text("City").subtitle(1))
				.field(FieldMeta::text("Phone").subtitle_with_prefix(2, "Tel: ")),
		)
	}

	#[test]
	fn test_explicit_display_field_wins() {
		let meta = ReferenceMetadata::from_descriptor(&supplier_descriptor());
		assert_eq!(meta.display_field.as_deref(), Some("TradeName"));
		assert_eq!(meta.key_field.as_deref(), Some("Id"));
	}

	#[test]
	fn test_display_field_fallback_chain() {
		let by_name = build_descriptor(
			EntityMeta::new("T")
				.field(FieldMeta::integer("Id").primary_key())
				.field(FieldMeta::text("Name")),
		);
		assert_eq!(
			ReferenceMetadata::from_descriptor(&by_name).display_field.as_deref(),
			Some("Name"),
		);

		let by_description = build_descriptor(
			EntityMeta::new("T")
				.field(FieldMeta::integer("Id").primary_key())
				.field(FieldMeta::text("Description")),
		);
		assert_eq!(
			ReferenceMetadata::from_descriptor(&by_description)
				.display_field
				.as_deref(),
			Some("Description"),
		);

		let first_text = build_descriptor(
			EntityMeta::new("T")
				.field(FieldMeta::integer("Id").primary_key())
				.field(FieldMeta::text("Label")),
		);
		assert_eq!(
			ReferenceMetadata::from_descriptor(&first_text)
				.display_field
				.as_deref(),
			Some("Label"),
		);
	}

	#[test]
	fn test_resolve_builds_subtitle_in_order() {
		let meta = ReferenceMetadata::from_descriptor(&supplier_descriptor());
		let item = meta.resolve(&Supplier {
			id: 7,
			trade_name: "Acme Ltda".into(),
			city: "Recife".into(),
			phone: "(81) 3333-0000".into(),
		});
		assert_eq!(item.value, "7");
		assert_eq!(item.text, "Acme Ltda");
		assert_eq!(item.subtitle.as_deref(), Some("Recife | Tel: (81) 3333-0000"));
	}

	#[test]
	fn test_resolve_skips_blank_subtitle_parts() {
		let meta = ReferenceMetadata::from_descriptor(&supplier_descriptor());
		let item = meta.resolve(&Supplier {
			id: 7,
			trade_name: "Acme Ltda".into(),
			city: String::new(),
			phone: String::new(),
		});
		assert_eq!(item.subtitle, None);
	}
}
