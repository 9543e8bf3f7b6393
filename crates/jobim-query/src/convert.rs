//! Raw string → typed field value conversion

use chrono::{NaiveDate, NaiveDateTime};
use jobim_meta::{FieldDescriptor, FieldKind, FieldValue};
use thiserror::Error;

/// Why a raw filter value failed to convert to a field's native type.
///
/// Conversion failures are logged and the filter term is dropped; this
/// error never reaches an end user.
#[derive(Debug, Error)]
pub enum ConvertError {
	#[error("`{0}` is not a valid integer")]
	Integer(String),
	#[error("`{0}` is not a valid decimal")]
	Decimal(String),
	#[error("`{0}` is not a valid boolean")]
	Boolean(String),
	#[error("`{0}` is not a recognized date")]
	Date(String),
	#[error("`{0}` does not match any member of enum field `{1}`")]
	EnumMember(String, String),
	#[error("field `{0}` does not accept direct filter values")]
	Unfilterable(String),
}

/// Convert a raw query-parameter string into the native typed value of
/// the given field.
///
/// Enum values convert by member name (case-insensitive) or by raw
/// ordinal; dates accept RFC 3339, `%Y-%m-%d` and `%d/%m/%Y` input.
/// Reference and navigation fields never convert — filters on them are
/// dropped.
///
/// # Examples
///
/// ```
/// use jobim_meta::{build_descriptor, EntityMeta, FieldMeta};
/// use jobim_query::parse_value;
///
/// let desc = build_descriptor(
///     EntityMeta::new("T")
///         .field(FieldMeta::enumeration("Status", [("Draft", 1), ("Final", 2)])),
/// );
/// let field = desc.field("Status").unwrap();
///
/// assert_eq!(parse_value(field, "final").unwrap().as_number(), Some(2.0));
/// assert_eq!(parse_value(field, "1").unwrap().as_number(), Some(1.0));
/// assert!(parse_value(field, "unknown").is_err());
/// ```
pub fn parse_value(field: &FieldDescriptor, raw: &str) -> Result<FieldValue, ConvertError> {
	let raw = raw.trim();
	match field.kind {
		FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
		FieldKind::Integer => raw
			.parse::<i64>()
			.map(FieldValue::Integer)
			.map_err(|_| ConvertError::Integer(raw.to_string())),
		FieldKind::Decimal => raw
			.parse::<f64>()
			.map(FieldValue::Decimal)
			.map_err(|_| ConvertError::Decimal(raw.to_string())),
		FieldKind::Boolean => match raw.to_ascii_lowercase().as_str() {
			"true" | "1" => Ok(FieldValue::Boolean(true)),
			"false" | "0" => Ok(FieldValue::Boolean(false)),
			_ => Err(ConvertError::Boolean(raw.to_string())),
		},
		FieldKind::Date => parse_date(raw).ok_or_else(|| ConvertError::Date(raw.to_string())),
		FieldKind::Enum => parse_enum(field, raw),
		FieldKind::Reference => Err(ConvertError::Unfilterable(field.name.clone())),
	}
}

fn parse_date(raw: &str) -> Option<FieldValue> {
	if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
		return Some(FieldValue::Date(dt.naive_utc()));
	}
	if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
		return Some(FieldValue::Date(dt));
	}
	for format in ["%Y-%m-%d", "%d/%m/%Y"] {
		if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
			return Some(FieldValue::from_date(date));
		}
	}
	None
}

// Member name first, ordinal second, so a member literally named "1"
// still resolves by name.
fn parse_enum(field: &FieldDescriptor, raw: &str) -> Result<FieldValue, ConvertError> {
	if let Some(ordinal) = field.variant_ordinal(raw) {
		let variant = field.variant_name(ordinal).unwrap_or(raw).to_string();
		return Ok(FieldValue::Enum { variant, ordinal });
	}
	if let Ok(ordinal) = raw.parse::<i64>() {
		if let Some(variant) = field.variant_name(ordinal) {
			return Ok(FieldValue::Enum { variant: variant.to_string(), ordinal });
		}
	}
	Err(ConvertError::EnumMember(raw.to_string(), field.name.clone()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use jobim_meta::{build_descriptor, EntityMeta, FieldMeta};
	use rstest::rstest;

	fn descriptor() -> jobim_meta::EntityDescriptor {
		build_descriptor(
			EntityMeta::new("T")
				.field(FieldMeta::integer("Count"))
				.field(FieldMeta::decimal("Price"))
				.field(FieldMeta::boolean("Active"))
				.field(FieldMeta::date("IssuedAt"))
				.field(FieldMeta::reference("Company", "Company")),
		)
	}

	#[rstest]
	#[case("true", true)]
	#[case("1", true)]
	#[case("FALSE", false)]
	#[case("0", false)]
	fn test_boolean_inputs(#[case] raw: &str, #[case] expected: bool) {
		let desc = descriptor();
		let value = parse_value(desc.field("Active").unwrap(), raw).unwrap();
		assert!(matches!(value, FieldValue::Boolean(b) if b == expected));
	}

	#[rstest]
	#[case("2024-03-10")]
	#[case("10/03/2024")]
	#[case("2024-03-10T00:00:00")]
	fn test_date_input_formats(#[case] raw: &str) {
		let desc = descriptor();
		let value = parse_value(desc.field("IssuedAt").unwrap(), raw).unwrap();
		let date = value.as_date().unwrap().date();
		assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
	}

	#[test]
	fn test_numeric_failures() {
		let desc = descriptor();
		assert!(parse_value(desc.field("Count").unwrap(), "abc").is_err());
		assert!(parse_value(desc.field("Price").unwrap(), "1,5").is_err());
		assert!(parse_value(desc.field("Count").unwrap(), " 42 ").is_ok());
	}

	#[test]
	fn test_reference_fields_are_unfilterable() {
		let desc = descriptor();
		assert!(matches!(
			parse_value(desc.field("Company").unwrap(), "7"),
			Err(ConvertError::Unfilterable(_)),
		));
	}
}
