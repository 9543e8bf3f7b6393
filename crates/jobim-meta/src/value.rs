//! Dynamic field values and the record accessor trait

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::fmt;
use std::sync::Arc;

/// Read access to a record's fields by name.
///
/// Implementations return [`FieldValue::Null`] for fields they do not
/// know; the engine treats an unknown field the same as a null one, so
/// a lookup can never fail.
pub trait Record: Send + Sync {
	/// Get the current value of the named field.
	fn get(&self, field: &str) -> FieldValue;
}

/// A dynamically typed field value read from a record.
///
/// This is the unit the predicate builder and the rule evaluator operate
/// on. Related records are carried as trait objects so dotted navigation
/// paths can be walked without knowing the concrete type.
#[derive(Clone, Default)]
pub enum FieldValue {
	#[default]
	Null,
	Text(String),
	Integer(i64),
	Decimal(f64),
	Boolean(bool),
	Date(NaiveDateTime),
	Enum { variant: String, ordinal: i64 },
	Record(Arc<dyn Record>),
}

impl FieldValue {
	/// Build a date value from a date without a time component.
	pub fn from_date(date: NaiveDate) -> Self {
		FieldValue::Date(date.and_hms_opt(0, 0, 0).unwrap_or(NaiveDateTime::MIN))
	}

	/// Whether the value counts as "present".
	///
	/// Strings must be non-blank, numbers non-zero and dates different
	/// from the zero/minimum date. Related records and booleans only
	/// need to be non-null.
	///
	/// # Examples
	///
	/// ```
	/// use jobim_meta::FieldValue;
	///
	/// assert!(FieldValue::Text("x".into()).has_value());
	/// assert!(!FieldValue::Text("  ".into()).has_value());
	/// assert!(!FieldValue::Integer(0).has_value());
	/// assert!(!FieldValue::Null.has_value());
	/// ```
	pub fn has_value(&self) -> bool {
		match self {
			FieldValue::Null => false,
			FieldValue::Text(s) => !s.trim().is_empty(),
			FieldValue::Integer(n) => *n != 0,
			FieldValue::Decimal(n) => *n != 0.0,
			FieldValue::Boolean(_) => true,
			FieldValue::Date(d) => !is_zero_date(d),
			FieldValue::Enum { .. } => true,
			FieldValue::Record(_) => true,
		}
	}

	/// Textual representation used for substring search, `Length` and
	/// display. `Null` and related records have none.
	pub fn as_text(&self) -> Option<String> {
		match self {
			FieldValue::Null | FieldValue::Record(_) => None,
			FieldValue::Text(s) => Some(s.clone()),
			FieldValue::Integer(n) => Some(n.to_string()),
			FieldValue::Decimal(n) => Some(n.to_string()),
			FieldValue::Boolean(b) => Some(b.to_string()),
			FieldValue::Date(d) => Some(if d.time() == chrono::NaiveTime::MIN {
				d.format("%Y-%m-%d").to_string()
			} else {
				d.format("%Y-%m-%d %H:%M:%S").to_string()
			}),
			FieldValue::Enum { variant, .. } => Some(variant.clone()),
		}
	}

	/// Numeric view of the value, if it has one.
	///
	/// Enums yield their underlying ordinal, booleans 1/0, and text is
	/// parsed as floating point.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			FieldValue::Integer(n) => Some(*n as f64),
			FieldValue::Decimal(n) => Some(*n),
			FieldValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
			FieldValue::Enum { ordinal, .. } => Some(*ordinal as f64),
			FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
			_ => None,
		}
	}

	/// Date view of the value, if it is a date.
	pub fn as_date(&self) -> Option<NaiveDateTime> {
		match self {
			FieldValue::Date(d) => Some(*d),
			_ => None,
		}
	}

	/// Total ordering used by the sort builder. `Null` sorts first;
	/// values without a common representation compare equal so sorting
	/// never fails.
	pub fn compare(&self, other: &FieldValue) -> std::cmp::Ordering {
		use std::cmp::Ordering;
		match (self, other) {
			(FieldValue::Null, FieldValue::Null) => Ordering::Equal,
			(FieldValue::Null, _) => Ordering::Less,
			(_, FieldValue::Null) => Ordering::Greater,
			(FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
			(FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
			(FieldValue::Text(a), FieldValue::Text(b)) => {
				a.to_lowercase().cmp(&b.to_lowercase())
			}
			_ => match (self.as_number(), other.as_number()) {
				(Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
				_ => match (self.as_text(), other.as_text()) {
					(Some(a), Some(b)) => a.cmp(&b),
					_ => Ordering::Equal,
				},
			},
		}
	}
}

impl fmt::Debug for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldValue::Null => write!(f, "Null"),
			FieldValue::Text(s) => write!(f, "Text({s:?})"),
			FieldValue::Integer(n) => write!(f, "Integer({n})"),
			FieldValue::Decimal(n) => write!(f, "Decimal({n})"),
			FieldValue::Boolean(b) => write!(f, "Boolean({b})"),
			FieldValue::Date(d) => write!(f, "Date({d})"),
			FieldValue::Enum { variant, ordinal } => {
				write!(f, "Enum({variant} = {ordinal})")
			}
			FieldValue::Record(_) => write!(f, "Record(..)"),
		}
	}
}

impl From<&str> for FieldValue {
	fn from(s: &str) -> Self {
		FieldValue::Text(s.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(s: String) -> Self {
		FieldValue::Text(s)
	}
}

impl From<i64> for FieldValue {
	fn from(n: i64) -> Self {
		FieldValue::Integer(n)
	}
}

impl From<f64> for FieldValue {
	fn from(n: f64) -> Self {
		FieldValue::Decimal(n)
	}
}

impl From<bool> for FieldValue {
	fn from(b: bool) -> Self {
		FieldValue::Boolean(b)
	}
}

impl<T> From<Option<T>> for FieldValue
where
	T: Into<FieldValue>,
{
	fn from(v: Option<T>) -> Self {
		v.map(Into::into).unwrap_or(FieldValue::Null)
	}
}

// The zero/minimum date of the source data (0001-01-01) and anything
// chrono itself treats as minimal.
fn is_zero_date(d: &NaiveDateTime) -> bool {
	*d == NaiveDateTime::MIN || (d.date().year() <= 1 && d.date().ordinal() == 1)
}

/// Walk a dotted navigation path (`"Company.Name"`) segment by segment.
///
/// Any null or non-record intermediate value short-circuits to
/// [`FieldValue::Null`] without error.
///
/// # Examples
///
/// ```
/// use jobim_meta::{resolve_path, FieldValue, Record};
///
/// struct Leaf;
/// impl Record for Leaf {
///     fn get(&self, field: &str) -> FieldValue {
///         match field {
///             "Name" => "Acme".into(),
///             _ => FieldValue::Null,
///         }
///     }
/// }
///
/// struct Root;
/// impl Record for Root {
///     fn get(&self, field: &str) -> FieldValue {
///         match field {
///             "Company" => FieldValue::Record(std::sync::Arc::new(Leaf)),
///             _ => FieldValue::Null,
///         }
///     }
/// }
///
/// let value = resolve_path(&Root, "Company.Name");
/// assert_eq!(value.as_text().as_deref(), Some("Acme"));
/// assert!(!resolve_path(&Root, "Missing.Name").has_value());
/// ```
pub fn resolve_path(record: &dyn Record, path: &str) -> FieldValue {
	let mut segments = path.split('.');
	let first = match segments.next() {
		Some(s) if !s.is_empty() => s,
		_ => return FieldValue::Null,
	};
	let mut current = record.get(first);
	for segment in segments {
		current = match current {
			FieldValue::Record(inner) => inner.get(segment),
			_ => return FieldValue::Null,
		};
	}
	current
}
