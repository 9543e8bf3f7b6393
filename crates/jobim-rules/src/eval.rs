//! Rule evaluation
//!
//! Evaluation reads the live record through [`Record::get`] and the
//! entity descriptor for enum member resolution. Every failure mode
//! (unknown field, unparsable number, missing date) makes the affected
//! fragment `false`; nothing propagates to the caller.

use crate::ast::{CompareOp, Rule};
use chrono::{Datelike, Local, NaiveDate};
use dashmap::DashMap;
use jobim_meta::{EntityDescriptor, FieldDescriptor, FieldValue, Record};
use std::sync::Arc;

/// Evaluate a rule string without caching the parsed form.
///
/// Prefer [`RuleEvaluator`] when the same rules run repeatedly.
///
/// # Examples
///
/// ```
/// use jobim_meta::{build_descriptor, EntityMeta, FieldMeta, FieldValue, Record};
/// use jobim_rules::evaluate;
///
/// struct Person;
/// impl Record for Person {
///     fn get(&self, field: &str) -> FieldValue {
///         match field {
///             "TaxId" => "12345678901234".into(),
///             _ => FieldValue::Null,
///         }
///     }
/// }
///
/// let desc = build_descriptor(
///     EntityMeta::new("Person").field(FieldMeta::text("TaxId")),
/// );
/// assert!(evaluate("HasValue(TaxId)", &Person, &desc));
/// assert!(evaluate("", &Person, &desc));
/// assert!(!evaluate("IsEmpty(TaxId)", &Person, &desc));
/// ```
pub fn evaluate(rule: &str, record: &dyn Record, descriptor: &EntityDescriptor) -> bool {
	eval_rule(&Rule::parse(rule), record, descriptor)
}

/// Evaluates conditional rules with a per-string AST cache.
///
/// Rules come from static field configuration, so the set of distinct
/// strings is small; each is parsed once per process.
#[derive(Default)]
pub struct RuleEvaluator {
	cache: DashMap<String, Arc<Rule>>,
}

impl RuleEvaluator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Evaluate a rule against a live record.
	pub fn evaluate(
		&self,
		rule: &str,
		record: &dyn Record,
		descriptor: &EntityDescriptor,
	) -> bool {
		let parsed = match self.cache.get(rule) {
			Some(cached) => cached.value().clone(),
			None => self
				.cache
				.entry(rule.to_string())
				.or_insert_with(|| Arc::new(Rule::parse(rule)))
				.value()
				.clone(),
		};
		eval_rule(&parsed, record, descriptor)
	}

	/// Whether a field should be shown for this record.
	///
	/// A field without a `show_when` rule is always shown.
	pub fn is_visible(
		&self,
		field: &FieldDescriptor,
		record: &dyn Record,
		descriptor: &EntityDescriptor,
	) -> bool {
		match field.show_when.as_deref().map(str::trim) {
			None | Some("") => true,
			Some(rule) => self.evaluate(rule, record, descriptor),
		}
	}

	/// Whether a field is conditionally required for this record.
	///
	/// A field without a `required_when` rule is never conditionally
	/// required.
	pub fn is_required(
		&self,
		field: &FieldDescriptor,
		record: &dyn Record,
		descriptor: &EntityDescriptor,
	) -> bool {
		match field.required_when.as_deref().map(str::trim) {
			None | Some("") => false,
			Some(rule) => self.evaluate(rule, record, descriptor),
		}
	}
}

fn eval_rule(rule: &Rule, record: &dyn Record, descriptor: &EntityDescriptor) -> bool {
	match rule {
		Rule::Always => true,
		Rule::Invalid => false,
		Rule::Or(parts) => parts.iter().any(|p| eval_rule(p, record, descriptor)),
		Rule::And(parts) => parts.iter().all(|p| eval_rule(p, record, descriptor)),
		Rule::Comparison { field, op, value } => {
			eval_comparison(field, *op, value, record, descriptor)
		}
		Rule::HasValue { field } => record.get(field).has_value(),
		Rule::IsEmpty { field } => !record.get(field).has_value(),
		Rule::Age { field, op, value } => match record.get(field).as_date() {
			Some(birth) => compare_numbers(*op, age_years(birth.date(), today()) as f64, *value),
			None => false,
		},
		Rule::DateDiff { first, second, unit, op, value } => {
			match (record.get(first).as_date(), record.get(second).as_date()) {
				(Some(a), Some(b)) => {
					let days = (a.date() - b.date()).num_days() as f64;
					compare_numbers(*op, days / unit.divisor(), *value)
				}
				_ => false,
			}
		}
		Rule::Length { field, op, value } => {
			let length = record
				.get(field)
				.as_text()
				.map(|t| t.chars().count())
				.unwrap_or(0);
			compare_numbers(*op, length as f64, *value)
		}
	}
}

// The right-hand side of a comparison on an enum field may name one of
// the enum's members; it resolves to the member's ordinal before the
// comparison.
fn eval_comparison(
	field: &str,
	op: CompareOp,
	value: &str,
	record: &dyn Record,
	descriptor: &EntityDescriptor,
) -> bool {
	let lhs = record.get(field);
	// A field the record cannot produce never satisfies a comparison,
	// `!=` included.
	if matches!(lhs, FieldValue::Null) {
		return false;
	}
	let rhs_num = descriptor
		.field(field)
		.filter(|f| f.is_enum)
		.and_then(|f| f.variant_ordinal(value))
		.map(|o| o as f64)
		.or_else(|| value.trim().parse::<f64>().ok());

	match op {
		CompareOp::Eq | CompareOp::Ne => {
			let equal = match (lhs.as_number(), rhs_num) {
				(Some(l), Some(r)) => l == r,
				_ => {
					lhs.as_text().unwrap_or_default().trim()
						== value.trim()
				}
			};
			if op == CompareOp::Eq {
				equal
			} else {
				!equal
			}
		}
		_ => match (lhs.as_number(), rhs_num) {
			(Some(l), Some(r)) => compare_numbers(op, l, r),
			_ => false,
		},
	}
}

fn compare_numbers(op: CompareOp, left: f64, right: f64) -> bool {
	match op {
		CompareOp::Eq => left == right,
		CompareOp::Ne => left != right,
		CompareOp::Gt => left > right,
		CompareOp::Lt => left < right,
		CompareOp::Ge => left >= right,
		CompareOp::Le => left <= right,
	}
}

// Calendar-aware age: one year less if the birthday has not occurred
// yet this year.
fn age_years(birth: NaiveDate, today: NaiveDate) -> i32 {
	let mut age = today.year() - birth.year();
	if (today.month(), today.day()) < (birth.month(), birth.day()) {
		age -= 1;
	}
	age
}

fn today() -> NaiveDate {
	Local::now().date_naive()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_age_years_is_calendar_aware() {
		let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
		let before = NaiveDate::from_ymd_opt(2018, 6, 14).unwrap();
		let on = NaiveDate::from_ymd_opt(2018, 6, 15).unwrap();
		let after = NaiveDate::from_ymd_opt(2018, 6, 16).unwrap();
		assert_eq!(age_years(birth, before), 17);
		assert_eq!(age_years(birth, on), 18);
		assert_eq!(age_years(birth, after), 18);
	}

	#[test]
	fn test_compare_numbers_handles_all_operators() {
		assert!(compare_numbers(CompareOp::Ge, 2.0, 2.0));
		assert!(compare_numbers(CompareOp::Ne, 2.0, 3.0));
		assert!(!compare_numbers(CompareOp::Lt, 3.0, 2.0));
	}
}
