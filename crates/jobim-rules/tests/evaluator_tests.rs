//! End-to-end conditional rule evaluation against a live record.

use chrono::{Datelike, Local, NaiveDate};
use jobim_meta::{build_descriptor, EntityDescriptor, EntityMeta, FieldMeta, FieldValue, Record};
use jobim_rules::{evaluate, Rule, RuleEvaluator};
use rstest::rstest;

struct Person {
	person_type: i64,
	tax_id: Option<String>,
	birth_date: Option<NaiveDate>,
	hired_at: Option<NaiveDate>,
}

impl Default for Person {
	fn default() -> Self {
		Self {
			person_type: 2, // Company
			tax_id: Some("12345678901234".to_string()),
			birth_date: None,
			hired_at: None,
		}
	}
}

impl Record for Person {
	fn get(&self, field: &str) -> FieldValue {
		match field {
			"PersonType" => FieldValue::Enum {
				variant: if self.person_type == 2 { "Company" } else { "Individual" }
					.to_string(),
				ordinal: self.person_type,
			},
			"TaxId" => self.tax_id.clone().into(),
			"BirthDate" => self
				.birth_date
				.map(FieldValue::from_date)
				.unwrap_or(FieldValue::Null),
			"HiredAt" => self
				.hired_at
				.map(FieldValue::from_date)
				.unwrap_or(FieldValue::Null),
			_ => FieldValue::Null,
		}
	}
}

fn descriptor() -> EntityDescriptor {
	build_descriptor(
		EntityMeta::new("Person")
			.field(FieldMeta::enumeration(
				"PersonType",
				[("Individual", 1), ("Company", 2)],
			))
			.field(
				FieldMeta::text("TaxId")
					.show_when("PersonType == Company")
					.required_when("PersonType == Company"),
			)
			.field(FieldMeta::date("BirthDate"))
			.field(FieldMeta::date("HiredAt")),
	)
}

#[rstest]
#[case("PersonType == Company", true)]
#[case("PersonType == Individual", false)]
#[case("PersonType != Individual", true)]
#[case("PersonType == 2", true)]
#[case("HasValue(TaxId)", true)]
#[case("IsEmpty(TaxId)", false)]
#[case("PersonType == Individual OR HasValue(TaxId)", true)]
#[case("PersonType == Individual AND HasValue(TaxId)", false)]
#[case("PersonType == Company AND HasValue(TaxId)", true)]
#[case("Length(TaxId) >= 14", true)]
#[case("Length(TaxId) > 14", false)]
#[case("", true)]
#[case("   ", true)]
fn truth_table(#[case] rule: &str, #[case] expected: bool) {
	let desc = descriptor();
	assert_eq!(evaluate(rule, &Person::default(), &desc), expected, "rule {rule:?}");
}

#[test]
fn or_always_splits_the_whole_rule_first() {
	// "A AND B OR C" is ["A AND B", "C"] at the top level; with A true,
	// B false, C false the whole rule is false even though "B OR C"
	// grouping would also be false here, while "A OR B AND C" is true
	// because the leading fragment alone decides it.
	let desc = descriptor();
	let person = Person::default();
	assert!(!evaluate(
		"PersonType == Company AND IsEmpty(TaxId) OR PersonType == Individual",
		&person,
		&desc,
	));
	assert!(evaluate(
		"PersonType == Company OR IsEmpty(TaxId) AND PersonType == Individual",
		&person,
		&desc,
	));
	assert!(matches!(
		Rule::parse("A == 1 AND B == 2 OR C == 3"),
		Rule::Or(_),
	));
}

#[test]
fn age_boundary_is_calendar_aware() {
	let desc = descriptor();
	let today = Local::now().date_naive();

	// Feb 29 has no counterpart 18 years back; fall back to Feb 28.
	let exactly_18 = today.with_year(today.year() - 18).unwrap_or_else(|| {
		NaiveDate::from_ymd_opt(today.year() - 18, today.month(), today.day() - 1)
			.expect("valid fallback date")
	});
	let person = Person { birth_date: Some(exactly_18), ..Person::default() };
	assert!(evaluate("Age(BirthDate) >= 18", &person, &desc));

	let one_day_short = exactly_18.succ_opt().unwrap_or(exactly_18);
	let person = Person { birth_date: Some(one_day_short), ..Person::default() };
	assert!(!evaluate("Age(BirthDate) >= 18", &person, &desc));
}

#[test]
fn date_diff_units() {
	let desc = descriptor();
	let person = Person {
		hired_at: NaiveDate::from_ymd_opt(2024, 1, 1),
		birth_date: NaiveDate::from_ymd_opt(1990, 1, 1),
		..Person::default()
	};
	assert!(evaluate("DateDiff(HiredAt, BirthDate, years) >= 34", &person, &desc));
	assert!(evaluate("DateDiff(HiredAt, BirthDate, days) > 12000", &person, &desc));
	assert!(!evaluate("DateDiff(HiredAt, BirthDate, months) < 400", &person, &desc));
	// Missing date on either side is false, not an error.
	let missing = Person::default();
	assert!(!evaluate("DateDiff(HiredAt, BirthDate, days) >= 0", &missing, &desc));
}

#[test]
fn failures_never_propagate() {
	let desc = descriptor();
	let person = Person::default();
	assert!(!evaluate("UnknownField == 1", &person, &desc));
	assert!(!evaluate("UnknownField != 1", &person, &desc));
	assert!(!evaluate("UnknownField > 1", &person, &desc));
	// A null field value fails a comparison the same way a bad name does.
	let no_tax_id = Person { tax_id: None, ..Person::default() };
	assert!(!evaluate("TaxId == 1", &no_tax_id, &desc));
	assert!(!evaluate("TaxId != 1", &no_tax_id, &desc));
	assert!(!evaluate("Frobnicate(TaxId)", &person, &desc));
	assert!(!evaluate("Age(TaxId) >= 18", &person, &desc));
	assert!(!evaluate("PersonType > banana", &person, &desc));
}

#[test]
fn evaluator_caches_parsed_rules() {
	let desc = descriptor();
	let evaluator = RuleEvaluator::new();
	let person = Person::default();
	for _ in 0..3 {
		assert!(evaluator.evaluate("HasValue(TaxId)", &person, &desc));
	}
}

#[test]
fn visibility_and_requiredness_helpers() {
	let desc = descriptor();
	let evaluator = RuleEvaluator::new();
	let tax_id = desc.field("TaxId").unwrap();
	let birth_date = desc.field("BirthDate").unwrap();

	let company = Person::default();
	assert!(evaluator.is_visible(tax_id, &company, &desc));
	assert!(evaluator.is_required(tax_id, &company, &desc));

	let individual = Person { person_type: 1, ..Person::default() };
	assert!(!evaluator.is_visible(tax_id, &individual, &desc));
	assert!(!evaluator.is_required(tax_id, &individual, &desc));

	// No rules declared: always visible, never conditionally required.
	assert!(evaluator.is_visible(birth_date, &company, &desc));
	assert!(!evaluator.is_required(birth_date, &company, &desc));
}
