//! Rule parsing
//!
//! Grammar, in check order: empty → always true; ` OR ` (case-
//! insensitive) splits the whole text; then ` AND `; then a simple
//! `<field> <op> <value>` comparison; then a built-in function call
//! recognized by a `(`. Anything else is invalid and evaluates to
//! `false`.

use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static OR_SPLIT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new("(?i) OR ").expect("OR_SPLIT: invalid regex pattern"));

static AND_SPLIT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new("(?i) AND ").expect("AND_SPLIT: invalid regex pattern"));

static COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(\w+)\s*(==|!=|>=|<=|>|<)\s*(.+)$")
		.expect("COMPARISON: invalid regex pattern")
});

static CALL: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(\w+)\s*\(\s*([^)]*)\s*\)\s*(?:(==|!=|>=|<=|>|<)\s*(.+))?$")
		.expect("CALL: invalid regex pattern")
});

/// A comparison operator in a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
	Eq,
	Ne,
	Gt,
	Lt,
	Ge,
	Le,
}

impl CompareOp {
	fn parse(text: &str) -> Option<Self> {
		match text {
			"==" => Some(Self::Eq),
			"!=" => Some(Self::Ne),
			">" => Some(Self::Gt),
			"<" => Some(Self::Lt),
			">=" => Some(Self::Ge),
			"<=" => Some(Self::Le),
			_ => None,
		}
	}
}

/// Unit of a `DateDiff` comparison. Months and years are approximate
/// (30 and 365 days).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffUnit {
	Days,
	Months,
	Years,
}

impl DiffUnit {
	fn parse(text: &str) -> Option<Self> {
		match text.to_ascii_lowercase().as_str() {
			"d" | "day" | "days" => Some(Self::Days),
			"m" | "month" | "months" => Some(Self::Months),
			"y" | "year" | "years" => Some(Self::Years),
			_ => None,
		}
	}

	pub fn divisor(self) -> f64 {
		match self {
			Self::Days => 1.0,
			Self::Months => 30.0,
			Self::Years => 365.0,
		}
	}
}

/// Parsed form of one conditional rule.
///
/// Parsed once per distinct rule string and cached by
/// [`crate::RuleEvaluator`]; evaluation walks this tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
	/// Empty rule, always true
	Always,
	Or(Vec<Rule>),
	And(Vec<Rule>),
	/// `<field> <op> <value>`
	Comparison { field: String, op: CompareOp, value: String },
	/// `HasValue(field)`
	HasValue { field: String },
	/// `IsEmpty(field)`
	IsEmpty { field: String },
	/// `Age(field) <op> N`
	Age { field: String, op: CompareOp, value: f64 },
	/// `DateDiff(first, second, unit) <op> N`
	DateDiff { first: String, second: String, unit: DiffUnit, op: CompareOp, value: f64 },
	/// `Length(field) <op> N`
	Length { field: String, op: CompareOp, value: f64 },
	/// Unrecognized or malformed text, always false
	Invalid,
}

impl Rule {
	/// Parse a rule string.
	///
	/// Never fails: malformed text parses to [`Rule::Invalid`], which
	/// evaluates to `false`, and the offending text is logged.
	///
	/// # Examples
	///
	/// ```
	/// use jobim_rules::{CompareOp, Rule};
	///
	/// assert_eq!(Rule::parse("  "), Rule::Always);
	/// assert_eq!(
	///     Rule::parse("Status == Final"),
	///     Rule::Comparison {
	///         field: "Status".into(),
	///         op: CompareOp::Eq,
	///         value: "Final".into(),
	///     },
	/// );
	/// assert!(matches!(Rule::parse("A == 1 OR B == 2"), Rule::Or(_)));
	/// assert_eq!(Rule::parse("Frobnicate(X)"), Rule::Invalid);
	/// ```
	pub fn parse(text: &str) -> Rule {
		let trimmed = text.trim();
		if trimmed.is_empty() {
			return Rule::Always;
		}
		// OR is checked before AND over the whole string, so OR always
		// binds looser; a rule mixing both is split on OR at the top
		// level regardless of intended grouping.
		if OR_SPLIT.is_match(trimmed) {
			return Rule::Or(OR_SPLIT.split(trimmed).map(Rule::parse).collect());
		}
		if AND_SPLIT.is_match(trimmed) {
			return Rule::And(AND_SPLIT.split(trimmed).map(Rule::parse).collect());
		}
		if let Some(c) = COMPARISON.captures(trimmed) {
			let op = match CompareOp::parse(&c[2]) {
				Some(op) => op,
				None => return invalid(trimmed, "unrecognized operator"),
			};
			return Rule::Comparison {
				field: c[1].to_string(),
				op,
				value: c[3].trim().to_string(),
			};
		}
		if trimmed.contains('(') {
			return Self::parse_call(trimmed);
		}
		invalid(trimmed, "not a comparison or function call")
	}

	fn parse_call(text: &str) -> Rule {
		let Some(c) = CALL.captures(text) else {
			return invalid(text, "malformed function call");
		};
		let name = c[1].to_string();
		let args: Vec<String> = c[2]
			.split(',')
			.map(|a| a.trim().to_string())
			.filter(|a| !a.is_empty())
			.collect();
		let op = c.get(3).and_then(|m| CompareOp::parse(m.as_str()));
		let value = c.get(4).and_then(|m| m.as_str().trim().parse::<f64>().ok());

		match name.to_ascii_lowercase().as_str() {
			"hasvalue" if args.len() == 1 && op.is_none() => {
				Rule::HasValue { field: args[0].clone() }
			}
			"isempty" if args.len() == 1 && op.is_none() => {
				Rule::IsEmpty { field: args[0].clone() }
			}
			"age" if args.len() == 1 => match (op, value) {
				(Some(op), Some(value)) => Rule::Age { field: args[0].clone(), op, value },
				_ => invalid(text, "Age needs a numeric comparison"),
			},
			"length" if args.len() == 1 => match (op, value) {
				(Some(op), Some(value)) => {
					Rule::Length { field: args[0].clone(), op, value }
				}
				_ => invalid(text, "Length needs a numeric comparison"),
			},
			"datediff" if args.len() == 3 => {
				match (DiffUnit::parse(&args[2]), op, value) {
					(Some(unit), Some(op), Some(value)) => Rule::DateDiff {
						first: args[0].clone(),
						second: args[1].clone(),
						unit,
						op,
						value,
					},
					_ => invalid(text, "DateDiff needs a unit and a numeric comparison"),
				}
			}
			_ => invalid(text, "unrecognized function"),
		}
	}
}

fn invalid(text: &str, reason: &str) -> Rule {
	warn!(rule = %text, reason, "malformed conditional rule");
	Rule::Invalid
}
