//! Conditional rule mini-language
//!
//! Small boolean expressions over record fields decide whether a form
//! field is shown or required, e.g.
//! `PersonType == Company AND HasValue(TaxId)`. Rules parse into a
//! tagged AST cached per rule string; evaluation reads the live record
//! through [`jobim_meta::Record`] and never fails — any malformed rule
//! or bad field access evaluates to `false`.
//!
//! There is deliberately no operator precedence: a rule containing
//! ` OR ` anywhere is split on every occurrence of it at the top level
//! before ` AND ` is considered. Downstream rules depend on this, so it
//! is preserved as-is.

pub mod ast;
pub mod eval;

pub use ast::{CompareOp, DiffUnit, Rule};
pub use eval::{evaluate, RuleEvaluator};
