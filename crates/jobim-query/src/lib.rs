//! Dynamic predicate and sort construction
//!
//! Request-scoped filter maps and sort specs become plain closures over
//! record instances, validated against the cached entity metadata. The
//! builders degrade silently: unknown fields are skipped and values
//! that do not convert drop their filter term, so building never fails
//! a request.

pub mod convert;
pub mod filter;
pub mod order;

pub use convert::{parse_value, ConvertError};
pub use filter::{DynPredicate, FilterBuilder, Predicate, SEARCH_KEY};
pub use order::{DynOrderKey, OrderKey, SortBuilder};
