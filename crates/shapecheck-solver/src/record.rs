//! Structural record checking.
//!
//! A value matches a record when it is a dict whose keys are all declared
//! string field names, every declared field is present if the record is
//! total, and every present field conforms to its declared type. Checks run
//! in that order and stop at the first failure.

use crate::env::TypeResolver;
use crate::error::Result;
use crate::types::RecordDef;
use crate::validate::Validator;
use crate::value::Value;

/// Check `value` against `record`, building field descriptors on demand.
///
/// ```
/// use shapecheck_solver::{is_structural_match, NoopResolver, RecordDef, TypeExpr, Value};
///
/// let point = RecordDef::new("Point").field("x", TypeExpr::INT).field("y", TypeExpr::INT);
/// let value = Value::dict([("x", 1), ("y", 2)]);
/// assert!(is_structural_match(&value, &point, &NoopResolver)?);
/// # Ok::<(), shapecheck_solver::TypeError>(())
/// ```
pub fn is_structural_match<R: TypeResolver + ?Sized>(value: &Value, record: &RecordDef, env: &R) -> Result<bool> {
    Validator::new(env).match_record(value, record, None)
}

#[cfg(test)]
#[path = "../tests/record_tests.rs"]
mod tests;
