//! Structural Type Validator
//!
//! Decides whether a runtime [`Value`] conforms to a declarative
//! [`TypeExpr`]. The pipeline has three stages:
//!
//! - **Normalize**: turn an expression into an ordered set of
//!   [`HeadDescriptor`]s, one per union arm, resolving symbolic names against
//!   a caller-supplied [`TypeResolver`]
//! - **Extract**: derive the [`SubtypeSlot`]s that validate a head's contents
//!   (element, key/value, positional and per-field types)
//! - **Validate**: match the value against the heads (OR) and recurse into
//!   its contents (AND)
//!
//! Key properties:
//! - Stateless: descriptors are derived fresh on every call, nothing is cached
//! - Self-referential types expand lazily below containers, so recursive
//!   shapes such as trees validate without unbounded expansion
//! - Non-conformance is `Ok(false)`; only malformed expressions are errors
mod descriptor;
mod env;
mod error;
mod extract;
mod format;
mod normalize;
mod options;
mod parser;
mod record;
pub mod recursion;
mod resolve;
mod scanner;
pub mod tracer;
mod types;
mod validate;
mod value;

pub use descriptor::{Arm, Descriptor, FieldSlot, HeadDescriptor, HeadSet, ScalarKind, SubtypeSlot};
pub use env::{NoopResolver, SymbolEnv, TypeResolver};
pub use error::{ErrorKind, Result, TypeError};
pub use extract::extract;
pub use normalize::normalize;
pub use options::ValidationOptions;
pub use parser::parse_type_expr;
pub use record::is_structural_match;
pub use scanner::is_identifier;
pub use tracer::{DiagnosticTracer, FastTracer, Mismatch, MismatchReason, MismatchTracer, PathSegment};
pub use types::{Builtin, CustomType, LiteralValue, Origin, RecordDef, TypeExpr};
pub use validate::{Validator, conforms, explain, validate};
pub use value::{ArrayKind, Instance, Value, ValueKind};

// Test modules: the per-stage suites are loaded by their source files.
// normalize_tests: loaded from normalize.rs
// extract_tests: loaded from extract.rs
// validate_tests: loaded from validate.rs
// record_tests: loaded from record.rs
#[cfg(test)]
#[path = "../tests/parser_tests.rs"]
mod parser_tests;
#[cfg(test)]
#[path = "../tests/recursive_type_tests.rs"]
mod recursive_type_tests;
#[cfg(test)]
#[path = "../tests/integration_tests.rs"]
mod integration_tests;
