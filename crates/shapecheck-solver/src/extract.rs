//! Subtype extraction and full descriptor building.
//!
//! Extraction derives, for an expression and its heads, the nested slots
//! that validate the contents of a container or record:
//!
//! | shape                 | slots                                   |
//! |-----------------------|-----------------------------------------|
//! | `List[T]` / `Set[T]`  | `[T]` (`[Any]` unparametrized)          |
//! | `Dict[K, V]`          | `[K, V]` (`[Any, Any]` unparametrized)  |
//! | `Tuple[A, B, ...]`    | one per position (`[Any]` untyped)      |
//! | record                | `[Literal[field names], Fields]`        |
//! | anything else         | `[Unstructured]`                        |

use std::sync::Arc;

use tracing::trace;

use crate::descriptor::{Arm, Descriptor, FieldSlot, HeadDescriptor, SubtypeSlot};
use crate::env::TypeResolver;
use crate::error::{Result, TypeError};
use crate::normalize::optional_inner;
use crate::resolve::{DescriptorBuilder, Reference};
use crate::types::{Builtin, LiteralValue, Origin, RecordDef, TypeExpr};

impl<R: TypeResolver + ?Sized> DescriptorBuilder<'_, R> {
    /// Extract the subtype slots of `expr` given its normalized `heads`.
    pub(crate) fn extract(&mut self, expr: &TypeExpr, heads: &[HeadDescriptor]) -> Result<Vec<SubtypeSlot>> {
        if heads.is_empty() || heads == [HeadDescriptor::NONE] {
            return Ok(vec![SubtypeSlot::Unstructured]);
        }
        let slots = match expr {
            TypeExpr::Name(source) | TypeExpr::Forward(source) => {
                return match self.classify_reference(source)? {
                    Reference::Defer(_) => Ok(vec![SubtypeSlot::Unstructured]),
                    Reference::Expand(name) => {
                        let target = self.resolve(expr)?;
                        self.expanding(name, |builder| builder.extract(&target, heads))
                    }
                };
            }
            TypeExpr::Builtin(Builtin::List | Builtin::Set | Builtin::Tuple) => vec![SubtypeSlot::any()],
            TypeExpr::Builtin(Builtin::Dict) => vec![SubtypeSlot::any(), SubtypeSlot::any()],
            TypeExpr::Record(record) if record.fields.is_empty() => {
                vec![SubtypeSlot::any(), SubtypeSlot::any()]
            }
            TypeExpr::Record(record) => vec![
                SubtypeSlot::Nested(field_names(record)),
                SubtypeSlot::Fields(self.record_fields(record)?),
            ],
            TypeExpr::Generic { origin, args } => self.extract_generic(expr, origin, args)?,
            TypeExpr::Literal(values) if values.is_empty() => {
                return Err(TypeError::arity(expr, "needs at least 1 value", 0));
            }
            _ => vec![SubtypeSlot::Unstructured],
        };
        trace!(expr = %expr, slots = slots.len(), "extracted");
        Ok(slots)
    }

    fn extract_generic(&mut self, expr: &TypeExpr, origin: &Origin, args: &[TypeExpr]) -> Result<Vec<SubtypeSlot>> {
        match origin {
            Origin::List | Origin::Set => match args {
                [] => Ok(vec![SubtypeSlot::any()]),
                [element] => Ok(vec![SubtypeSlot::Nested(self.build_nested(element)?)]),
                _ => Err(TypeError::arity(expr, "can only have 1 type parameter", args.len())),
            },
            Origin::Dict => match args {
                [] => Ok(vec![SubtypeSlot::any(), SubtypeSlot::any()]),
                [key, value] => Ok(vec![
                    SubtypeSlot::Nested(self.build_nested(key)?),
                    SubtypeSlot::Nested(self.build_nested(value)?),
                ]),
                _ => Err(TypeError::arity(expr, "needs 2 type parameters", args.len())),
            },
            Origin::Tuple if args.is_empty() => Ok(vec![SubtypeSlot::any()]),
            Origin::Tuple => args
                .iter()
                .map(|position| self.build_nested(position).map(SubtypeSlot::Nested))
                .collect(),
            Origin::Type | Origin::Union | Origin::Optional | Origin::Other(_) => {
                Ok(vec![SubtypeSlot::Unstructured])
            }
        }
    }

    /// Build per-field descriptors for a record.
    pub(crate) fn record_fields(&mut self, record: &RecordDef) -> Result<Arc<[FieldSlot]>> {
        self.nested(|builder| {
            record
                .fields
                .iter()
                .map(|(name, ty)| {
                    Ok(FieldSlot {
                        name: name.clone(),
                        descriptor: builder.build(ty)?,
                    })
                })
                .collect()
        })
    }

    /// Normalize `expr` and extract subtypes separately for each union arm.
    pub(crate) fn build(&mut self, expr: &TypeExpr) -> Result<Descriptor> {
        match expr {
            TypeExpr::Name(source) | TypeExpr::Forward(source) => match self.classify_reference(source)? {
                Reference::Defer(head) => Ok(Descriptor::single(Arm::bare(head))),
                Reference::Expand(name) => {
                    let target = self.resolve(expr)?;
                    self.expanding(name, |builder| builder.build(&target))
                }
            },
            TypeExpr::Generic {
                origin: Origin::Union,
                args,
            } if !args.is_empty() => {
                let mut descriptor = Descriptor { arms: Default::default() };
                for arm in args {
                    descriptor.arms.extend(self.build(arm)?.arms);
                }
                Ok(descriptor)
            }
            TypeExpr::Generic {
                origin: Origin::Optional,
                args,
            } => {
                let mut descriptor = self.build(optional_inner(expr, args)?)?;
                descriptor.arms.push(Arm::bare(HeadDescriptor::NONE));
                Ok(descriptor)
            }
            _ => {
                let heads = self.normalize(expr)?;
                let subtypes = self.extract(expr, &heads)?;
                Ok(Descriptor {
                    arms: heads
                        .into_iter()
                        .map(|head| Arm::new(head, subtypes.clone()))
                        .collect(),
                })
            }
        }
    }

    fn build_nested(&mut self, expr: &TypeExpr) -> Result<Descriptor> {
        self.nested(|builder| builder.build(expr))
    }
}

/// The field-name constraint of a record, as a string literal.
fn field_names(record: &RecordDef) -> Descriptor {
    let names: Arc<[LiteralValue]> = record
        .fields
        .keys()
        .map(|name| LiteralValue::Str(name.clone()))
        .collect();
    Descriptor::single(Arm::bare(HeadDescriptor::Literal(names)))
}

/// Extract the subtype slots needed to validate the contents of `expr`.
///
/// `heads` are the heads [`normalize`](crate::normalize) produced for the
/// same expression. A top-level union degrades to `[Unstructured]`; use
/// [`Descriptor::build`] to keep per-arm slots.
pub fn extract<R: TypeResolver + ?Sized>(
    expr: &TypeExpr,
    heads: &[HeadDescriptor],
    env: &R,
) -> Result<Vec<SubtypeSlot>> {
    DescriptorBuilder::new(env).extract(expr, heads)
}

#[cfg(test)]
#[path = "../tests/extract_tests.rs"]
mod tests;
