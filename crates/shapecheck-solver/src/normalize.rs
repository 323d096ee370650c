//! Normalization of type expressions into head descriptors.

use smallvec::smallvec;
use tracing::debug;

use crate::descriptor::{HeadDescriptor, HeadSet, ScalarKind};
use crate::env::TypeResolver;
use crate::error::{Result, TypeError};
use crate::resolve::{DescriptorBuilder, Reference};
use crate::types::{Builtin, Origin, TypeExpr};

impl<R: TypeResolver + ?Sized> DescriptorBuilder<'_, R> {
    /// Normalize `expr` into its ordered, non-empty set of heads.
    pub(crate) fn normalize(&mut self, expr: &TypeExpr) -> Result<HeadSet> {
        let heads: HeadSet = match expr {
            TypeExpr::Builtin(builtin) => smallvec![HeadDescriptor::Scalar(ScalarKind::from_builtin(*builtin))],
            TypeExpr::Name(source) | TypeExpr::Forward(source) => {
                return match self.classify_reference(source)? {
                    Reference::Defer(head) => Ok(smallvec![head]),
                    Reference::Expand(name) => {
                        let target = self.resolve(expr)?;
                        self.expanding(name, |builder| builder.normalize(&target))
                    }
                };
            }
            TypeExpr::Generic { origin, args } => self.normalize_generic(expr, origin, args)?,
            TypeExpr::Literal(values) => smallvec![HeadDescriptor::Literal(values.as_slice().into())],
            TypeExpr::Record(record) if record.fields.is_empty() => {
                smallvec![HeadDescriptor::Scalar(ScalarKind::Dict)]
            }
            TypeExpr::Record(record) => smallvec![HeadDescriptor::Record(record.clone())],
            TypeExpr::Custom(custom) => smallvec![HeadDescriptor::Custom(custom.clone())],
        };
        debug!(expr = %expr, heads = heads.len(), "normalized");
        Ok(heads)
    }

    fn normalize_generic(&mut self, expr: &TypeExpr, origin: &Origin, args: &[TypeExpr]) -> Result<HeadSet> {
        let container = |raw: Builtin, parametrized: HeadDescriptor| -> HeadSet {
            if args.is_empty() {
                smallvec![HeadDescriptor::Scalar(ScalarKind::from_builtin(raw))]
            } else {
                smallvec![parametrized]
            }
        };
        Ok(match origin {
            Origin::List => container(Builtin::List, HeadDescriptor::Sequence),
            Origin::Set => container(Builtin::Set, HeadDescriptor::SetType),
            Origin::Dict => container(Builtin::Dict, HeadDescriptor::Mapping),
            Origin::Tuple => container(Builtin::Tuple, HeadDescriptor::FixedTuple),
            Origin::Type => smallvec![HeadDescriptor::Scalar(ScalarKind::Type)],
            Origin::Union => {
                if args.is_empty() {
                    return Err(TypeError::unsupported(expr));
                }
                let mut heads = HeadSet::new();
                for arm in args {
                    heads.extend(self.normalize(arm)?);
                }
                heads
            }
            Origin::Optional => {
                let inner = optional_inner(expr, args)?;
                let mut heads = self.normalize(inner)?;
                heads.push(HeadDescriptor::NONE);
                heads
            }
            Origin::Other(_) => return Err(TypeError::unsupported(expr)),
        })
    }
}

/// The single parameter of `Optional[T]`.
pub(crate) fn optional_inner<'a>(expr: &TypeExpr, args: &'a [TypeExpr]) -> Result<&'a TypeExpr> {
    match args {
        [] => Err(TypeError::unsupported(expr)),
        [inner] => Ok(inner),
        _ => Err(TypeError::arity(expr, "takes exactly 1 type parameter", args.len())),
    }
}

/// Normalize `expr` into head descriptors, one per union arm.
///
/// ```
/// use shapecheck_solver::{normalize, HeadDescriptor, NoopResolver, TypeExpr};
///
/// let heads = normalize(&TypeExpr::parse("Optional[int]")?, &NoopResolver)?;
/// assert_eq!(heads.len(), 2);
/// assert_eq!(heads[1], HeadDescriptor::NONE);
/// # Ok::<(), shapecheck_solver::TypeError>(())
/// ```
pub fn normalize<R: TypeResolver + ?Sized>(expr: &TypeExpr, env: &R) -> Result<HeadSet> {
    DescriptorBuilder::new(env).normalize(expr)
}

#[cfg(test)]
#[path = "../tests/normalize_tests.rs"]
mod tests;
