//! Name resolution shared by the normalizer, the extractor and the validator.
//!
//! A [`DescriptorBuilder`] owns the per-call state: the caller's environment,
//! the limits, and the set of names whose targets are currently being
//! expanded. Self-reference through a container (`Tree = Dict[str, 'Tree']`)
//! is productive and becomes a deferred [`HeadDescriptor::Forward`] arm;
//! self-reference without an intervening container (`A = Union[int, A]`) is
//! reported as [`TypeError::CyclicReference`].

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::descriptor::HeadDescriptor;
use crate::env::TypeResolver;
use crate::error::{Result, TypeError};
use crate::options::ValidationOptions;
use crate::parser::parse_type_expr;
use crate::recursion::{RecursionGuard, RecursionResult};
use crate::types::TypeExpr;

pub(crate) struct DescriptorBuilder<'r, R: TypeResolver + ?Sized> {
    pub(crate) env: &'r R,
    pub(crate) options: ValidationOptions,
    /// Names being expanded, keyed to the container depth at which their
    /// expansion began.
    expanding: FxHashMap<String, u32>,
    pub(crate) container_depth: u32,
}

/// What to do with a reference met during expansion.
pub(crate) enum Reference {
    /// Not being expanded: resolve it and carry on.
    Expand(String),
    /// Already being expanded at a shallower container depth.
    Defer(HeadDescriptor),
}

impl<'r, R: TypeResolver + ?Sized> DescriptorBuilder<'r, R> {
    pub(crate) fn new(env: &'r R) -> Self {
        Self::with_options(env, ValidationOptions::default())
    }

    pub(crate) fn with_options(env: &'r R, options: ValidationOptions) -> Self {
        Self {
            env,
            options,
            expanding: FxHashMap::default(),
            container_depth: 0,
        }
    }

    /// Classify a `Name`/`Forward` reference against the names currently
    /// being expanded.
    pub(crate) fn classify_reference(&self, source: &str) -> Result<Reference> {
        match self.expanding.get(source) {
            None => Ok(Reference::Expand(source.to_string())),
            Some(&depth) if self.container_depth > depth => {
                trace!(symbol = source, "deferring self-reference");
                Ok(Reference::Defer(HeadDescriptor::Forward(source.to_string())))
            }
            Some(_) => Err(TypeError::CyclicReference {
                name: source.to_string(),
            }),
        }
    }

    /// Run `f` with `name` marked as being expanded.
    pub(crate) fn expanding<T>(&mut self, name: String, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.expanding.insert(name.clone(), self.container_depth);
        let result = f(self);
        self.expanding.remove(&name);
        result
    }

    /// Run `f` one container level deeper.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.container_depth += 1;
        let result = f(self);
        self.container_depth -= 1;
        result
    }

    /// Follow `Name`/`Forward` layers until a concrete expression is reached.
    pub(crate) fn resolve(&self, expr: &TypeExpr) -> Result<TypeExpr> {
        let mut guard = RecursionGuard::with_profile(self.options.resolution_profile());
        self.resolve_chain(expr, &mut guard)
    }

    fn resolve_chain(&self, expr: &TypeExpr, guard: &mut RecursionGuard<String>) -> Result<TypeExpr> {
        let key = match expr {
            TypeExpr::Name(source) | TypeExpr::Forward(source) => source.clone(),
            concrete => return Ok(concrete.clone()),
        };
        let limit = guard.max_depth();
        guard
            .scope(key.clone(), |guard| {
                let next = self.evaluate(expr)?;
                self.resolve_chain(&next, guard)
            })
            .unwrap_or_else(|denied| {
                Err(match denied {
                    RecursionResult::Cycle => TypeError::CyclicReference { name: key },
                    _ => TypeError::DepthExceeded { limit },
                })
            })
    }

    /// Evaluate one `Name`/`Forward` layer.
    fn evaluate(&self, expr: &TypeExpr) -> Result<TypeExpr> {
        match expr {
            TypeExpr::Name(source) => self.evaluate_source(source),
            TypeExpr::Forward(reference) => {
                if !self.env.has_symbols() {
                    return Err(TypeError::MissingEnvironment {
                        reference: reference.clone(),
                    });
                }
                self.evaluate_source(reference).map_err(|err| match err {
                    TypeError::UnresolvedSymbol { name } => TypeError::UnresolvedForwardRef {
                        reference: reference.clone(),
                        name,
                    },
                    other => other,
                })
            }
            concrete => Ok(concrete.clone()),
        }
    }

    /// Parse symbolic source and look a bare identifier up in the environment.
    fn evaluate_source(&self, source: &str) -> Result<TypeExpr> {
        match parse_type_expr(source)? {
            TypeExpr::Name(identifier) => {
                let resolved = self.env.resolve_symbol(&identifier);
                trace!(symbol = %identifier, found = resolved.is_some(), "symbol lookup");
                resolved.ok_or(TypeError::UnresolvedSymbol { name: identifier })
            }
            parsed => Ok(parsed),
        }
    }
}
