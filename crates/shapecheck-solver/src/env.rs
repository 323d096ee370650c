//! Symbol environments used to resolve names and forward references.
//!
//! The environment is always supplied by the caller and threaded through
//! every recursive call; there is no process-wide scope. It is read-only
//! during resolution.

use indexmap::IndexMap;

use crate::types::TypeExpr;

/// Looks up the type expression bound to a symbolic name.
pub trait TypeResolver {
    /// The expression bound to `name`, if any.
    fn resolve_symbol(&self, name: &str) -> Option<TypeExpr>;

    /// `false` for an empty environment. Forward references are rejected
    /// outright when no symbols are available.
    fn has_symbols(&self) -> bool;
}

/// An environment with no symbols.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopResolver;

impl TypeResolver for NoopResolver {
    fn resolve_symbol(&self, _name: &str) -> Option<TypeExpr> {
        None
    }

    fn has_symbols(&self) -> bool {
        false
    }
}

/// An ordered name → type-expression table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SymbolEnv {
    symbols: IndexMap<String, TypeExpr>,
}

impl SymbolEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any previous binding.
    pub fn define(&mut self, name: impl Into<String>, expr: impl Into<TypeExpr>) -> &mut Self {
        self.symbols.insert(name.into(), expr.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, expr: impl Into<TypeExpr>) -> Self {
        self.define(name, expr);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TypeExpr> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeExpr)> {
        self.symbols.iter().map(|(name, expr)| (name.as_str(), expr))
    }
}

impl TypeResolver for SymbolEnv {
    fn resolve_symbol(&self, name: &str) -> Option<TypeExpr> {
        self.symbols.get(name).cloned()
    }

    fn has_symbols(&self) -> bool {
        !self.symbols.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, TypeExpr)> for SymbolEnv {
    fn from_iter<I: IntoIterator<Item = (N, TypeExpr)>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().map(|(n, e)| (n.into(), e)).collect(),
        }
    }
}

impl<T: TypeResolver + ?Sized> TypeResolver for &T {
    fn resolve_symbol(&self, name: &str) -> Option<TypeExpr> {
        (**self).resolve_symbol(name)
    }

    fn has_symbols(&self) -> bool {
        (**self).has_symbols()
    }
}
