//! Error taxonomy for normalization, extraction and validation.
//!
//! Semantic non-conformance is never an error: `validate` answers `false`.
//! The variants here describe type expressions that cannot be turned into
//! descriptors at all, and they always propagate to the immediate caller.

use thiserror::Error;

/// Result type used throughout the solver.
pub type Result<T> = std::result::Result<T, TypeError>;

/// Errors raised while deriving or applying descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A symbolic name is not bound in the symbol environment.
    #[error("name `{name}` is not defined in the symbol environment")]
    UnresolvedSymbol { name: String },

    /// A forward reference names a symbol the environment does not bind.
    #[error("forward reference `{reference}` could not be resolved: `{name}` is not defined")]
    UnresolvedForwardRef { reference: String, name: String },

    /// Forward references can only be resolved against an explicit environment.
    #[error("forward reference `{reference}` requires a non-empty symbol environment")]
    MissingEnvironment { reference: String },

    /// The expression shape is not part of the type language.
    #[error("unsupported type expression `{expr}`")]
    UnsupportedType { expr: String },

    /// A parametrized container was given the wrong number of parameters.
    #[error("`{expr}` {expected}, found {found}")]
    Arity {
        expr: String,
        expected: &'static str,
        found: usize,
    },

    /// A symbolic type expression could not be parsed.
    #[error("invalid type expression `{input}` at offset {offset}: {message}")]
    Syntax {
        input: String,
        offset: usize,
        message: String,
    },

    /// A chain of names resolves back to itself without reaching a type.
    #[error("symbol `{name}` refers back to itself")]
    CyclicReference { name: String },

    /// Nesting went past the configured limit.
    #[error("type nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: u32 },
}

/// Coarse grouping of [`TypeError`] variants for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnresolvedSymbol,
    UnsupportedType,
    Arity,
    Configuration,
    Syntax,
    Recursion,
}

impl TypeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnresolvedSymbol { .. } | Self::UnresolvedForwardRef { .. } => {
                ErrorKind::UnresolvedSymbol
            }
            Self::MissingEnvironment { .. } => ErrorKind::Configuration,
            Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Self::Arity { .. } => ErrorKind::Arity,
            Self::Syntax { .. } => ErrorKind::Syntax,
            Self::CyclicReference { .. } | Self::DepthExceeded { .. } => ErrorKind::Recursion,
        }
    }

    /// The symbol an unresolved-name error refers to, if any.
    pub fn unresolved_name(&self) -> Option<&str> {
        match self {
            Self::UnresolvedSymbol { name } | Self::UnresolvedForwardRef { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }

    pub(crate) fn arity(expr: impl ToString, expected: &'static str, found: usize) -> Self {
        Self::Arity {
            expr: expr.to_string(),
            expected,
            found,
        }
    }

    pub(crate) fn unsupported(expr: impl ToString) -> Self {
        Self::UnsupportedType {
            expr: expr.to_string(),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::UnresolvedSymbol => "UnresolvedSymbolError",
            Self::UnsupportedType => "UnsupportedTypeError",
            Self::Arity => "ArityError",
            Self::Configuration => "ConfigurationError",
            Self::Syntax => "SyntaxError",
            Self::Recursion => "RecursionError",
        };
        f.write_str(name)
    }
}
