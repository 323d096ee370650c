//! Raw type expressions, as supplied by callers.
//!
//! A [`TypeExpr`] is the un-normalized input to the pipeline. It may be a
//! live type handle, a symbolic name that still has to be evaluated against
//! a symbol environment, a parametrized generic, a literal set, a structural
//! record or an opaque custom type.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::error::Result;

/// Live type handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Int,
    Float,
    Str,
    Bool,
    Bytes,
    NoneType,
    Any,
    /// The type of types.
    Type,
    List,
    Set,
    Dict,
    Tuple,
}

impl Builtin {
    /// Look up a reserved builtin name. Typing aliases (`List`, `Dict`, ...)
    /// map to the same handle as their lower-case counterparts.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "int" => Self::Int,
            "float" => Self::Float,
            "str" => Self::Str,
            "bool" => Self::Bool,
            "bytes" => Self::Bytes,
            "None" | "NoneType" => Self::NoneType,
            "Any" => Self::Any,
            "type" | "Type" => Self::Type,
            "list" | "List" => Self::List,
            "set" | "Set" => Self::Set,
            "dict" | "Dict" => Self::Dict,
            "tuple" | "Tuple" => Self::Tuple,
            _ => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bool => "bool",
            Self::Bytes => "bytes",
            Self::NoneType => "None",
            Self::Any => "Any",
            Self::Type => "type",
            Self::List => "list",
            Self::Set => "set",
            Self::Dict => "dict",
            Self::Tuple => "tuple",
        }
    }
}

/// The parametrizing origin of a generic expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    List,
    Set,
    Dict,
    Tuple,
    Type,
    Union,
    /// `Optional[T]`, sugar for `Union[T, None]`.
    Optional,
    /// A subscripted form the type language does not know.
    Other(String),
}

impl Origin {
    pub fn from_name(name: &str) -> Self {
        match name {
            "List" | "list" => Self::List,
            "Set" | "set" => Self::Set,
            "Dict" | "dict" => Self::Dict,
            "Tuple" | "tuple" => Self::Tuple,
            "Type" | "type" => Self::Type,
            "Union" => Self::Union,
            "Optional" => Self::Optional,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::List => "List",
            Self::Set => "Set",
            Self::Dict => "Dict",
            Self::Tuple => "Tuple",
            Self::Type => "Type",
            Self::Union => "Union",
            Self::Optional => "Optional",
            Self::Other(name) => name,
        }
    }
}

/// A constant admitted by a `Literal[...]` expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
}

impl From<i64> for LiteralValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for LiteralValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<bool> for LiteralValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for LiteralValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// A structural record: named, typed fields.
///
/// A total record requires exactly its declared keys. A partial record
/// (`total == false`) allows declared keys to be absent, but still rejects
/// undeclared keys.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDef {
    pub name: String,
    pub fields: IndexMap<String, TypeExpr>,
    pub total: bool,
}

impl RecordDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            total: true,
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }

    pub fn total(mut self, total: bool) -> Self {
        self.total = total;
        self
    }

    pub fn into_expr(self) -> TypeExpr {
        TypeExpr::Record(Arc::new(self))
    }
}

/// An opaque caller-defined type, matched by class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomType {
    pub name: String,
}

impl CustomType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Builtin(Builtin),
    /// Symbolic source text, evaluated against the symbol environment.
    Name(String),
    /// A forward reference; resolution requires an explicit environment.
    Forward(String),
    Generic { origin: Origin, args: Vec<TypeExpr> },
    Literal(Vec<LiteralValue>),
    Record(Arc<RecordDef>),
    Custom(CustomType),
}

impl TypeExpr {
    pub const INT: Self = Self::Builtin(Builtin::Int);
    pub const FLOAT: Self = Self::Builtin(Builtin::Float);
    pub const STR: Self = Self::Builtin(Builtin::Str);
    pub const BOOL: Self = Self::Builtin(Builtin::Bool);
    pub const BYTES: Self = Self::Builtin(Builtin::Bytes);
    pub const NONE: Self = Self::Builtin(Builtin::NoneType);
    pub const ANY: Self = Self::Builtin(Builtin::Any);

    /// Parse symbolic source text into an expression. Identifiers that are
    /// not builtin names stay unresolved as [`TypeExpr::Name`].
    pub fn parse(source: &str) -> Result<Self> {
        crate::parser::parse_type_expr(source)
    }

    pub fn name(source: impl Into<String>) -> Self {
        Self::Name(source.into())
    }

    pub fn forward(source: impl Into<String>) -> Self {
        Self::Forward(source.into())
    }

    pub fn generic(origin: Origin, args: Vec<TypeExpr>) -> Self {
        Self::Generic { origin, args }
    }

    pub fn list(element: TypeExpr) -> Self {
        Self::generic(Origin::List, vec![element])
    }

    pub fn set(element: TypeExpr) -> Self {
        Self::generic(Origin::Set, vec![element])
    }

    pub fn dict(key: TypeExpr, value: TypeExpr) -> Self {
        Self::generic(Origin::Dict, vec![key, value])
    }

    pub fn tuple(elements: Vec<TypeExpr>) -> Self {
        Self::generic(Origin::Tuple, elements)
    }

    pub fn union(arms: Vec<TypeExpr>) -> Self {
        Self::generic(Origin::Union, arms)
    }

    pub fn optional(inner: TypeExpr) -> Self {
        Self::generic(Origin::Optional, vec![inner])
    }

    pub fn literal<V: Into<LiteralValue>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::Literal(values.into_iter().map(Into::into).collect())
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(CustomType::new(name))
    }

    /// `true` for names and forward references that still need resolution.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Name(_) | Self::Forward(_))
    }
}

impl From<Builtin> for TypeExpr {
    fn from(b: Builtin) -> Self {
        Self::Builtin(b)
    }
}

impl From<RecordDef> for TypeExpr {
    fn from(record: RecordDef) -> Self {
        record.into_expr()
    }
}
