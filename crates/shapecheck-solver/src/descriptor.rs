//! Normalized descriptors.
//!
//! The normalizer turns a [`TypeExpr`] into one [`HeadDescriptor`] per union
//! arm; the extractor derives the [`SubtypeSlot`]s that validate a head's
//! contents. A [`Descriptor`] pairs each head with its own slots, so union
//! arms nested inside containers keep their structure.

use smallvec::{SmallVec, smallvec};
use std::sync::Arc;

use crate::env::TypeResolver;
use crate::error::Result;
use crate::types::{Builtin, CustomType, LiteralValue, RecordDef, TypeExpr};
use crate::value::{Value, ValueKind};

/// Kinds matched by exact runtime kind.
///
/// `List`, `Set`, `Dict` and `Tuple` are raw container handles: they accept
/// any container of that kind without looking at its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Float,
    Str,
    Bool,
    Bytes,
    None,
    Any,
    /// The type of types.
    Type,
    List,
    Set,
    Dict,
    Tuple,
}

impl ScalarKind {
    pub const fn from_builtin(builtin: Builtin) -> Self {
        match builtin {
            Builtin::Int => Self::Int,
            Builtin::Float => Self::Float,
            Builtin::Str => Self::Str,
            Builtin::Bool => Self::Bool,
            Builtin::Bytes => Self::Bytes,
            Builtin::NoneType => Self::None,
            Builtin::Any => Self::Any,
            Builtin::Type => Self::Type,
            Builtin::List => Self::List,
            Builtin::Set => Self::Set,
            Builtin::Dict => Self::Dict,
            Builtin::Tuple => Self::Tuple,
        }
    }

    /// The runtime kind this scalar matches directly; `None` for `Any`.
    pub const fn value_kind(self) -> Option<ValueKind> {
        Some(match self {
            Self::Int => ValueKind::Int,
            Self::Float => ValueKind::Float,
            Self::Str => ValueKind::Str,
            Self::Bool => ValueKind::Bool,
            Self::Bytes => ValueKind::Bytes,
            Self::None => ValueKind::None,
            Self::Type => ValueKind::Type,
            Self::List => ValueKind::List,
            Self::Set => ValueKind::Set,
            Self::Dict => ValueKind::Dict,
            Self::Tuple => ValueKind::Tuple,
            Self::Any => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self.value_kind() {
            Some(kind) => kind.name(),
            None => "Any",
        }
    }
}

/// One normalized alternative a value may match.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadDescriptor {
    Scalar(ScalarKind),
    Sequence,
    SetType,
    Mapping,
    FixedTuple,
    Record(Arc<RecordDef>),
    Literal(Arc<[LiteralValue]>),
    /// A union kept as a single head: matches any of the member kinds.
    /// Normalization expands unions into separate heads instead.
    Union(Vec<ValueKind>),
    /// An unresolved reference, resolved against the environment when a
    /// value reaches it.
    Forward(String),
    Custom(CustomType),
}

impl HeadDescriptor {
    pub const ANY: Self = Self::Scalar(ScalarKind::Any);
    pub const NONE: Self = Self::Scalar(ScalarKind::None);

    /// `true` when the head matches `value` by kind alone.
    pub(crate) fn is_direct_match(&self, value: &Value) -> bool {
        matches!(self, Self::Scalar(kind) if kind.value_kind() == Some(value.kind()))
    }
}

/// The ordered heads an expression normalizes to; never empty.
pub type HeadSet = SmallVec<[HeadDescriptor; 2]>;

/// One record field with its prebuilt descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    pub name: String,
    pub descriptor: Descriptor,
}

/// A nested slot needed to validate a head's contents.
#[derive(Debug, Clone, PartialEq)]
pub enum SubtypeSlot {
    /// Nothing further to validate.
    Unstructured,
    Nested(Descriptor),
    /// Per-field descriptors of a record head.
    Fields(Arc<[FieldSlot]>),
}

impl SubtypeSlot {
    pub fn any() -> Self {
        Self::Nested(Descriptor::any())
    }

    /// `true` when the slot places no constraint on contents.
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Self::Unstructured)
    }
}

/// A head together with the slots that validate its contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Arm {
    pub head: HeadDescriptor,
    pub subtypes: Vec<SubtypeSlot>,
}

impl Arm {
    pub fn new(head: HeadDescriptor, subtypes: Vec<SubtypeSlot>) -> Self {
        Self { head, subtypes }
    }

    pub fn bare(head: HeadDescriptor) -> Self {
        Self::new(head, vec![SubtypeSlot::Unstructured])
    }
}

/// A fully built descriptor: every union arm with its own subtype slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub arms: SmallVec<[Arm; 2]>,
}

impl Descriptor {
    pub fn any() -> Self {
        Self::single(Arm::bare(HeadDescriptor::ANY))
    }

    pub fn single(arm: Arm) -> Self {
        Self { arms: smallvec![arm] }
    }

    /// Normalize `expr` and extract subtypes for each of its arms.
    pub fn build<R: TypeResolver + ?Sized>(expr: &TypeExpr, env: &R) -> Result<Self> {
        crate::resolve::DescriptorBuilder::new(env).build(expr)
    }

    pub fn heads(&self) -> impl Iterator<Item = &HeadDescriptor> {
        self.arms.iter().map(|arm| &arm.head)
    }

    /// Validate `value` against this descriptor.
    pub fn validate<R: TypeResolver + ?Sized>(&self, value: &Value, env: &R) -> Result<bool> {
        crate::validate::Validator::new(env).validate_descriptor(value, self)
    }
}

impl From<Arm> for Descriptor {
    fn from(arm: Arm) -> Self {
        Self::single(arm)
    }
}
