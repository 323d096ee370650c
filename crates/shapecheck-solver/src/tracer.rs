//! Mismatch tracing for validation.
//!
//! The validator is generic over a [`MismatchTracer`]. [`FastTracer`] only
//! answers yes/no and compiles away entirely; [`DiagnosticTracer`] keeps the
//! first mismatch reported, which is the deepest one since nested checks
//! finish before their parents.

use std::fmt;

use crate::value::ValueKind;

/// One step from the validated value down to the offending part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Position in a list, tuple or set.
    Index(usize),
    /// Entry in a mapping, by rendered key.
    Key(String),
    /// Field of a record.
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchReason {
    /// No head accepted the value's kind.
    KindMismatch { expected: String, found: ValueKind },
    /// A total record is missing a declared field.
    MissingField(String),
    /// A record value carries a key its record does not declare.
    UnexpectedKey(String),
    /// A record value carries a key that is not a string.
    NonStringKey(ValueKind),
    /// A fixed tuple has the wrong number of positions.
    LengthMismatch { expected: usize, found: usize },
    /// The value is not one of the literal's constants.
    NotInLiteral { allowed: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub path: Vec<PathSegment>,
    pub reason: MismatchReason,
}

impl Mismatch {
    /// The path rendered as `$.field[0]["key"]`.
    pub fn path_string(&self) -> String {
        let mut out = String::from("$");
        for segment in &self.path {
            match segment {
                PathSegment::Index(i) => out.push_str(&format!("[{i}]")),
                PathSegment::Key(key) => out.push_str(&format!("[{key:?}]")),
                PathSegment::Field(name) => {
                    out.push('.');
                    out.push_str(name);
                }
            }
        }
        out
    }
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindMismatch { expected, found } => write!(f, "expected {expected}, found {found}"),
            Self::MissingField(name) => write!(f, "missing required field `{name}`"),
            Self::UnexpectedKey(key) => write!(f, "unexpected key `{key}`"),
            Self::NonStringKey(kind) => write!(f, "record keys must be str, found {kind}"),
            Self::LengthMismatch { expected, found } => {
                write!(f, "expected a tuple of length {expected}, found length {found}")
            }
            Self::NotInLiteral { allowed } => write!(f, "value is not one of {allowed}"),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path_string(), self.reason)
    }
}

/// Receives mismatches as the validator finds them.
pub trait MismatchTracer {
    /// Whether the validator should maintain paths and build mismatches.
    const COLLECTS: bool;

    fn on_mismatch(&mut self, mismatch: impl FnOnce() -> Mismatch);

    fn has_mismatch(&self) -> bool;

    /// Forget the recorded mismatch, used when a later union arm accepts.
    fn clear(&mut self);
}

/// Records nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct FastTracer;

impl MismatchTracer for FastTracer {
    const COLLECTS: bool = false;

    #[inline(always)]
    fn on_mismatch(&mut self, _mismatch: impl FnOnce() -> Mismatch) {}

    #[inline(always)]
    fn has_mismatch(&self) -> bool {
        false
    }

    #[inline(always)]
    fn clear(&mut self) {}
}

/// Keeps the first (deepest) mismatch.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticTracer {
    mismatch: Option<Mismatch>,
}

impl DiagnosticTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        self.mismatch.as_ref()
    }

    pub fn into_mismatch(self) -> Option<Mismatch> {
        self.mismatch
    }
}

impl MismatchTracer for DiagnosticTracer {
    const COLLECTS: bool = true;

    fn on_mismatch(&mut self, mismatch: impl FnOnce() -> Mismatch) {
        if self.mismatch.is_none() {
            self.mismatch = Some(mismatch());
        }
    }

    fn has_mismatch(&self) -> bool {
        self.mismatch.is_some()
    }

    fn clear(&mut self) {
        self.mismatch = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_path() {
        let mismatch = Mismatch {
            path: vec![
                PathSegment::Field("users".into()),
                PathSegment::Index(2),
                PathSegment::Key("name".into()),
            ],
            reason: MismatchReason::KindMismatch {
                expected: "str".into(),
                found: ValueKind::Int,
            },
        };
        assert_eq!(mismatch.path_string(), r#"$.users[2]["name"]"#);
        assert_eq!(
            mismatch.to_string(),
            r#"$.users[2]["name"]: expected str, found int"#
        );
    }

    #[test]
    fn diagnostic_tracer_keeps_first() {
        let mut tracer = DiagnosticTracer::new();
        tracer.on_mismatch(|| Mismatch {
            path: vec![PathSegment::Index(0)],
            reason: MismatchReason::MissingField("a".into()),
        });
        tracer.on_mismatch(|| panic!("second mismatch must not be built"));
        assert_eq!(
            tracer.mismatch().map(|m| &m.reason),
            Some(&MismatchReason::MissingField("a".into()))
        );
        tracer.clear();
        assert!(!tracer.has_mismatch());
    }

    #[test]
    fn fast_tracer_records_nothing() {
        let mut tracer = FastTracer;
        tracer.on_mismatch(|| panic!("fast tracer must not build mismatches"));
        assert!(!tracer.has_mismatch());
    }
}
