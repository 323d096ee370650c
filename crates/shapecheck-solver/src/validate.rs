//! The recursive conformance check.
//!
//! Heads combine with OR: the first head that accepts the value wins.
//! Contents combine with AND: every element, position, entry and record
//! field must conform. Non-conformance is a `false` answer; only malformed
//! descriptors and exhausted limits are errors.

use tracing::trace;

use crate::descriptor::{Descriptor, FieldSlot, HeadDescriptor, ScalarKind, SubtypeSlot};
use crate::env::TypeResolver;
use crate::error::{Result, TypeError};
use crate::options::ValidationOptions;
use crate::recursion::DepthCounter;
use crate::resolve::DescriptorBuilder;
use crate::tracer::{DiagnosticTracer, FastTracer, Mismatch, MismatchReason, MismatchTracer, PathSegment};
use crate::types::{LiteralValue, RecordDef, TypeExpr};
use crate::value::Value;

/// Validates values against descriptors, resolving deferred references
/// against the environment as values reach them.
pub struct Validator<'r, R: TypeResolver + ?Sized, T: MismatchTracer = FastTracer> {
    builder: DescriptorBuilder<'r, R>,
    depth: DepthCounter,
    tracer: T,
    path: Vec<PathSegment>,
}

impl<'r, R: TypeResolver + ?Sized> Validator<'r, R, FastTracer> {
    pub fn new(env: &'r R) -> Self {
        Self::with_tracer(env, FastTracer)
    }
}

impl<'r, R: TypeResolver + ?Sized, T: MismatchTracer> Validator<'r, R, T> {
    pub fn with_tracer(env: &'r R, tracer: T) -> Self {
        let options = ValidationOptions::default();
        Self {
            builder: DescriptorBuilder::with_options(env, options),
            depth: DepthCounter::with_profile(options.validation_profile()),
            tracer,
            path: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.builder.options = options;
        self.depth = DepthCounter::with_profile(options.validation_profile());
        self
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn into_tracer(self) -> T {
        self.tracer
    }

    /// Build a descriptor for `expr` and validate `value` against it.
    pub fn conforms(&mut self, value: &Value, expr: &TypeExpr) -> Result<bool> {
        let descriptor = self.builder.build(expr)?;
        self.validate_descriptor(value, &descriptor)
    }

    /// Validate against a head set that shares one subtype list, as returned
    /// by [`normalize`](crate::normalize) and [`extract`](crate::extract).
    pub fn validate(&mut self, value: &Value, heads: &[HeadDescriptor], subtypes: &[SubtypeSlot]) -> Result<bool> {
        self.match_arms(value, heads.iter().map(|head| (head, subtypes)))
    }

    pub fn validate_descriptor(&mut self, value: &Value, descriptor: &Descriptor) -> Result<bool> {
        self.match_arms(
            value,
            descriptor.arms.iter().map(|arm| (&arm.head, arm.subtypes.as_slice())),
        )
    }

    fn match_arms<'d, I>(&mut self, value: &Value, arms: I) -> Result<bool>
    where
        I: Iterator<Item = (&'d HeadDescriptor, &'d [SubtypeSlot])> + Clone,
    {
        if arms.clone().any(|(head, _)| head.is_direct_match(value)) {
            return Ok(true);
        }
        if !self.depth.enter() {
            return Err(TypeError::DepthExceeded {
                limit: self.depth.max_depth(),
            });
        }
        let result = self.first_accepting(value, arms.clone());
        self.depth.leave();
        let accepted = result?;
        if !accepted {
            self.mismatch(|| MismatchReason::KindMismatch {
                expected: render_heads(arms.map(|(head, _)| head)),
                found: value.kind(),
            });
        }
        Ok(accepted)
    }

    fn first_accepting<'d>(
        &mut self,
        value: &Value,
        arms: impl Iterator<Item = (&'d HeadDescriptor, &'d [SubtypeSlot])>,
    ) -> Result<bool> {
        let had_mismatch = self.tracer.has_mismatch();
        for (head, subtypes) in arms {
            if self.accepts_head(value, head, subtypes)? {
                if !had_mismatch {
                    self.tracer.clear();
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn accepts_head(&mut self, value: &Value, head: &HeadDescriptor, subtypes: &[SubtypeSlot]) -> Result<bool> {
        let accepted = match (head, value) {
            (HeadDescriptor::Scalar(ScalarKind::Any), _) => true,
            (HeadDescriptor::Scalar(kind), _) => kind.value_kind() == Some(value.kind()),
            (HeadDescriptor::Record(record), Value::Dict(_)) => {
                let fields = match subtypes {
                    [_, SubtypeSlot::Fields(fields)] => Some(&**fields),
                    _ => None,
                };
                self.match_record(value, record, fields)?
            }
            (HeadDescriptor::Literal(allowed), _) => {
                let found = allowed.iter().any(|constant| literal_eq(constant, value));
                if !found {
                    self.mismatch(|| MismatchReason::NotInLiteral {
                        allowed: format!("{head}"),
                    });
                }
                found
            }
            (HeadDescriptor::Union(kinds), _) => kinds.contains(&value.kind()),
            (HeadDescriptor::Sequence, Value::List(items)) | (HeadDescriptor::SetType, Value::Set(items)) => {
                self.all_elements(head, items, subtypes)?
            }
            (HeadDescriptor::Mapping, Value::Dict(entries)) => self.all_entries(entries, subtypes)?,
            (HeadDescriptor::FixedTuple, Value::Tuple(items)) => self.all_positions(items, subtypes)?,
            (HeadDescriptor::Forward(reference), _) => {
                trace!(reference = %reference, "resolving deferred head");
                let descriptor = self.builder.build(&TypeExpr::forward(reference.as_str()))?;
                self.validate_descriptor(value, &descriptor)?
            }
            (HeadDescriptor::Custom(custom), Value::Instance(instance)) => instance.class == custom.name,
            _ => false,
        };
        Ok(accepted)
    }

    fn all_elements(&mut self, head: &HeadDescriptor, items: &[Value], subtypes: &[SubtypeSlot]) -> Result<bool> {
        let element = match subtypes {
            [] | [SubtypeSlot::Unstructured] => return Ok(true),
            [element] => element,
            _ => return Err(TypeError::arity(head, "takes 1 element slot", subtypes.len())),
        };
        for (i, item) in items.iter().enumerate() {
            if !self.within(PathSegment::Index(i), |v| v.accepts_slot(item, element))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn all_entries(&mut self, entries: &[(Value, Value)], subtypes: &[SubtypeSlot]) -> Result<bool> {
        let (key_slot, value_slot) = match subtypes {
            [] | [SubtypeSlot::Unstructured] => return Ok(true),
            [key, value] => (key, value),
            _ => {
                return Err(TypeError::arity(
                    HeadDescriptor::Mapping,
                    "needs 2 subtype slots",
                    subtypes.len(),
                ));
            }
        };
        for (key, item) in entries {
            let accepted = self.within(key_segment(key), |v| {
                Ok(v.accepts_slot(key, key_slot)? && v.accepts_slot(item, value_slot)?)
            })?;
            if !accepted {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn all_positions(&mut self, items: &[Value], subtypes: &[SubtypeSlot]) -> Result<bool> {
        if matches!(subtypes, [] | [SubtypeSlot::Unstructured]) {
            return Ok(true);
        }
        if items.len() != subtypes.len() {
            self.mismatch(|| MismatchReason::LengthMismatch {
                expected: subtypes.len(),
                found: items.len(),
            });
            return Ok(false);
        }
        for (i, (item, slot)) in items.iter().zip(subtypes).enumerate() {
            if !self.within(PathSegment::Index(i), |v| v.accepts_slot(item, slot))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn accepts_slot(&mut self, value: &Value, slot: &SubtypeSlot) -> Result<bool> {
        match slot {
            SubtypeSlot::Unstructured | SubtypeSlot::Fields(_) => Ok(true),
            SubtypeSlot::Nested(descriptor) => self.validate_descriptor(value, descriptor),
        }
    }

    /// Check a mapping against a record. `fields` are prebuilt per-field
    /// descriptors; fields without one are built on demand.
    pub(crate) fn match_record(&mut self, value: &Value, record: &RecordDef, fields: Option<&[FieldSlot]>) -> Result<bool> {
        let Value::Dict(entries) = value else {
            self.mismatch(|| MismatchReason::KindMismatch {
                expected: record.name.clone(),
                found: value.kind(),
            });
            return Ok(false);
        };

        if record.total {
            let missing = record
                .fields
                .keys()
                .find(|name| !entries.iter().any(|(key, _)| key.as_str() == Some(name.as_str())));
            if let Some(name) = missing {
                self.mismatch(|| MismatchReason::MissingField(name.clone()));
                return Ok(false);
            }
        }

        for (key, item) in entries {
            let Some(name) = key.as_str() else {
                self.mismatch(|| MismatchReason::NonStringKey(key.kind()));
                return Ok(false);
            };
            let Some(ty) = record.fields.get(name) else {
                self.mismatch(|| MismatchReason::UnexpectedKey(name.to_string()));
                return Ok(false);
            };
            let prebuilt = fields.and_then(|fields| fields.iter().find(|field| field.name == name));
            let segment = PathSegment::Field(name.to_string());
            let accepted = match prebuilt {
                Some(field) => self.within(segment, |v| v.validate_descriptor(item, &field.descriptor))?,
                None => {
                    let descriptor = self.builder.build(ty)?;
                    self.within(segment, |v| v.validate_descriptor(item, &descriptor))?
                }
            };
            if !accepted {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Run `f` with `segment` appended to the current path.
    fn within(&mut self, segment: PathSegment, f: impl FnOnce(&mut Self) -> Result<bool>) -> Result<bool> {
        if !T::COLLECTS {
            return f(self);
        }
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    fn mismatch(&mut self, reason: impl FnOnce() -> MismatchReason) {
        let path = &self.path;
        self.tracer.on_mismatch(|| Mismatch {
            path: path.clone(),
            reason: reason(),
        });
    }
}

/// Typed equality between a literal constant and a value.
fn literal_eq(constant: &LiteralValue, value: &Value) -> bool {
    match (constant, value) {
        (LiteralValue::None, Value::None) => true,
        (LiteralValue::Bool(a), Value::Bool(b)) => a == b,
        (LiteralValue::Int(a), Value::Int(b)) => a == b,
        (LiteralValue::Str(a), Value::Str(b)) => a == b,
        (LiteralValue::Bytes(a), Value::Bytes(b)) => a == b,
        _ => false,
    }
}

fn key_segment(key: &Value) -> PathSegment {
    match key {
        Value::Str(s) => PathSegment::Key(s.clone()),
        Value::Int(i) => PathSegment::Key(i.to_string()),
        Value::Bool(b) => PathSegment::Key(b.to_string()),
        other => PathSegment::Key(other.kind().to_string()),
    }
}

fn render_heads<'d>(heads: impl Iterator<Item = &'d HeadDescriptor>) -> String {
    heads.map(ToString::to_string).collect::<Vec<_>>().join(" | ")
}

/// Validate `value` against a head set and its shared subtype slots.
pub fn validate<R: TypeResolver + ?Sized>(
    value: &Value,
    heads: &[HeadDescriptor],
    subtypes: &[SubtypeSlot],
    env: &R,
) -> Result<bool> {
    Validator::new(env).validate(value, heads, subtypes)
}

/// Build a descriptor for `expr` and validate `value` against it.
///
/// ```
/// use shapecheck_solver::{conforms, NoopResolver, TypeExpr, Value};
///
/// let ty = TypeExpr::parse("Dict[str, List[int]]")?;
/// let value = Value::dict([("a", Value::list([1, 2]))]);
/// assert!(conforms(&value, &ty, &NoopResolver)?);
/// # Ok::<(), shapecheck_solver::TypeError>(())
/// ```
pub fn conforms<R: TypeResolver + ?Sized>(value: &Value, expr: &TypeExpr, env: &R) -> Result<bool> {
    Validator::new(env).conforms(value, expr)
}

/// Like [`conforms`], but report where the value stops conforming.
///
/// Returns `Ok(None)` when the value conforms.
pub fn explain<R: TypeResolver + ?Sized>(value: &Value, expr: &TypeExpr, env: &R) -> Result<Option<Mismatch>> {
    let mut validator = Validator::with_tracer(env, DiagnosticTracer::new());
    if validator.conforms(value, expr)? {
        return Ok(None);
    }
    Ok(validator.into_tracer().into_mismatch())
}

#[cfg(test)]
#[path = "../tests/validate_tests.rs"]
mod tests;
