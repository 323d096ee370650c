//! Rendering of expressions and descriptors in the textual type syntax.
//!
//! `Display` output for a [`TypeExpr`] parses back to an equivalent
//! expression (records and custom types render by name).

use std::fmt::{self, Display, Formatter, Write};

use crate::descriptor::{Arm, Descriptor, HeadDescriptor, ScalarKind, SubtypeSlot};
use crate::types::{LiteralValue, TypeExpr};

fn write_joined<T: Display>(f: &mut Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_quoted(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('\'')
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(s) => write_quoted(f, s),
            Self::Bytes(bytes) => {
                f.write_str("b'")?;
                for &b in bytes {
                    match b {
                        b'\'' => f.write_str("\\'")?,
                        b'\\' => f.write_str("\\\\")?,
                        0x20..=0x7e => f.write_char(b as char)?,
                        _ => write!(f, "\\x{b:02x}")?,
                    }
                }
                f.write_char('\'')
            }
        }
    }
}

impl Display for TypeExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(builtin) => f.write_str(builtin.name()),
            Self::Name(source) => f.write_str(source),
            Self::Forward(source) => write_quoted(f, source),
            Self::Generic { origin, args } => {
                f.write_str(origin.name())?;
                if args.is_empty() {
                    return Ok(());
                }
                f.write_char('[')?;
                write_joined(f, args, ", ")?;
                f.write_char(']')
            }
            Self::Literal(values) => {
                f.write_str("Literal")?;
                if values.is_empty() {
                    return Ok(());
                }
                f.write_char('[')?;
                write_joined(f, values, ", ")?;
                f.write_char(']')
            }
            Self::Record(record) => f.write_str(&record.name),
            Self::Custom(custom) => f.write_str(&custom.name),
        }
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Display for HeadDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Sequence => f.write_str("List"),
            Self::SetType => f.write_str("Set"),
            Self::Mapping => f.write_str("Dict"),
            Self::FixedTuple => f.write_str("Tuple"),
            Self::Record(record) => write!(f, "{}", record.name),
            Self::Literal(values) => {
                f.write_str("Literal[")?;
                write_joined(f, values, ", ")?;
                f.write_char(']')
            }
            Self::Union(kinds) => {
                f.write_str("Union[")?;
                write_joined(f, kinds, ", ")?;
                f.write_char(']')
            }
            Self::Forward(name) => write_quoted(f, name),
            Self::Custom(custom) => f.write_str(&custom.name),
        }
    }
}

impl Display for Arm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        let shows_params = matches!(
            self.head,
            HeadDescriptor::Sequence
                | HeadDescriptor::SetType
                | HeadDescriptor::Mapping
                | HeadDescriptor::FixedTuple
        );
        if shows_params && !self.subtypes.is_empty() {
            f.write_char('[')?;
            write_joined(f, &self.subtypes, ", ")?;
            f.write_char(']')?;
        }
        Ok(())
    }
}

impl Display for Descriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.arms, " | ")
    }
}

impl Display for SubtypeSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unstructured => f.write_str("None"),
            Self::Nested(descriptor) => write!(f, "{descriptor}"),
            Self::Fields(fields) => {
                f.write_char('{')?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.descriptor)?;
                }
                f.write_char('}')
            }
        }
    }
}
