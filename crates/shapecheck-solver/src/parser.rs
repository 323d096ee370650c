//! Recursive-descent parser for symbolic type expressions.
//!
//! Grammar:
//!
//! ```text
//! expr     := primary ('|' primary)*
//! primary  := IDENT ('[' expr (',' expr)* ','? ']')?
//!           | 'Literal' '[' constant (',' constant)* ','? ']'
//!           | STRING                         -- forward reference
//! constant := INT | STRING | BYTES | 'True' | 'False' | 'None'
//! ```
//!
//! Builtin names are resolved here; every other identifier is left as a
//! [`TypeExpr::Name`] for the symbol environment to resolve later.

use crate::error::{Result, TypeError};
use crate::scanner::{ScannerState, Token, TokenKind};
use crate::types::{Builtin, LiteralValue, Origin, TypeExpr};

/// Parse a complete type expression.
pub fn parse_type_expr(source: &str) -> Result<TypeExpr> {
    let mut parser = ParserState::new(source)?;
    let expr = parser.parse_type()?;
    if parser.current.kind != TokenKind::EndOfFile {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

struct ParserState<'a> {
    scanner: ScannerState<'a>,
    current: Token,
}

impl<'a> ParserState<'a> {
    fn new(source: &'a str) -> Result<Self> {
        let mut scanner = ScannerState::new(source);
        let current = scanner.next_token()?;
        Ok(Self { scanner, current })
    }

    fn next_token(&mut self) -> Result<Token> {
        let next = self.scanner.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn is_token(&self, kind: &TokenKind) -> bool {
        &self.current.kind == kind
    }

    fn parse_expected(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        if self.is_token(&kind) {
            self.next_token()?;
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn error(&self, message: impl Into<String>) -> TypeError {
        TypeError::Syntax {
            input: self.scanner.source().to_string(),
            offset: self.current.pos,
            message: message.into(),
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr> {
        let first = self.parse_primary()?;
        if !self.is_token(&TokenKind::Bar) {
            return Ok(first);
        }
        let mut arms = vec![first];
        while self.is_token(&TokenKind::Bar) {
            self.next_token()?;
            arms.push(self.parse_primary()?);
        }
        Ok(TypeExpr::union(arms))
    }

    fn parse_primary(&mut self) -> Result<TypeExpr> {
        match self.current.kind.clone() {
            TokenKind::Identifier(raw) => {
                self.next_token()?;
                let name = raw.strip_prefix("typing.").unwrap_or(&raw);
                if self.is_token(&TokenKind::OpenBracket) {
                    self.next_token()?;
                    if name == "Literal" {
                        let values = self.parse_list(Self::parse_constant)?;
                        return Ok(TypeExpr::Literal(values));
                    }
                    let args = self.parse_list(Self::parse_type)?;
                    return Ok(TypeExpr::generic(Origin::from_name(name), args));
                }
                Ok(match name {
                    "Literal" => TypeExpr::Literal(Vec::new()),
                    "Union" => TypeExpr::generic(Origin::Union, Vec::new()),
                    "Optional" => TypeExpr::generic(Origin::Optional, Vec::new()),
                    _ => match Builtin::from_name(name) {
                        Some(builtin) => TypeExpr::Builtin(builtin),
                        None => TypeExpr::Name(name.to_string()),
                    },
                })
            }
            TokenKind::Str(reference) => {
                self.next_token()?;
                Ok(TypeExpr::Forward(reference))
            }
            TokenKind::Int(_) | TokenKind::Bytes(_) => {
                Err(self.error("constants are only valid inside `Literal[...]`"))
            }
            _ => Err(self.error("expected a type")),
        }
    }

    /// Parse `item (',' item)* ','? ']'` after an opening bracket.
    fn parse_list<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while !self.is_token(&TokenKind::CloseBracket) {
            items.push(item(self)?);
            if self.is_token(&TokenKind::Comma) {
                self.next_token()?;
            } else {
                break;
            }
        }
        self.parse_expected(TokenKind::CloseBracket, "`,` or `]`")?;
        if items.is_empty() {
            return Err(self.error("expected at least one parameter"));
        }
        Ok(items)
    }

    fn parse_constant(&mut self) -> Result<LiteralValue> {
        let value = match &self.current.kind {
            TokenKind::Int(v) => LiteralValue::Int(*v),
            TokenKind::Str(s) => LiteralValue::Str(s.clone()),
            TokenKind::Bytes(b) => LiteralValue::Bytes(b.clone()),
            TokenKind::Identifier(name) => match name.as_str() {
                "True" => LiteralValue::Bool(true),
                "False" => LiteralValue::Bool(false),
                "None" => LiteralValue::None,
                other => {
                    return Err(self.error(format!(
                        "`{other}` is not a valid literal value; expected a constant"
                    )));
                }
            },
            _ => return Err(self.error("expected a literal constant")),
        };
        self.next_token()?;
        Ok(value)
    }
}
