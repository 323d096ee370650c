//! Tokenizer for symbolic type expressions such as `Dict[str, List[int]]`.

use crate::error::{Result, TypeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, possibly dotted (`typing.List`).
    Identifier(String),
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
    OpenBracket,
    CloseBracket,
    Comma,
    Bar,
    EndOfFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub pos: usize,
}

pub struct ScannerState<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> ScannerState<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> TypeError {
        TypeError::Syntax {
            input: self.source.to_string(),
            offset,
            message: message.into(),
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.bump();
        }

        let start = self.pos;
        let Some(ch) = self.peek_char() else {
            return Ok(Token {
                kind: TokenKind::EndOfFile,
                pos: start,
            });
        };

        let kind = match ch {
            '[' => {
                self.bump();
                TokenKind::OpenBracket
            }
            ']' => {
                self.bump();
                TokenKind::CloseBracket
            }
            ',' => {
                self.bump();
                TokenKind::Comma
            }
            '|' => {
                self.bump();
                TokenKind::Bar
            }
            '\'' | '"' => TokenKind::Str(self.scan_string()?),
            'b' if matches!(self.source[self.pos + 1..].chars().next(), Some('\'' | '"')) => {
                self.bump();
                TokenKind::Bytes(self.scan_bytes()?)
            }
            '-' | '0'..='9' => self.scan_number()?,
            c if is_identifier_start(c) => self.scan_identifier(),
            other => return Err(self.error(start, format!("unexpected character `{other}`"))),
        };

        Ok(Token { kind, pos: start })
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while self
            .peek_char()
            .is_some_and(|c| is_identifier_part(c) || c == '.')
        {
            self.bump();
        }
        TokenKind::Identifier(self.source[start..self.pos].to_string())
    }

    fn scan_number(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        if self.peek_char() == Some('-') {
            self.bump();
        }
        let digits_start = self.pos;
        while self
            .peek_char()
            .is_some_and(|c| c.is_ascii_digit() || c == '_')
        {
            self.bump();
        }
        if self.pos == digits_start {
            return Err(self.error(start, "expected digits after `-`"));
        }
        if self.peek_char() == Some('.') {
            return Err(self.error(start, "float constants are not valid literal values"));
        }
        let text: String = self.source[start..self.pos]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        text.parse::<i64>()
            .map(TokenKind::Int)
            .map_err(|_| self.error(start, format!("integer `{text}` is out of range")))
    }

    fn scan_string(&mut self) -> Result<String> {
        let start = self.pos;
        let raw = self.scan_quoted(false)?;
        String::from_utf8(raw).map_err(|_| self.error(start, "string is not valid UTF-8"))
    }

    fn scan_bytes(&mut self) -> Result<Vec<u8>> {
        self.scan_quoted(true)
    }

    /// Scan a quoted constant into raw bytes. In a bytes literal `\xNN` is
    /// one byte and only ASCII may appear unescaped; in a string it is the
    /// code point `U+00NN`.
    fn scan_quoted(&mut self, bytes: bool) -> Result<Vec<u8>> {
        let start = self.pos;
        let Some(quote) = self.bump() else {
            return Err(self.error(start, "expected a string"));
        };
        let mut out = Vec::new();
        loop {
            let at = self.pos;
            match self.bump() {
                None => return Err(self.error(start, "unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push(b'\n'),
                    Some('t') => out.push(b'\t'),
                    Some('r') => out.push(b'\r'),
                    Some('0') => out.push(0),
                    Some(c @ ('\\' | '\'' | '"')) => push_char(&mut out, c),
                    Some('x') => {
                        let byte = self.scan_hex_byte(at)?;
                        if bytes {
                            out.push(byte);
                        } else {
                            push_char(&mut out, char::from(byte));
                        }
                    }
                    Some(c) => {
                        out.push(b'\\');
                        push_char(&mut out, c);
                    }
                    None => return Err(self.error(start, "unterminated string")),
                },
                Some(c) if bytes && !c.is_ascii() => {
                    return Err(self.error(at, "bytes literals may only contain ASCII characters"));
                }
                Some(c) => push_char(&mut out, c),
            }
        }
    }

    /// The two hex digits after `\x`; `escape` is the offset of the backslash.
    fn scan_hex_byte(&mut self, escape: usize) -> Result<u8> {
        let hex = self
            .source
            .get(self.pos..self.pos + 2)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()));
        let Some(byte) = hex.and_then(|hex| u8::from_str_radix(hex, 16).ok()) else {
            return Err(self.error(escape, "`\\x` escape needs two hex digits"));
        };
        self.pos += 2;
        Ok(byte)
    }
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_identifier_part(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// `true` when `text` is a single (possibly dotted) identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(is_identifier_start)
        && chars.all(|c| is_identifier_part(c) || c == '.')
        && !text.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut scanner = ScannerState::new(source);
        let mut out = Vec::new();
        loop {
            let token = scanner.next_token().expect("scan");
            if token.kind == TokenKind::EndOfFile {
                return out;
            }
            out.push(token.kind);
        }
    }

    #[test]
    fn scans_generic_expression() {
        assert_eq!(
            kinds("Dict[str, int]"),
            vec![
                TokenKind::Identifier("Dict".into()),
                TokenKind::OpenBracket,
                TokenKind::Identifier("str".into()),
                TokenKind::Comma,
                TokenKind::Identifier("int".into()),
                TokenKind::CloseBracket,
            ]
        );
    }

    #[test]
    fn scans_constants() {
        assert_eq!(
            kinds(r#"-7 'a\'b' "x" b'raw' 1_000"#),
            vec![
                TokenKind::Int(-7),
                TokenKind::Str("a'b".into()),
                TokenKind::Str("x".into()),
                TokenKind::Bytes(b"raw".to_vec()),
                TokenKind::Int(1000),
            ]
        );
    }

    #[test]
    fn decodes_hex_escapes() {
        assert_eq!(
            kinds(r"b'\x00\xFF' '\xe9'"),
            vec![
                TokenKind::Bytes(vec![0x00, 0xff]),
                TokenKind::Str("\u{e9}".into()),
            ]
        );
        let err = ScannerState::new(r"b'\x4'").next_token().unwrap_err();
        assert!(matches!(err, TypeError::Syntax { offset: 2, .. }));
    }

    #[test]
    fn rejects_unterminated_string() {
        let mut scanner = ScannerState::new("'abc");
        let err = scanner.next_token().unwrap_err();
        assert!(matches!(err, TypeError::Syntax { offset: 0, .. }));
    }

    #[test]
    fn identifier_check() {
        assert!(is_identifier("TestClass"));
        assert!(is_identifier("typing.List"));
        assert!(!is_identifier("List[int]"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier(""));
    }
}
