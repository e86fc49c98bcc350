//! Text tokenizer shared by the JSON and YAML readers.
//!
//! The token set is a superset of what JSON needs; whitespace and newlines
//! are tokens in their own right so that indentation-driven formats can
//! layer on top, and any unclassified byte comes out as [`Nonterminal`]
//! rather than an error.
//!
//! [`Nonterminal`]: TokenType::Nonterminal

use crate::error::report;
use crate::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    End,
    NewLine,
    Space,
    Tab,
    Identifier,
    DoubleQuotedString,
    SingleQuotedString,
    Number,
    True,
    False,
    Colon,
    Minus,
    BraceOpen,
    BraceClose,
    BracketOpen,
    BracketClose,
    Comma,
    Nonterminal,
}

impl TokenType {
    /// Human-readable token name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenType::End => "EOF",
            TokenType::NewLine => "new line",
            TokenType::Space => "space",
            TokenType::Tab => "tab",
            TokenType::Identifier => "identifier",
            TokenType::DoubleQuotedString => "double quoted string",
            TokenType::SingleQuotedString => "single quoted string",
            TokenType::Number => "number",
            TokenType::True => "true",
            TokenType::False => "false",
            TokenType::Colon => "colon",
            TokenType::Minus => "minus",
            TokenType::BraceOpen => "brace open",
            TokenType::BraceClose => "brace close",
            TokenType::BracketOpen => "bracket open",
            TokenType::BracketClose => "bracket close",
            TokenType::Comma => "comma",
            TokenType::Nonterminal => "nonterminal",
        }
    }
}

/// One classified token: type, source position and text view.
///
/// For quoted strings the text view strips the surrounding quotes; for all
/// other tokens it spans the raw bytes. `start` is the byte offset of the
/// raw token in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub ty: TokenType,
    pub line: u32,
    pub column: u32,
    pub start: usize,
    pub text: &'a [u8],
}

/// A lazy token stream over a text buffer.
///
/// Construction does not read ahead: the current token is the empty
/// [`End`](TokenType::End) placeholder until the first [`next`] call.
/// Parsers typically prime the stream with [`next_non_space`] and then
/// drive it through [`expect`]/[`consume`]/[`check`].
///
/// [`next`]: Self::next
/// [`next_non_space`]: Self::next_non_space
/// [`expect`]: Self::expect
/// [`consume`]: Self::consume
/// [`check`]: Self::check
pub struct TokenInput<'a> {
    input: &'a [u8],
    head: usize,
    line: u32,
    column: u32,
    token: Token<'a>,
    prev: Token<'a>,
}

impl<'a> TokenInput<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let placeholder = Token {
            ty: TokenType::End,
            line: 0,
            column: 0,
            start: 0,
            text: b"",
        };
        Self {
            input,
            head: 0,
            line: 1,
            column: 1,
            token: placeholder,
            prev: placeholder,
        }
    }

    /// The byte at `offset` past the read head; 0 beyond the end, so a
    /// buffer end and an embedded NUL terminator read the same way.
    fn peek(&self, offset: usize) -> u8 {
        self.input.get(self.head + offset).copied().unwrap_or(0)
    }

    fn read_exact(&mut self, symbols: &[u8]) -> bool {
        if self.input[self.head..].starts_with(symbols) {
            self.head += symbols.len();
            return true;
        }
        false
    }

    fn read_as(&mut self, ty: TokenType, count: usize) -> TokenType {
        self.head += count;
        ty
    }

    fn read_number(&mut self) -> TokenType {
        while self.peek(0).is_ascii_digit() {
            self.head += 1;
        }
        if self.peek(0) == b'.' {
            self.head += 1;
            while self.peek(0).is_ascii_digit() {
                self.head += 1;
            }
        }
        TokenType::Number
    }

    fn read_string(&mut self, quote: u8, ty: TokenType) -> TokenType {
        self.head += 1;
        while self.peek(0) != quote && self.peek(0) != 0 && self.head < self.input.len() {
            self.head += 1;
        }
        if self.peek(0) == quote {
            self.head += 1;
        }
        ty
    }

    fn read_token(&mut self) -> TokenType {
        if self.head >= self.input.len() {
            return TokenType::End;
        }
        match self.peek(0) {
            0 => TokenType::End,
            b' ' => self.read_as(TokenType::Space, 1),
            b'\n' => self.read_as(TokenType::NewLine, 1),
            b'\t' => self.read_as(TokenType::Tab, 1),
            b'\r' if self.peek(1) == b'\n' => self.read_as(TokenType::NewLine, 2),
            b'-' => self.read_as(TokenType::Minus, 1),
            b'[' => self.read_as(TokenType::BracketOpen, 1),
            b']' => self.read_as(TokenType::BracketClose, 1),
            b'{' => self.read_as(TokenType::BraceOpen, 1),
            b'}' => self.read_as(TokenType::BraceClose, 1),
            b':' => self.read_as(TokenType::Colon, 1),
            b',' => self.read_as(TokenType::Comma, 1),
            b'"' => self.read_string(b'"', TokenType::DoubleQuotedString),
            b'\'' => self.read_string(b'\'', TokenType::SingleQuotedString),
            byte if byte.is_ascii_digit() => self.read_number(),
            _ => {
                if self.read_exact(b"true") {
                    return TokenType::True;
                }
                if self.read_exact(b"false") {
                    return TokenType::False;
                }
                if self.peek(0).is_ascii_alphabetic() {
                    self.head += 1;
                    while self.peek(0).is_ascii_alphanumeric() || self.peek(0) == b'_' {
                        self.head += 1;
                    }
                    return TokenType::Identifier;
                }
                self.read_as(TokenType::Nonterminal, 1)
            }
        }
    }

    /// Reads the next token and makes it current.
    pub fn next(&mut self) -> Token<'a> {
        self.prev = self.token;

        let line = self.line;
        let column = self.column;
        let start = self.head;
        let ty = self.read_token();
        let raw = &self.input[start..self.head];

        let text = match ty {
            TokenType::DoubleQuotedString | TokenType::SingleQuotedString => {
                if raw.len() >= 2 && raw.last() == raw.first() {
                    &raw[1..raw.len() - 1]
                } else {
                    &raw[1..]
                }
            }
            _ => raw,
        };

        if ty == TokenType::NewLine {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += raw.len() as u32;
        }

        self.token = Token { ty, line, column, start, text };
        self.token
    }

    /// Advances at least once, skipping spaces, tabs and newlines.
    pub fn next_non_space(&mut self) -> Token<'a> {
        loop {
            let token = self.next();
            if !matches!(
                token.ty,
                TokenType::Space | TokenType::Tab | TokenType::NewLine
            ) {
                return token;
            }
        }
    }

    /// The current token.
    pub fn token(&self) -> Token<'a> {
        self.token
    }

    /// True when the current token has the given type.
    pub fn check(&self, ty: TokenType) -> bool {
        self.token.ty == ty
    }

    /// Consumes the current token if it matches, advancing to the next
    /// (non-space, when `skip_space` is set) token. Mismatch is silent.
    pub fn consume(&mut self, ty: TokenType, skip_space: bool) -> bool {
        if self.token.ty != ty {
            return false;
        }
        if skip_space {
            self.next_non_space();
        } else {
            self.next();
        }
        true
    }

    /// Like [`consume`](Self::consume), but a mismatch reports a
    /// diagnostic through the error handler.
    pub fn expect(&mut self, ty: TokenType, skip_space: bool) -> bool {
        if self.consume(ty, skip_space) {
            return true;
        }
        report(format_args!(
            "error: {}:{} : expected '{}' after '{}', got '{}'",
            self.token.line,
            self.token.column,
            ty.name(),
            self.prev.ty.name(),
            self.token.ty.name()
        ));
        false
    }

    /// Reports the current token as unexpected.
    pub fn emit_unexpected(&self) {
        report(format_args!(
            "error: {}:{} : unexpected token '{}' after '{}'",
            self.token.line,
            self.token.column,
            self.token.ty.name(),
            self.prev.ty.name()
        ));
    }

    /// Consumes a number token into a double, applying `sign`.
    pub fn consume_number(&mut self, sign: f64, skip_space: bool) -> Option<Value<'a>> {
        let text = self.token.text;
        if !self.expect(TokenType::Number, skip_space) {
            return None;
        }
        parse_number(text).map(|number| Value::Double(number * sign))
    }

    /// Consumes a `true`/`false` token into a boolean.
    pub fn consume_boolean(&mut self, skip_space: bool) -> Option<Value<'a>> {
        match self.token.ty {
            TokenType::True => {
                self.consume(TokenType::True, skip_space);
                Some(Value::Bool(true))
            }
            TokenType::False => {
                self.consume(TokenType::False, skip_space);
                Some(Value::Bool(false))
            }
            _ => {
                self.emit_unexpected();
                None
            }
        }
    }

    /// Consumes the current token as a string value.
    pub fn consume_string(&mut self, skip_space: bool) -> Value<'a> {
        let value = Value::String(self.token.text);
        self.consume(self.token.ty, skip_space);
        value
    }

    /// The read head: the end offset of the current token.
    pub fn pos(&self) -> usize {
        self.head
    }

    /// The underlying source buffer.
    pub fn source(&self) -> &'a [u8] {
        self.input
    }

    /// Total number of consumed bytes.
    pub fn consumed(&self) -> usize {
        self.head
    }
}

pub(crate) fn parse_number(text: &[u8]) -> Option<f64> {
    std::str::from_utf8(text).ok()?.parse().ok()
}
