//! Lexer (tokenizer) for expression source text.

use crate::{ExprError, ExprResult};

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    Null,
    True,
    False,

    // Literals
    Ident(String),
    Int(i64),
    Float(f64),
    String(String),

    // Symbols
    LParen,   // (
    RParen,   // )
    Dot,      // .
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    Percent,  // %
    Bang,     // !
    Eq,       // ==
    Ne,       // !=
    Lt,       // <
    Le,       // <=
    Gt,       // >
    Ge,       // >=
    AndAnd,   // &&
    OrOr,     // ||
    Eof,
}

/// A token with its byte offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Tokenizer over expression source.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            pos: 0,
        }
    }

    /// Tokenize the whole input, ending with an Eof token.
    pub fn tokenize(mut self) -> ExprResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let offset = self.pos;
            let Some(c) = self.peek_char() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    offset,
                });
                return Ok(tokens);
            };

            let kind = match c {
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '.' => self.single(TokenKind::Dot),
                '+' => self.single(TokenKind::Plus),
                '-' => self.single(TokenKind::Minus),
                '*' => self.single(TokenKind::Star),
                '/' => self.single(TokenKind::Slash),
                '%' => self.single(TokenKind::Percent),
                '!' => self.maybe_eq(TokenKind::Bang, TokenKind::Ne),
                '=' => {
                    self.next_char();
                    match self.peek_char() {
                        Some('=') => {
                            self.next_char();
                            TokenKind::Eq
                        }
                        _ => return Err(ExprError::parse(offset, "expected '=='")),
                    }
                }
                '<' => self.maybe_eq(TokenKind::Lt, TokenKind::Le),
                '>' => self.maybe_eq(TokenKind::Gt, TokenKind::Ge),
                '&' => self.pair('&', TokenKind::AndAnd, offset)?,
                '|' => self.pair('|', TokenKind::OrOr, offset)?,
                '\'' | '"' => self.scan_string(c, offset)?,
                c if c.is_ascii_digit() => self.scan_number(offset)?,
                c if c.is_alphabetic() || c == '_' => self.scan_ident(),
                other => {
                    return Err(ExprError::parse(
                        offset,
                        format!("unexpected character '{}'", other),
                    ))
                }
            };
            tokens.push(Token { kind, offset });
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn next_char(&mut self) -> Option<char> {
        let (i, c) = self.chars.next()?;
        self.pos = i + c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.next_char();
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.next_char();
        kind
    }

    /// Consume one char; if an '=' follows, yield `with_eq` instead of `bare`.
    fn maybe_eq(&mut self, bare: TokenKind, with_eq: TokenKind) -> TokenKind {
        self.next_char();
        if self.peek_char() == Some('=') {
            self.next_char();
            with_eq
        } else {
            bare
        }
    }

    /// Consume a doubled symbol such as `&&` or `||`.
    fn pair(&mut self, second: char, kind: TokenKind, offset: usize) -> ExprResult<TokenKind> {
        self.next_char();
        if self.peek_char() == Some(second) {
            self.next_char();
            Ok(kind)
        } else {
            Err(ExprError::parse(
                offset,
                format!("expected '{}{}'", second, second),
            ))
        }
    }

    fn scan_string(&mut self, quote: char, offset: usize) -> ExprResult<TokenKind> {
        self.next_char();
        let mut out = String::new();
        loop {
            match self.next_char() {
                Some(c) if c == quote => return Ok(TokenKind::String(out)),
                Some('\\') => match self.next_char() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => return Err(ExprError::parse(offset, "unterminated string")),
                },
                Some(c) => out.push(c),
                None => return Err(ExprError::parse(offset, "unterminated string")),
            }
        }
    }

    fn scan_number(&mut self, offset: usize) -> ExprResult<TokenKind> {
        let start = self.pos;
        while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            self.next_char();
        }
        let mut is_float = false;
        // A dot is part of the number only when a digit follows; otherwise it
        // is member access on an integer, which the parser will reject.
        if self.peek_char() == Some('.') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if matches!(lookahead.peek(), Some((_, c)) if c.is_ascii_digit()) {
                is_float = true;
                self.next_char();
                while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                    self.next_char();
                }
            }
        }
        let text = &self.input[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|e| ExprError::parse(offset, e.to_string()))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|e| ExprError::parse(offset, e.to_string()))
        }
    }

    fn scan_ident(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(self.peek_char(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.next_char();
        }
        let text = &self.input[start..self.pos];
        match text {
            "null" => TokenKind::Null,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => TokenKind::Ident(text.to_string()),
        }
    }
}
