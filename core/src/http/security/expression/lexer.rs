//! Tokenizer for permission expressions.

use std::iter::Peekable;
use std::str::CharIndices;

use super::error::SyntaxError;

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// Identifier (function name)
    Ident(String),
    /// Context variable (`#name`)
    Variable(String),
    /// String literal
    String(String),
    /// Number literal
    Number(f64),
    /// Boolean literal
    Bool(bool),
    /// `null`
    Null,
    LParen,
    RParen,
    Comma,
    Dot,
    /// `&&` / `and`
    And,
    /// `||` / `or`
    Or,
    /// `!` / `not`
    Not,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl TokenKind {
    /// Human readable form used in syntax error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Variable(name) => format!("variable '#{}'", name),
            TokenKind::String(value) => format!("string '{}'", value),
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Bool(b) => format!("'{}'", b),
            TokenKind::Null => "'null'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::And => "'&&'".to_string(),
            TokenKind::Or => "'||'".to_string(),
            TokenKind::Not => "'!'".to_string(),
            TokenKind::Eq => "'=='".to_string(),
            TokenKind::Neq => "'!='".to_string(),
            TokenKind::Lt => "'<'".to_string(),
            TokenKind::Le => "'<='".to_string(),
            TokenKind::Gt => "'>'".to_string(),
            TokenKind::Ge => "'>='".to_string(),
        }
    }
}

/// A token together with the character offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Tokenizes an expression string.
pub(crate) fn tokenize(expr: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(expr).run()
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    /// Character offset of the next unread char.
    position: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(expr: &'a str) -> Self {
        Lexer {
            chars: expr.char_indices().peekable(),
            position: 0,
            tokens: Vec::new(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.chars.next().map(|(_, c)| c);
        if next.is_some() {
            self.position += 1;
        }
        next
    }

    fn push(&mut self, kind: TokenKind, position: usize) {
        self.tokens.push(Token { kind, position });
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        while let Some(c) = self.peek() {
            let start = self.position;
            match c {
                ' ' | '\t' | '\n' | '\r' => {
                    self.bump();
                }
                '(' => {
                    self.bump();
                    self.push(TokenKind::LParen, start);
                }
                ')' => {
                    self.bump();
                    self.push(TokenKind::RParen, start);
                }
                ',' => {
                    self.bump();
                    self.push(TokenKind::Comma, start);
                }
                '.' => {
                    self.bump();
                    self.push(TokenKind::Dot, start);
                }
                '\'' | '"' => {
                    let value = self.string_literal()?;
                    self.push(TokenKind::String(value), start);
                }
                '&' => {
                    self.bump();
                    self.expect_second('&', '&', start)?;
                    self.push(TokenKind::And, start);
                }
                '|' => {
                    self.bump();
                    self.expect_second('|', '|', start)?;
                    self.push(TokenKind::Or, start);
                }
                '=' => {
                    self.bump();
                    self.expect_second('=', '=', start)?;
                    self.push(TokenKind::Eq, start);
                }
                '!' => {
                    self.bump();
                    let kind = if self.peek() == Some('=') {
                        self.bump();
                        TokenKind::Neq
                    } else {
                        TokenKind::Not
                    };
                    self.push(kind, start);
                }
                '<' | '>' => {
                    self.bump();
                    let or_equal = self.peek() == Some('=');
                    if or_equal {
                        self.bump();
                    }
                    let kind = match (c, or_equal) {
                        ('<', false) => TokenKind::Lt,
                        ('<', true) => TokenKind::Le,
                        (_, false) => TokenKind::Gt,
                        (_, true) => TokenKind::Ge,
                    };
                    self.push(kind, start);
                }
                '#' => {
                    self.bump();
                    match self.peek() {
                        Some(next) if is_ident_start(next) => {
                            let name = self.identifier();
                            self.push(TokenKind::Variable(name), start);
                        }
                        _ => {
                            return Err(SyntaxError::new(
                                start,
                                "expected variable name after '#'",
                            ))
                        }
                    }
                }
                '0'..='9' => {
                    let number = self.number(start)?;
                    self.push(TokenKind::Number(number), start);
                }
                c if is_ident_start(c) => {
                    let ident = self.identifier();
                    // Field names after '.' are never keywords.
                    let after_dot = matches!(
                        self.tokens.last(),
                        Some(Token {
                            kind: TokenKind::Dot,
                            ..
                        })
                    );
                    if after_dot {
                        self.push(TokenKind::Ident(ident), start);
                    } else {
                        self.push(keyword_or_ident(ident), start);
                    }
                }
                other => {
                    return Err(SyntaxError::new(
                        start,
                        format!("unexpected character '{}'", other),
                    ))
                }
            }
        }

        Ok(self.tokens)
    }

    fn expect_second(&mut self, expected: char, first: char, start: usize) -> Result<(), SyntaxError> {
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(SyntaxError::new(
                start,
                format!("unexpected character '{}'", first),
            ))
        }
    }

    fn string_literal(&mut self) -> Result<String, SyntaxError> {
        let start = self.position;
        let quote = self.bump().unwrap_or('\'');
        let mut value = String::new();

        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.peek() {
                    Some(escaped @ ('\'' | '"')) => {
                        self.bump();
                        value.push(escaped);
                    }
                    _ => value.push('\\'),
                },
                Some(c) => value.push(c),
                None => return Err(SyntaxError::new(start, "unterminated string literal")),
            }
        }
    }

    fn identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        ident
    }

    fn number(&mut self, start: usize) -> Result<f64, SyntaxError> {
        let mut text = self.digits();

        // A '.' only belongs to the number when a digit follows it.
        let mut lookahead = self.chars.clone();
        lookahead.next();
        let fraction = self.peek() == Some('.')
            && lookahead.peek().is_some_and(|&(_, c)| c.is_ascii_digit());
        if fraction {
            self.bump();
            text.push('.');
            text.push_str(&self.digits());
        }

        text.parse::<f64>()
            .map_err(|_| SyntaxError::new(start, format!("invalid number '{}'", text)))
    }

    fn digits(&mut self) -> String {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.bump();
            } else {
                break;
            }
        }
        digits
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn keyword_or_ident(ident: String) -> TokenKind {
    match ident.to_lowercase().as_str() {
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "true" => TokenKind::Bool(true),
        "false" => TokenKind::Bool(false),
        "null" => TokenKind::Null,
        _ => TokenKind::Ident(ident),
    }
}
