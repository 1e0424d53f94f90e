//! Permission expression parser.
//!
//! Recursive descent over the token stream produced by the lexer.
//!
//! Precedence, highest to lowest:
//! 1. unary `!`
//! 2. comparison (`==`, `!=`, `<`, `<=`, `>`, `>=`)
//! 3. `&&`
//! 4. `||`

use super::ast::{BinaryOp, Expression, Literal, UnaryOp};
use super::error::SyntaxError;
use super::lexer::{tokenize, Token, TokenKind};

/// A parsed permission expression.
///
/// # Example
/// ```
/// use actix_permission_core::http::security::expression::CompiledExpression;
///
/// let expr = CompiledExpression::parse("hasRole('admin') || hasPermission('user:edit')").unwrap();
/// assert_eq!(expr.source(), "hasRole('admin') || hasPermission('user:edit')");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    /// The original expression string
    source: String,
    /// The parsed AST
    ast: Expression,
}

impl CompiledExpression {
    /// Parses an expression string.
    ///
    /// Either the whole input is consumed into an AST or a `SyntaxError`
    /// names the offending token and its position.
    pub fn parse(expr: &str) -> Result<Self, SyntaxError> {
        let tokens = tokenize(expr)?;
        if tokens.is_empty() {
            return Err(SyntaxError::new(0, "empty expression"));
        }

        let ast = Parser::new(tokens, expr.chars().count()).parse()?;

        Ok(CompiledExpression {
            source: expr.to_string(),
            ast,
        })
    }

    /// Returns the original expression string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns a reference to the parsed AST.
    pub fn ast(&self) -> &Expression {
        &self.ast
    }

    /// Consumes self and returns the AST.
    pub fn into_ast(self) -> Expression {
        self.ast
    }
}

/// Deepest AST accepted, and deepest `(`/`!`/call nesting while parsing.
///
/// Parsing, evaluation and dropping all recurse over the tree, so input
/// deeper than this is a syntax error rather than a stack overflow.
pub(crate) const MAX_DEPTH: usize = 128;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Position reported for errors at end of input.
    end: usize,
    /// Open `(`, `!` and call frames.
    nesting: usize,
}

/// A parsed subtree and its height.
type Parsed = (Expression, usize);

impl Parser {
    fn new(tokens: Vec<Token>, end: usize) -> Self {
        Parser {
            tokens,
            pos: 0,
            end,
            nesting: 0,
        }
    }

    fn parse(&mut self) -> Result<Expression, SyntaxError> {
        let (expr, _) = self.parse_or()?;

        if let Some(token) = self.tokens.get(self.pos) {
            return Err(unexpected(token));
        }

        Ok(expr)
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    /// Position of the token about to be consumed.
    fn position(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.position)
    }

    fn eof(&self, expected: &str) -> SyntaxError {
        SyntaxError::new(
            self.end,
            format!("unexpected end of expression, expected {}", expected),
        )
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<(), SyntaxError> {
        match self.tokens.get(self.pos) {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(())
            }
            Some(token) => Err(SyntaxError::new(
                token.position,
                format!("expected {}, found {}", expected, token.kind.describe()),
            )),
            None => Err(self.eof(expected)),
        }
    }

    fn enter(&mut self, position: usize) -> Result<(), SyntaxError> {
        if self.nesting >= MAX_DEPTH {
            return Err(too_deep(position));
        }
        self.nesting += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    /// Parse OR expressions (lowest precedence)
    fn parse_or(&mut self) -> Result<Parsed, SyntaxError> {
        let (mut left, mut height) = self.parse_and()?;

        while matches!(self.peek(), Some(TokenKind::Or)) {
            let position = self.position();
            self.advance();
            let (right, right_height) = self.parse_and()?;
            height = grow(height, right_height, position)?;
            left = Expression::or(left, right);
        }

        Ok((left, height))
    }

    /// Parse AND expressions (higher precedence than OR)
    fn parse_and(&mut self) -> Result<Parsed, SyntaxError> {
        let (mut left, mut height) = self.parse_comparison()?;

        while matches!(self.peek(), Some(TokenKind::And)) {
            let position = self.position();
            self.advance();
            let (right, right_height) = self.parse_comparison()?;
            height = grow(height, right_height, position)?;
            left = Expression::and(left, right);
        }

        Ok((left, height))
    }

    /// Parse comparisons (higher precedence than AND)
    fn parse_comparison(&mut self) -> Result<Parsed, SyntaxError> {
        let (mut left, mut height) = self.parse_unary()?;

        while let Some(op) = self.peek().and_then(comparison_op) {
            let position = self.position();
            self.advance();
            let (right, right_height) = self.parse_unary()?;
            height = grow(height, right_height, position)?;
            left = Expression::binary(left, op, right);
        }

        Ok((left, height))
    }

    /// Parse unary expressions (NOT)
    fn parse_unary(&mut self) -> Result<Parsed, SyntaxError> {
        if matches!(self.peek(), Some(TokenKind::Not)) {
            let position = self.position();
            self.advance();
            self.enter(position)?;
            let (expr, height) = self.parse_unary()?;
            self.leave();
            return Ok((
                Expression::Unary {
                    op: UnaryOp::Not,
                    expr: Box::new(expr),
                },
                grow(height, 0, position)?,
            ));
        }

        self.parse_primary()
    }

    /// Parse primary expressions (literals, variables, functions, groups)
    fn parse_primary(&mut self) -> Result<Parsed, SyntaxError> {
        let Some(token) = self.advance() else {
            return Err(self.eof("an operand"));
        };

        match token.kind {
            TokenKind::Bool(value) => Ok((Expression::Literal(Literal::Bool(value)), 1)),
            TokenKind::Null => Ok((Expression::Literal(Literal::Null), 1)),
            TokenKind::Number(value) => Ok((Expression::Literal(Literal::Number(value)), 1)),
            TokenKind::String(value) => Ok((Expression::Literal(Literal::String(value)), 1)),
            TokenKind::LParen => {
                self.enter(token.position)?;
                let parsed = self.parse_or()?;
                self.leave();
                self.expect(TokenKind::RParen, "')'")?;
                Ok(parsed)
            }
            TokenKind::Variable(name) => self.parse_property_path(name),
            TokenKind::Ident(name) => {
                if !matches!(self.peek(), Some(TokenKind::LParen)) {
                    return Err(SyntaxError::new(
                        token.position,
                        format!("expected '(' after function name '{}'", name),
                    ));
                }
                self.advance();
                self.enter(token.position)?;
                let call = self.parse_function_call(name, token.position)?;
                self.leave();
                Ok(call)
            }
            _ => Err(unexpected(&token)),
        }
    }

    /// Parse `('.' identifier)*` following a context variable
    fn parse_property_path(&mut self, name: String) -> Result<Parsed, SyntaxError> {
        let mut path = Vec::new();

        while matches!(self.peek(), Some(TokenKind::Dot)) {
            self.advance();
            match self.advance() {
                Some(Token {
                    kind: TokenKind::Ident(field),
                    ..
                }) => path.push(field),
                Some(token) => {
                    return Err(SyntaxError::new(
                        token.position,
                        format!("expected field name after '.', found {}", token.kind.describe()),
                    ))
                }
                None => return Err(self.eof("a field name")),
            }
        }

        let variable = Expression::Variable(name);
        if path.is_empty() {
            Ok((variable, 1))
        } else {
            Ok((
                Expression::PropertyAccess {
                    base: Box::new(variable),
                    path,
                },
                2,
            ))
        }
    }

    /// Parse function call arguments; the opening parenthesis is consumed.
    fn parse_function_call(&mut self, name: String, position: usize) -> Result<Parsed, SyntaxError> {
        let mut args = Vec::new();
        let mut height = 0;

        if matches!(self.peek(), Some(TokenKind::RParen)) {
            self.advance();
            return Ok((Expression::FunctionCall { name, args }, 1));
        }

        loop {
            let (arg, arg_height) = self.parse_or()?;
            height = height.max(arg_height);
            args.push(arg);

            match self.advance() {
                Some(Token {
                    kind: TokenKind::Comma,
                    ..
                }) => {}
                Some(Token {
                    kind: TokenKind::RParen,
                    ..
                }) => break,
                Some(token) => {
                    return Err(SyntaxError::new(
                        token.position,
                        format!("expected ',' or ')', found {}", token.kind.describe()),
                    ))
                }
                None => return Err(self.eof("')'")),
            }
        }

        Ok((
            Expression::FunctionCall { name, args },
            grow(height, 0, position)?,
        ))
    }
}

/// Height of a node over children of the given heights.
fn grow(left: usize, right: usize, position: usize) -> Result<usize, SyntaxError> {
    let height = left.max(right) + 1;
    if height > MAX_DEPTH {
        return Err(too_deep(position));
    }
    Ok(height)
}

fn too_deep(position: usize) -> SyntaxError {
    SyntaxError::new(position, "expression nested too deeply")
}

fn comparison_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::Neq => Some(BinaryOp::Neq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Le => Some(BinaryOp::Le),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::Ge => Some(BinaryOp::Ge),
        _ => None,
    }
}

fn unexpected(token: &Token) -> SyntaxError {
    SyntaxError::new(
        token.position,
        format!("unexpected token {}", token.kind.describe()),
    )
}
