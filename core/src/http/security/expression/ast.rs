//! Abstract Syntax Tree for permission expressions.

/// Binary operators for combining expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Logical AND (both must be true)
    And,
    /// Logical OR (at least one must be true)
    Or,
    /// Structural equality
    Eq,
    /// Structural inequality
    Neq,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
}

impl BinaryOp {
    /// Returns true for the comparison operators.
    pub fn is_comparison(self) -> bool {
        !matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// Source form of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

/// Unary operators for modifying expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical NOT (inverts the result)
    Not,
}

/// A literal value written directly in the expression text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

/// A permission expression AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal (`true`, `42`, `'admin'`, `null`)
    Literal(Literal),

    /// A context variable
    /// e.g., `#target` -> Variable("target")
    Variable(String),

    /// A property path read from a context variable
    /// e.g., `#currentUser.deptId` -> PropertyAccess(Variable("currentUser"), ["deptId"])
    PropertyAccess {
        base: Box<Expression>,
        path: Vec<String>,
    },

    /// A function call with name and arguments
    /// e.g., `hasRole('ADMIN')` -> FunctionCall("hasRole", [Literal("ADMIN")])
    FunctionCall { name: String, args: Vec<Expression> },

    /// A binary operation combining two expressions
    /// e.g., `hasRole('ADMIN') && hasPermission('user:edit')`
    Binary {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
    },

    /// A unary operation on an expression
    /// e.g., `!hasRole('GUEST')`
    Unary { op: UnaryOp, expr: Box<Expression> },
}

impl Expression {
    /// Creates a string literal.
    pub fn string(value: impl Into<String>) -> Self {
        Expression::Literal(Literal::String(value.into()))
    }

    /// Creates a boolean literal.
    pub fn boolean(value: bool) -> Self {
        Expression::Literal(Literal::Bool(value))
    }

    /// Creates a variable reference.
    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    /// Creates a new function call expression.
    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            args,
        }
    }

    /// Creates a new binary expression.
    pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates a new AND expression.
    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::binary(left, BinaryOp::And, right)
    }

    /// Creates a new OR expression.
    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::binary(left, BinaryOp::Or, right)
    }

    /// Creates a new NOT expression.
    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expression) -> Self {
        Expression::Unary {
            op: UnaryOp::Not,
            expr: Box::new(expr),
        }
    }

    /// Calls `visit` on this node and every node below it, parents first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Expression)) {
        visit(self);
        match self {
            Expression::Literal(_) | Expression::Variable(_) => {}
            Expression::PropertyAccess { base, .. } => base.walk(visit),
            Expression::FunctionCall { args, .. } => {
                for arg in args {
                    arg.walk(visit);
                }
            }
            Expression::Binary { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            Expression::Unary { expr, .. } => expr.walk(visit),
        }
    }
}
