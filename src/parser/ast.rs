use std::rc::Rc;

/// The statements of one scope, executed in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain(Vec<Statement>);

impl Chain {
    pub fn new() -> Self {
        Self(vec![])
    }

    /// Places every statement of `next` after the last statement of `self`.
    pub fn append(mut self, next: Chain) -> Chain {
        if self.0.is_empty() {
            return next;
        }
        self.0.extend(next.0);
        self
    }

    pub fn statements(&self) -> &[Statement] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Statement>> for Chain {
    fn from(value: Vec<Statement>) -> Self {
        Self(value)
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Chain),
    If(Expression, Box<Statement>, Option<Box<Statement>>),
    While(Expression, Box<Statement>),
    Auto(String, Expression),
    Assign(String, Expression),
    Write(Expression),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(String),
    Number(i32),
    Boolean(bool),
    Arithmetic(ArithmeticOp, Box<(Expression, Expression)>),
    Comparison(ComparisonOp, Box<(Expression, Expression)>),
    Logical(BooleanOp, Box<(Expression, Expression)>),
    Negation(Box<Expression>),
    Not(Box<Expression>),
    Read,
    Return(Box<Expression>),
    Lambda(String, Rc<Statement>),
    Call(Box<(Expression, Expression)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
}

impl std::fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        };
        f.write_str(symbol)
    }
}

impl std::fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        };
        f.write_str(symbol)
    }
}

impl std::fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => f.write_str("and"),
            Self::Or => f.write_str("or"),
        }
    }
}

/// A structural child of a syntax tree node, as seen by the tree printer.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Statement(&'a Statement),
    Expression(&'a Expression),
    Chain(&'a Chain),
    Parameter(&'a str),
}

impl Statement {
    pub fn label(&self) -> String {
        match self {
            Self::Block(_) => "Block `{ <stmt> }`".to_string(),
            Self::If(_, _, None) => "IfStmt `if <expr> { <stmt> }`".to_string(),
            Self::If(_, _, Some(_)) => {
                "IfStmt `ifelse <expr> { <stmt> } { <stmt> }`".to_string()
            }
            Self::While(..) => "WhileStmt `while <expr> { <stmt> }`".to_string(),
            Self::Auto(..) => "AutoStmt `auto <var> := <expr>`".to_string(),
            Self::Assign(..) => "AssignStmt `<var> := <expr>`".to_string(),
            Self::Write(_) => "Write `write <expr>`".to_string(),
            Self::Expression(_) => "ExprStmt `<expr>`".to_string(),
        }
    }

    pub fn children(&self) -> Vec<Node<'_>> {
        match self {
            Self::Block(body) => vec![Node::Chain(body)],
            Self::If(condition, then_block, else_block) => {
                let mut children = vec![Node::Expression(condition), Node::Statement(then_block)];
                if let Some(else_block) = else_block {
                    children.push(Node::Statement(else_block));
                }
                children
            }
            Self::While(condition, body) => {
                vec![Node::Expression(condition), Node::Statement(body)]
            }
            Self::Auto(name, value) | Self::Assign(name, value) => {
                vec![Node::Parameter(name), Node::Expression(value)]
            }
            Self::Write(value) | Self::Expression(value) => vec![Node::Expression(value)],
        }
    }
}

impl Expression {
    pub fn label(&self) -> String {
        match self {
            Self::Identifier(name) => format!("Identifier `{name}`"),
            Self::Number(n) => format!("Number `{n}`"),
            Self::Boolean(b) => format!("Boolean `{b}`"),
            Self::Arithmetic(op, _) => format!("ArithmeticOp `<left> {op} <right>`"),
            Self::Comparison(op, _) => format!("ComparisonOp `<left> {op} <right>`"),
            Self::Logical(op, _) => format!("BooleanOp `<left> {op} <right>`"),
            Self::Negation(_) => "NegationOp `- <right>`".to_string(),
            Self::Not(_) => "NotOp `not <right>`".to_string(),
            Self::Read => "Read".to_string(),
            Self::Return(_) => "ReturnExpr `ret := <expr>`".to_string(),
            Self::Lambda(..) => "Lambda `lambda <var> { <stmt> }`".to_string(),
            Self::Call(_) => "Call `<fun> @ <arg>`".to_string(),
        }
    }

    pub fn children(&self) -> Vec<Node<'_>> {
        match self {
            Self::Identifier(_) | Self::Number(_) | Self::Boolean(_) | Self::Read => vec![],
            Self::Arithmetic(_, operands)
            | Self::Comparison(_, operands)
            | Self::Logical(_, operands)
            | Self::Call(operands) => {
                let (left, right) = operands.as_ref();
                vec![Node::Expression(left), Node::Expression(right)]
            }
            Self::Negation(operand) | Self::Not(operand) | Self::Return(operand) => {
                vec![Node::Expression(operand)]
            }
            Self::Lambda(param, body) => vec![Node::Parameter(param), Node::Statement(body)],
        }
    }
}
