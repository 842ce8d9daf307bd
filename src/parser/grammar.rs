// # ========================= START OF THE GRAMMAR =========================
// #
// # * Strings with single quotes (') denote KEYWORDS or symbols
// # * Upper case names (NAME) denote token kinds of the tokenizer
// # * Each rule below binds tighter than the one before it. Binary operators
// #   are left-associative, except `*` and `/` which group to the right.

use std::rc::Rc;

use super::ast::*;
use super::combinators::*;
use super::error::Error;
use super::locations::Span;
use super::tokenizer::{Token, TokenType as TT};

static EQUALITY_OPS: &[(TT, ComparisonOp)] = &[
    (TT::EQEQUAL, ComparisonOp::Eq),
    (TT::EQUAL, ComparisonOp::Eq),
    (TT::NOTEQUAL, ComparisonOp::Ne),
];
static COMPARISON_OPS: &[(TT, ComparisonOp)] = &[
    (TT::LESS, ComparisonOp::Lt),
    (TT::LESSEQUAL, ComparisonOp::Le),
    (TT::GREATER, ComparisonOp::Gt),
    (TT::GREATEREQUAL, ComparisonOp::Ge),
];
static SUM_OPS: &[(TT, ArithmeticOp)] = &[(TT::PLUS, ArithmeticOp::Add), (TT::MINUS, ArithmeticOp::Sub)];
static TERM_OPS: &[(TT, ArithmeticOp)] = &[(TT::STAR, ArithmeticOp::Mul), (TT::SLASH, ArithmeticOp::Div)];

// # STARTING RULES
// # ==============
// program: statement* ENDMARKER
pub(crate) fn parse(input: &[Token]) -> Result<Chain, Error> {
    let ParseResult::Ok((chain, rest)) = statements(input) else {
        return Err(unexpected(input));
    };
    match rest.first() {
        Some(token) if token.typ == TT::ENDMARKER => Ok(chain),
        _ => Err(unexpected(rest)),
    }
}

fn unexpected(rest: &[Token]) -> Error {
    match rest.first() {
        Some(token) => Error::new(token.span, &format!("unexpected {}", token.describe())),
        None => Error::new(Span::default(), "unexpected end of input"),
    }
}

// # STATEMENTS
// # ==========

// statements: statement*
fn statements(input: ParserInput) -> ParseResult<Chain> {
    zero_or_more(statement).map(Chain::from).parse(input)
}

// statement:
//     | auto_stmt
//     | assign_stmt
//     | write_stmt
//     | if_stmt
//     | ifelse_stmt
//     | while_stmt
//     | block
//     | expression [';']
fn statement(input: ParserInput) -> ParseResult<Statement> {
    auto_stmt
        .or(assign_stmt)
        .or(write_stmt)
        .or(if_stmt)
        .or(ifelse_stmt)
        .or(while_stmt)
        .or(block)
        .or(left(expression, maybe(tok(TT::SEMI))).map(Statement::Expression))
        .parse(input)
}

// block: '{' statement* '}'
fn block(input: ParserInput) -> ParseResult<Statement> {
    right(tok(TT::LBRACE), left(statements, tok(TT::RBRACE)))
        .map(Statement::Block)
        .parse(input)
}

// auto_stmt: 'auto' NAME ':=' expression ';'
fn auto_stmt(input: ParserInput) -> ParseResult<Statement> {
    right(keyword("auto"), binding)
        .map(|(name, value)| Statement::Auto(name, value))
        .parse(input)
}

// assign_stmt: NAME ':=' expression ';'
fn assign_stmt(input: ParserInput) -> ParseResult<Statement> {
    binding
        .map(|(name, value)| Statement::Assign(name, value))
        .parse(input)
}

fn binding(input: ParserInput) -> ParseResult<(String, Expression)> {
    pair(
        left(tok(TT::NAME), tok(TT::COLONEQUAL)),
        left(expression, tok(TT::SEMI)),
    )
    .map(|(name, value)| (name.lexeme.clone(), value))
    .parse(input)
}

// write_stmt: 'write' expression ';'
fn write_stmt(input: ParserInput) -> ParseResult<Statement> {
    right(keyword("write"), left(expression, tok(TT::SEMI)))
        .map(Statement::Write)
        .parse(input)
}

// if_stmt: 'if' expression block
fn if_stmt(input: ParserInput) -> ParseResult<Statement> {
    right(keyword("if"), pair(expression, block))
        .map(|(condition, then_block)| Statement::If(condition, Box::new(then_block), None))
        .parse(input)
}

// ifelse_stmt: 'ifelse' expression block block
fn ifelse_stmt(input: ParserInput) -> ParseResult<Statement> {
    right(keyword("ifelse"), pair(expression, pair(block, block)))
        .map(|(condition, (then_block, else_block))| {
            Statement::If(condition, Box::new(then_block), Some(Box::new(else_block)))
        })
        .parse(input)
}

// while_stmt: 'while' expression block
fn while_stmt(input: ParserInput) -> ParseResult<Statement> {
    right(keyword("while"), pair(expression, block))
        .map(|(condition, body)| Statement::While(condition, Box::new(body)))
        .parse(input)
}

// # EXPRESSIONS
// # ===========

// expression: disjunction
fn expression(input: ParserInput) -> ParseResult<Expression> {
    disjunction(input)
}

// disjunction: conjunction ('or' conjunction)*
fn disjunction(input: ParserInput) -> ParseResult<Expression> {
    pair(conjunction, zero_or_more(right(keyword("or"), conjunction)))
        .map(|(first, rest)| {
            rest.into_iter().fold(first, |left, right| {
                Expression::Logical(BooleanOp::Or, Box::new((left, right)))
            })
        })
        .parse(input)
}

// conjunction: equality ('and' equality)*
fn conjunction(input: ParserInput) -> ParseResult<Expression> {
    pair(equality, zero_or_more(right(keyword("and"), equality)))
        .map(|(first, rest)| {
            rest.into_iter().fold(first, |left, right| {
                Expression::Logical(BooleanOp::And, Box::new((left, right)))
            })
        })
        .parse(input)
}

// equality: comparison (('==' | '=' | '!=') comparison)*
fn equality(input: ParserInput) -> ParseResult<Expression> {
    pair(comparison, zero_or_more(pair(operator(EQUALITY_OPS), comparison)))
        .map(|(first, rest)| fold_left(first, rest, Expression::Comparison))
        .parse(input)
}

// comparison: sum (('<' | '<=' | '>' | '>=') sum)*
fn comparison(input: ParserInput) -> ParseResult<Expression> {
    pair(sum, zero_or_more(pair(operator(COMPARISON_OPS), sum)))
        .map(|(first, rest)| fold_left(first, rest, Expression::Comparison))
        .parse(input)
}

// sum: term (('+' | '-') term)*
fn sum(input: ParserInput) -> ParseResult<Expression> {
    pair(term, zero_or_more(pair(operator(SUM_OPS), term)))
        .map(|(first, rest)| fold_left(first, rest, Expression::Arithmetic))
        .parse(input)
}

// term: unary [('*' | '/') term]
fn term(input: ParserInput) -> ParseResult<Expression> {
    pair(unary, maybe(pair(operator(TERM_OPS), term)))
        .map(|(left, rest)| match rest {
            Some((op, right)) => Expression::Arithmetic(op, Box::new((left, right))),
            None => left,
        })
        .parse(input)
}

fn fold_left<Op>(
    first: Expression,
    rest: Vec<(Op, Expression)>,
    build: fn(Op, Box<(Expression, Expression)>) -> Expression,
) -> Expression {
    rest.into_iter()
        .fold(first, |left, (op, right)| build(op, Box::new((left, right))))
}

// unary: 'not' unary | '-' unary | call
fn unary(input: ParserInput) -> ParseResult<Expression> {
    right(keyword("not"), unary)
        .map(|operand| Expression::Not(Box::new(operand)))
        .or(right(tok(TT::MINUS), unary).map(|operand| Expression::Negation(Box::new(operand))))
        .or(call)
        .parse(input)
}

// call:
//     | 'lambda' NAME block
//     | 'read'
//     | 'ret' ':=' expression ';'
//     | primary ['@' expression]
fn call(input: ParserInput) -> ParseResult<Expression> {
    lambda
        .or(keyword("read").map(|_| Expression::Read))
        .or(return_expr)
        .or(application)
        .parse(input)
}

fn lambda(input: ParserInput) -> ParseResult<Expression> {
    right(keyword("lambda"), pair(tok(TT::NAME), block))
        .map(|(param, body)| Expression::Lambda(param.lexeme.clone(), Rc::new(body)))
        .parse(input)
}

fn return_expr(input: ParserInput) -> ParseResult<Expression> {
    right(
        pair(keyword("ret"), tok(TT::COLONEQUAL)),
        left(expression, tok(TT::SEMI)),
    )
    .map(|value| Expression::Return(Box::new(value)))
    .parse(input)
}

fn application(input: ParserInput) -> ParseResult<Expression> {
    pair(primary, maybe(right(tok(TT::AT), expression)))
        .map(|(callee, argument)| match argument {
            Some(argument) => Expression::Call(Box::new((callee, argument))),
            None => callee,
        })
        .parse(input)
}

// primary: NAME | NUMBER | 'true' | 'false' | '(' expression ')'
fn primary(input: ParserInput) -> ParseResult<Expression> {
    tok(TT::NAME)
        .map(|name| Expression::Identifier(name.lexeme.clone()))
        .or(number)
        .or(keyword("true").map(|_| Expression::Boolean(true)))
        .or(keyword("false").map(|_| Expression::Boolean(false)))
        .or(right(tok(TT::LPAR), left(expression, tok(TT::RPAR))))
        .parse(input)
}

fn number(input: ParserInput) -> ParseResult<Expression> {
    tok(TT::NUMBER)
        .parse(input)
        .and_then(|(token, rest)| match token.lexeme.parse() {
            Ok(n) => ParseResult::Ok((Expression::Number(n), rest)),
            Err(_) => ParseResult::Err,
        })
}
