use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;

fn parse_tree_matches(input: &str, expected: Vec<Statement>) {
    match parse(input) {
        Ok(chain) => assert_eq!(chain, Chain::from(expected), "\nFailed to parse \"{input}\""),
        Err(e) => panic!("\nFailed to parse \"{input}\": {e}"),
    }
}

fn parses_alike(input: &str, other: &str) {
    assert_eq!(parse(input), parse(other));
}

fn assert_raises_error(input: &str, msg: &str, line: usize, column: usize) {
    match parse(input) {
        Ok(chain) => panic!("\nExpected \"{input}\" to fail, parsed {chain:?}"),
        Err(e) => {
            assert_eq!(e.message(), msg);
            assert_eq!(e.span().start(), Location::new(line, column));
        }
    }
}

fn tree_prints_as(input: &str, expected: &str) {
    let chain = parse(input).unwrap();
    assert_eq!(print_tree(&chain), expected.trim());
}

fn num(n: i32) -> Expression {
    Expression::Number(n)
}

fn name(id: &str) -> Expression {
    Expression::Identifier(id.to_string())
}

fn arith(op: ArithmeticOp, left: Expression, right: Expression) -> Expression {
    Expression::Arithmetic(op, Box::new((left, right)))
}

fn call(callee: Expression, argument: Expression) -> Expression {
    Expression::Call(Box::new((callee, argument)))
}

fn block(statements: Vec<Statement>) -> Statement {
    Statement::Block(Chain::from(statements))
}

#[test]
fn test_tokens() {
    let tokens = tokenize_string("auto x1 := 12; # comment\nwrite x1 <= -3;").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| (t.typ(), t.lexeme())).collect();
    assert_eq!(
        kinds,
        vec![
            (TokenType::KEYWORD, "auto"),
            (TokenType::NAME, "x1"),
            (TokenType::COLONEQUAL, ":="),
            (TokenType::NUMBER, "12"),
            (TokenType::SEMI, ";"),
            (TokenType::KEYWORD, "write"),
            (TokenType::NAME, "x1"),
            (TokenType::LESSEQUAL, "<="),
            (TokenType::MINUS, "-"),
            (TokenType::NUMBER, "3"),
            (TokenType::SEMI, ";"),
            (TokenType::ENDMARKER, ""),
        ]
    );
    assert_eq!(tokens[1].span().start(), Location::new(1, 6));
    assert_eq!(tokens[1].span().end(), Location::new(1, 8));
    assert_eq!(tokens[6].span().start(), Location::new(2, 7));
}

#[test]
fn test_keywords_need_a_word_boundary() {
    let tokens = tokenize_string("ifelse if iffy auto_x writer").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| (t.typ(), t.lexeme())).collect();
    assert_eq!(
        kinds,
        vec![
            (TokenType::KEYWORD, "ifelse"),
            (TokenType::KEYWORD, "if"),
            (TokenType::NAME, "iffy"),
            (TokenType::NAME, "auto_x"),
            (TokenType::NAME, "writer"),
            (TokenType::ENDMARKER, ""),
        ]
    );
}

#[test]
fn test_tokenizer_errors() {
    let e = tokenize_string("auto x := $;").unwrap_err();
    assert_eq!(e.message(), "invalid character `$`");
    assert_eq!(e.span().start(), Location::new(1, 11));
    assert_eq!(e.to_string(), "invalid character `$` at line 1, column 11");

    let e = tokenize_string("write 1;\nwrite 99999999999;").unwrap_err();
    assert_eq!(e.message(), "number literal out of range");
    assert_eq!(e.span().start(), Location::new(2, 7));
}

fn with_script<T>(label: &str, contents: &[u8], check: impl FnOnce(&std::path::Path) -> T) -> T {
    let path = std::env::temp_dir().join(format!("brain-{label}-{}.bn", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    let result = check(&path);
    std::fs::remove_file(&path).unwrap();
    result
}

#[test]
fn test_tokenize_file() {
    let tokens = with_script("valid", b"write 1;\nwrite 2;\n", |path| tokenize_file(path)).unwrap();
    assert_eq!(parse_tokens(&tokens).unwrap().len(), 2);

    let e = with_script("invalid-utf8", b"write 1;\nwrite \xff 2;\nwrite 3;\n", |path| {
        tokenize_file(path)
    })
    .unwrap_err();
    assert!(e.message().starts_with("cannot read"), "{e}");

    let missing = std::env::temp_dir().join("brain-no-such-script.bn");
    assert!(tokenize_file(missing).unwrap_err().message().starts_with("cannot read"));
}

#[test]
fn test_continuation() {
    let mut tokenizer = Tokenizer::new();
    let state = tokenizer.tokenize(["auto f := lambda x {".to_string()].into_iter());
    assert!(matches!(state, ParserState::ContinuationNeeded));
    let state = tokenizer.tokenize(["  ret := (x".to_string()].into_iter());
    assert!(matches!(state, ParserState::ContinuationNeeded));
    let state = tokenizer.tokenize([" + 1); };".to_string()].into_iter());
    assert!(matches!(state, ParserState::Ok));
    let chain = parse_tokens(&tokenizer.finalize()).unwrap();
    assert_eq!(chain.len(), 1);

    let mut tokenizer = Tokenizer::new();
    let state = tokenizer.tokenize(["write 1; }".to_string()].into_iter());
    assert!(matches!(state, ParserState::Ok));
}

#[test]
fn test_simple_statements() {
    parse_tree_matches(
        "auto x := 5; write x;",
        vec![
            Statement::Auto("x".to_string(), num(5)),
            Statement::Write(name("x")),
        ],
    );
    parse_tree_matches("x := 1;", vec![Statement::Assign("x".to_string(), num(1))]);
    parse_tree_matches("", vec![]);
    parse_tree_matches("# nothing but a comment", vec![]);
}

#[test]
fn test_expression_statements() {
    parse_tree_matches(
        "f @ 1; f @ 2 write 3;",
        vec![
            Statement::Expression(call(name("f"), num(1))),
            Statement::Expression(call(name("f"), num(2))),
            Statement::Write(num(3)),
        ],
    );
    parse_tree_matches("read", vec![Statement::Expression(Expression::Read)]);
}

#[test]
fn test_blocks_and_control_flow() {
    parse_tree_matches(
        "{ auto x := 2; { } }",
        vec![block(vec![
            Statement::Auto("x".to_string(), num(2)),
            block(vec![]),
        ])],
    );
    parse_tree_matches(
        "if true { write 1; }",
        vec![Statement::If(
            Expression::Boolean(true),
            Box::new(block(vec![Statement::Write(num(1))])),
            None,
        )],
    );
    parse_tree_matches(
        "ifelse false { } { write 2; }",
        vec![Statement::If(
            Expression::Boolean(false),
            Box::new(block(vec![])),
            Some(Box::new(block(vec![Statement::Write(num(2))]))),
        )],
    );
    parse_tree_matches(
        "while x { x := false; }",
        vec![Statement::While(
            name("x"),
            Box::new(block(vec![Statement::Assign(
                "x".to_string(),
                Expression::Boolean(false),
            )])),
        )],
    );
}

#[test]
fn test_sums_are_left_associative() {
    parse_tree_matches(
        "write 1 - 2 - 3;",
        vec![Statement::Write(arith(
            ArithmeticOp::Sub,
            arith(ArithmeticOp::Sub, num(1), num(2)),
            num(3),
        ))],
    );
    parse_tree_matches(
        "write 1 + 2 * 3;",
        vec![Statement::Write(arith(
            ArithmeticOp::Add,
            num(1),
            arith(ArithmeticOp::Mul, num(2), num(3)),
        ))],
    );
    parse_tree_matches(
        "write (1 + 2) * 3;",
        vec![Statement::Write(arith(
            ArithmeticOp::Mul,
            arith(ArithmeticOp::Add, num(1), num(2)),
            num(3),
        ))],
    );
}

#[test]
fn test_products_group_to_the_right() {
    parse_tree_matches(
        "write 8 / 4 / 2;",
        vec![Statement::Write(arith(
            ArithmeticOp::Div,
            num(8),
            arith(ArithmeticOp::Div, num(4), num(2)),
        ))],
    );
    parse_tree_matches(
        "write 2 * 3 / 4 - 1;",
        vec![Statement::Write(arith(
            ArithmeticOp::Sub,
            arith(
                ArithmeticOp::Mul,
                num(2),
                arith(ArithmeticOp::Div, num(3), num(4)),
            ),
            num(1),
        ))],
    );
    parses_alike("write a * b * c;", "write a * (b * c);");
}

#[test]
fn test_operator_precedence() {
    parses_alike("write a or b and c;", "write a or (b and c);");
    parses_alike("write a and b == c;", "write a and (b == c);");
    parses_alike("write a == b < c;", "write a == (b < c);");
    parses_alike("write a < b + c;", "write a < (b + c);");
    parses_alike("write -a * b;", "write (-a) * b;");
    parses_alike("write not a and b;", "write (not a) and b;");
    parses_alike("write 1 = 2;", "write 1 == 2;");
}

#[test]
fn test_unary_operators() {
    parse_tree_matches(
        "write - - 1;",
        vec![Statement::Write(Expression::Negation(Box::new(
            Expression::Negation(Box::new(num(1))),
        )))],
    );
    parse_tree_matches(
        "write not true;",
        vec![Statement::Write(Expression::Not(Box::new(
            Expression::Boolean(true),
        )))],
    );
}

#[test]
fn test_calls() {
    parse_tree_matches(
        "write f @ g @ 1;",
        vec![Statement::Write(call(name("f"), call(name("g"), num(1))))],
    );
    parse_tree_matches(
        "write f @ 1 + 2;",
        vec![Statement::Write(call(
            name("f"),
            arith(ArithmeticOp::Add, num(1), num(2)),
        ))],
    );
    parse_tree_matches(
        "write 1 + f @ 2;",
        vec![Statement::Write(arith(
            ArithmeticOp::Add,
            num(1),
            call(name("f"), num(2)),
        ))],
    );
}

#[test]
fn test_lambda_and_return() {
    let body = block(vec![Statement::Expression(Expression::Return(Box::new(
        arith(ArithmeticOp::Mul, name("y"), num(2)),
    )))]);
    parse_tree_matches(
        "auto f := lambda y { ret := y * 2; };",
        vec![Statement::Auto(
            "f".to_string(),
            Expression::Lambda("y".to_string(), Rc::new(body)),
        )],
    );
    parse_tree_matches(
        "ret := 1;",
        vec![Statement::Expression(Expression::Return(Box::new(num(1))))],
    );
}

#[test]
fn test_syntax_errors() {
    assert_raises_error("auto x := ;", "unexpected `auto`", 1, 1);
    assert_raises_error("auto x := 1;\nwrite x +;", "unexpected `write`", 2, 1);
    assert_raises_error("write 1; }", "unexpected `}`", 1, 10);
    assert_raises_error("write 1", "unexpected `write`", 1, 1);
    assert_raises_error("lambda { }", "unexpected `lambda`", 1, 1);
    assert_raises_error("auto x := 1; )", "unexpected `)`", 1, 14);
}

#[test]
fn test_chain_append() {
    let first = parse("auto x := 1;").unwrap();
    let second = parse("write x; write x;").unwrap();
    let joined = first.clone().append(second.clone());
    assert_eq!(joined.len(), 3);
    assert_eq!(joined.statements()[0], first.statements()[0]);
    assert_eq!(Chain::new().append(second.clone()), second);
    assert_eq!(second.clone().append(Chain::new()), second);
}

#[test]
fn test_print_tree() {
    tree_prints_as(
        "auto x := 5; write x;",
        r"
+--AutoStmt `auto <var> := <expr>`
|   *--Identifier `x`
|   *--Number `5`
+--Write `write <expr>`
|   *--Identifier `x`
+--NullStmt `null`
",
    );
    tree_prints_as(
        "auto f := lambda y { ret := y * 2; };",
        r"
+--AutoStmt `auto <var> := <expr>`
|   *--Identifier `f`
|   *--Lambda `lambda <var> { <stmt> }`
|   |   *--Identifier `y`
|   +--Block `{ <stmt> }`
|   |   +--ExprStmt `<expr>`
|   |   |   *--ReturnExpr `ret := <expr>`
|   |   |   |   *--ArithmeticOp `<left> * <right>`
|   |   |   |   |   *--Identifier `y`
|   |   |   |   |   *--Number `2`
|   |   +--NullStmt `null`
+--NullStmt `null`
",
    );
    tree_prints_as(
        "ifelse a = 1 { } { write not a; }",
        r"
+--IfStmt `ifelse <expr> { <stmt> } { <stmt> }`
|   *--ComparisonOp `<left> == <right>`
|   |   *--Identifier `a`
|   |   *--Number `1`
|   +--Block `{ <stmt> }`
|   |   +--NullStmt `null`
|   +--Block `{ <stmt> }`
|   |   +--Write `write <expr>`
|   |   |   *--NotOp `not <right>`
|   |   |   |   *--Identifier `a`
|   |   +--NullStmt `null`
+--NullStmt `null`
",
    );
    tree_prints_as("", "+--NullStmt `null`");
}
