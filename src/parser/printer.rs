use std::fmt::Write;

use super::ast::{Chain, Expression, Node, Statement};

/// Renders a program as an indented tree, one node per line.
///
/// Statements are marked `+--`, expressions `*--`; every statement sequence
/// ends with its `NullStmt` terminator. Children sit one level deeper than
/// their parent, except the body of a lambda, which stays at the lambda's level.
pub fn print_tree(chain: &Chain) -> String {
    let mut out = String::new();
    print_chain(chain, 0, &mut out);
    out.trim().to_string()
}

fn print_chain(chain: &Chain, tabs: usize, out: &mut String) {
    for statement in chain {
        print_statement(statement, tabs, out);
    }
    line(out, tabs, "+--", "NullStmt `null`");
}

fn print_statement(statement: &Statement, tabs: usize, out: &mut String) {
    line(out, tabs, "+--", &statement.label());
    for child in statement.children() {
        print_node(child, tabs + 1, out);
    }
}

fn print_expression(expression: &Expression, tabs: usize, out: &mut String) {
    line(out, tabs, "*--", &expression.label());
    for child in expression.children() {
        // a lambda body lines up with the lambda itself
        let depth = match child {
            Node::Statement(_) => tabs,
            _ => tabs + 1,
        };
        print_node(child, depth, out);
    }
}

fn print_node(node: Node, tabs: usize, out: &mut String) {
    match node {
        Node::Statement(statement) => print_statement(statement, tabs, out),
        Node::Expression(expression) => print_expression(expression, tabs, out),
        Node::Chain(chain) => print_chain(chain, tabs, out),
        Node::Parameter(name) => line(out, tabs, "*--", &format!("Identifier `{name}`")),
    }
}

fn line(out: &mut String, tabs: usize, marker: &str, label: &str) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}{marker}{label}", "|   ".repeat(tabs));
}
