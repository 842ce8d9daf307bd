mod ast;
mod combinators;
mod error;
mod grammar;
mod locations;
mod printer;
mod tokenizer;

pub use ast::*;
pub use error::Error;
pub use locations::{Location, Span};
pub use printer::print_tree;
pub use tokenizer::{tokenize_file, tokenize_string, ParserState, Token, TokenType, Tokenizer};

/// Tokenizes and parses a complete program.
pub fn parse(source: &str) -> Result<Chain, Error> {
    let tokens = tokenize_string(source)?;
    parse_tokens(&tokens)
}

/// Parses a token stream that ends with [`TokenType::ENDMARKER`].
pub fn parse_tokens(tokens: &[Token]) -> Result<Chain, Error> {
    grammar::parse(tokens)
}

#[cfg(test)]
mod test;
