mod parser;
pub use parser::{
    parse, parse_tokens, print_tree, tokenize_file, tokenize_string, Chain, Error as SyntaxError,
    Expression, Location, ParserState, Span, Statement, Token, TokenType, Tokenizer,
};

mod interpreter;
pub use interpreter::{Closure, Config, Interpreter, LineReader, RuntimeError, SymbolTable, Value};
