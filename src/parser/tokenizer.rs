use super::error::Error;
use super::locations::Span;
use const_format::concatcp;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

#[derive(Clone, Default, Debug, PartialEq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    pub(crate) span: Span,
}

impl Token {
    pub fn typ(&self) -> TokenType {
        self.typ
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn describe(&self) -> String {
        match self.typ {
            TokenType::ENDMARKER => "end of input".to_string(),
            _ => format!("`{}`", self.lexeme),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenType {
    ENDMARKER,
    NAME,
    NUMBER,
    KEYWORD,
    LPAR,
    RPAR,
    LBRACE,
    RBRACE,
    SEMI,
    AT,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    LESS,
    GREATER,
    EQUAL,
    EQEQUAL,
    NOTEQUAL,
    LESSEQUAL,
    GREATEREQUAL,
    COLONEQUAL,
    ERRORTOKEN,
}

impl Default for TokenType {
    fn default() -> Self {
        Self::ERRORTOKEN
    }
}

const COLONEQUAL: (&str, TokenType) = (":=", TokenType::COLONEQUAL);
const LESSEQUAL: (&str, TokenType) = ("<=", TokenType::LESSEQUAL);
const GREATEREQUAL: (&str, TokenType) = (">=", TokenType::GREATEREQUAL);
const EQEQUAL: (&str, TokenType) = ("==", TokenType::EQEQUAL);
const NOTEQUAL: (&str, TokenType) = ("!=", TokenType::NOTEQUAL);
const LPAR: (&str, TokenType) = ("(", TokenType::LPAR);
const RPAR: (&str, TokenType) = (")", TokenType::RPAR);
const LBRACE: (&str, TokenType) = ("{", TokenType::LBRACE);
const RBRACE: (&str, TokenType) = ("}", TokenType::RBRACE);
const SEMI: (&str, TokenType) = (";", TokenType::SEMI);
const AT: (&str, TokenType) = ("@", TokenType::AT);
const PLUS: (&str, TokenType) = ("+", TokenType::PLUS);
const MINUS: (&str, TokenType) = ("-", TokenType::MINUS);
const STAR: (&str, TokenType) = ("*", TokenType::STAR);
const SLASH: (&str, TokenType) = ("/", TokenType::SLASH);
const LESS: (&str, TokenType) = ("<", TokenType::LESS);
const GREATER: (&str, TokenType) = (">", TokenType::GREATER);
const EQUAL: (&str, TokenType) = ("=", TokenType::EQUAL);

// Two-character symbols first, so `<=` never splits into `<` `=`.
const SIMPLE_TOKENS: [(&str, TokenType); 18] = [
    COLONEQUAL,
    LESSEQUAL,
    GREATEREQUAL,
    EQEQUAL,
    NOTEQUAL,
    LPAR,
    RPAR,
    LBRACE,
    RBRACE,
    SEMI,
    AT,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    LESS,
    GREATER,
    EQUAL,
];

macro_rules! alternative {
    ($t:expr) => {{
        $t
    }};
    ($t:expr, $($ts:expr),+) => {{
        concatcp!($t, "|", alternative!($($ts),+))
    }}
}

macro_rules! group {
    ($($ts:expr),+) => {{
        concatcp!(r"(", alternative!($($ts),+), ")")
    }}
}

const S_WHITESPACE: &str = r"^[ \f\t\r]+";
const S_COMMENT: &str = r"^#[^\r\n]*";
const S_NAME: &str = r"^[A-Za-z_][A-Za-z0-9_]*";
const S_NUMBER: &str = r"^[0-9]+";
const S_KEYWORDS: &str = concatcp!(
    "^",
    group!(
        "auto", "ret", "write", "read", "ifelse", "if", "while", "lambda", "and", "or", "not",
        "true", "false"
    ),
    r"\b"
);

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_WHITESPACE).expect("Error compiling regex."));
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(S_COMMENT).expect("Error compiling regex."));
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(S_NAME).expect("Error compiling regex."));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(S_NUMBER).expect("Error compiling regex."));
static KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_KEYWORDS).expect("Error compiling regex."));

pub struct Tokenizer {
    tokens: Vec<Token>,
    line: usize,
    column: usize,
    nesting: isize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            tokens: vec![],
            line: 0,
            column: 1,
            nesting: 0,
        }
    }

    /// Tokenizes further input lines. May be called repeatedly while the
    /// result is [`ParserState::ContinuationNeeded`].
    pub fn tokenize(&mut self, input: impl Iterator<Item = String>) -> ParserState {
        for line in input {
            if let Err(e) = self.tokenize_line(line.as_str()) {
                return ParserState::Error(e);
            }
        }
        if self.nesting > 0 {
            return ParserState::ContinuationNeeded;
        }
        ParserState::Ok
    }

    pub fn finalize(mut self) -> Vec<Token> {
        let line = self.line.max(1);
        self.tokens.push(Token {
            typ: TokenType::ENDMARKER,
            lexeme: "".to_string(),
            span: Span::new(line, self.column, line, self.column),
        });
        self.tokens
    }

    fn tokenize_line(&mut self, line: &str) -> Result<(), Error> {
        self.line += 1;
        let mut start = 0;

        while start < line.len() {
            let rest = &line[start..];
            if COMMENT.is_match(rest) {
                break;
            }
            if let Some(m) = WHITESPACE.find(rest) {
                start += m.end();
                continue;
            }
            if let Some(len) = self.find_by_regex(&KEYWORDS, TokenType::KEYWORD, rest, start) {
                start += len;
                continue;
            }
            if let Some(m) = NUMBER.find(rest) {
                let span = self.span_at(start, m.end());
                if m.as_str().parse::<i32>().is_err() {
                    return Err(Error::new(span, "number literal out of range"));
                }
                self.push(TokenType::NUMBER, m.as_str(), span);
                start += m.end();
                continue;
            }
            if let Some(len) = self.find_by_regex(&NAME, TokenType::NAME, rest, start) {
                start += len;
                continue;
            }

            let Some((lexeme, tok_type)) = SIMPLE_TOKENS
                .into_iter()
                .find(|(lexeme, _)| rest.starts_with(lexeme))
            else {
                let c = rest.chars().next().unwrap_or_default();
                let span = self.span_at(start, c.len_utf8());
                return Err(Error::new(span, &format!("invalid character `{c}`")));
            };
            match tok_type {
                TokenType::LPAR | TokenType::LBRACE => self.nesting += 1,
                TokenType::RPAR | TokenType::RBRACE => self.nesting -= 1,
                _ => {}
            }
            let span = self.span_at(start, lexeme.len());
            self.push(tok_type, lexeme, span);
            start += lexeme.len();
        }
        self.column = line.len() + 1;
        Ok(())
    }

    fn span_at(&self, start: usize, len: usize) -> Span {
        Span::new(self.line, start + 1, self.line, start + len + 1)
    }

    fn push(&mut self, typ: TokenType, lexeme: &str, span: Span) {
        self.tokens.push(Token {
            typ,
            lexeme: lexeme.to_string(),
            span,
        });
    }

    fn find_by_regex(
        &mut self,
        regex: &Regex,
        token_type: TokenType,
        rest: &str,
        start: usize,
    ) -> Option<usize> {
        let m = regex.find(rest)?;
        let span = self.span_at(start, m.end());
        self.push(token_type, m.as_str(), span);
        Some(m.end())
    }
}

pub fn tokenize_string(input: &str) -> Result<Vec<Token>, Error> {
    let mut tokenizer = Tokenizer::new();
    match tokenizer.tokenize(input.lines().map(str::to_string)) {
        ParserState::Error(e) => Err(e),
        ParserState::Ok | ParserState::ContinuationNeeded => Ok(tokenizer.finalize()),
    }
}

pub fn tokenize_file<P>(path: P) -> Result<Vec<Token>, Error>
where
    P: AsRef<Path>,
{
    let lines = read_lines(&path)
        .and_then(|lines| lines.collect::<io::Result<Vec<String>>>())
        .map_err(|e| {
            let msg = format!("cannot read {}: {e}", path.as_ref().display());
            Error::new(Span::default(), &msg)
        })?;
    let mut tokenizer = Tokenizer::new();
    match tokenizer.tokenize(lines.into_iter()) {
        ParserState::Error(e) => Err(e),
        ParserState::Ok | ParserState::ContinuationNeeded => Ok(tokenizer.finalize()),
    }
}

fn read_lines<P>(filename: P) -> io::Result<io::Lines<io::BufReader<File>>>
where
    P: AsRef<Path>,
{
    let file = File::open(filename)?;
    Ok(io::BufReader::new(file).lines())
}

#[derive(Debug)]
pub enum ParserState {
    Ok,
    ContinuationNeeded,
    Error(Error),
}
