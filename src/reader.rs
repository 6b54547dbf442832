use im_rc::Vector;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::trace;

use std::{
    fmt::{self, Display},
    iter::Peekable,
};

use crate::{
    error::ReadError,
    value::{display_float, Value},
};

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(
        r#"(?P<open>\()|(?P<close>\))|(?P<op><=|>=|==|[-+*/&!<>=^%])|(?P<num>[0-9]+(?:\.[0-9]+)?)|(?P<sym>[A-Za-z][A-Za-z0-9_?!]*)|"(?P<str>[^"]*)(?P<end>"?)|\S"#
    )
    .unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Open,
    Close,
    Operator(String),
    Int(i64),
    Float(f64),
    Symbol(String),
    Str(String),
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Open => write!(f, "("),
            Self::Close => write!(f, ")"),
            Self::Operator(s) | Self::Symbol(s) => write!(f, "{}", s),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => display_float(*n, f),
            Self::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Splits one line into tokens. Characters that start no token are skipped,
/// as is a string literal left open at the end of the line.
pub fn tokenize(line: &str) -> Vec<Token> {
    TOKEN_RE
        .captures_iter(line)
        .filter_map(|c| token(&c))
        .collect()
}

fn token(c: &Captures) -> Option<Token> {
    if c.name("open").is_some() {
        Some(Token::Open)
    } else if c.name("close").is_some() {
        Some(Token::Close)
    } else if let Some(op) = c.name("op") {
        Some(Token::Operator(op.as_str().into()))
    } else if let Some(num) = c.name("num") {
        read_number(num.as_str())
    } else if let Some(sym) = c.name("sym") {
        Some(Token::Symbol(sym.as_str().into()))
    } else if let Some(s) = c.name("str") {
        c.name("end")
            .filter(|end| !end.as_str().is_empty())
            .map(|_| Token::Str(s.as_str().into()))
    } else {
        None
    }
}

fn read_number(digits: &str) -> Option<Token> {
    if !digits.contains('.') {
        if let Ok(n) = digits.parse() {
            return Some(Token::Int(n));
        }
    }
    digits.parse().map(Token::Float).ok()
}

/// Reads every top-level form of `s`.
pub fn read_str(s: &str) -> Result<Vec<Value>, ReadError> {
    let tokens = tokenize(s);
    trace!(?tokens, "tokenized");
    read_all(tokens)
}

pub fn read_all(tokens: Vec<Token>) -> Result<Vec<Value>, ReadError> {
    let mut reader = Reader::new(tokens);
    let mut forms = Vec::new();
    while let Some(form) = reader.read()? {
        forms.push(form);
    }
    Ok(forms)
}

pub struct Reader<I: Iterator<Item = Token>>(Peekable<I>);

impl Reader<std::vec::IntoIter<Token>> {
    pub fn new(tokens: Vec<Token>) -> Self {
        Reader(tokens.into_iter().peekable())
    }
}

impl<I: Iterator<Item = Token>> Reader<I> {
    /// Reads one form. `Ok(None)` means the tokens are used up.
    pub fn read(&mut self) -> Result<Option<Value>, ReadError> {
        match self.0.next() {
            None => Ok(None),
            Some(Token::Open) => self.read_list().map(Some),
            Some(Token::Close) => Err(ReadError::UnexpectedClose),
            Some(Token::Int(n)) => Ok(Some(Value::Int(n))),
            Some(Token::Float(n)) => Ok(Some(Value::Float(n))),
            Some(Token::Str(s)) => Ok(Some(Value::make_string(s))),
            Some(Token::Operator(s)) | Some(Token::Symbol(s)) => Ok(Some(Value::make_symbol(s))),
        }
    }

    fn read_list(&mut self) -> Result<Value, ReadError> {
        let mut list = Vector::new();
        loop {
            match self.0.peek() {
                None => return Err(ReadError::UnexpectedEnd),
                Some(Token::Close) => {
                    self.0.next();
                    return Ok(Value::List(list));
                }
                Some(_) => list.push_back(self.read()?.ok_or(ReadError::UnexpectedEnd)?),
            }
        }
    }
}
