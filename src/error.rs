use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::value::Value;

#[derive(Debug, PartialEq, Error)]
pub enum ReadError {
    #[error("unexpected )")]
    UnexpectedClose,
    #[error("read ended unexpectedly, expected )")]
    UnexpectedEnd,
}

#[derive(Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("Unknown {0}")]
    UnboundSymbol(String),
    #[error("Malformed {form}, expected {usage}")]
    BadForm {
        form: &'static str,
        usage: &'static str,
    },
    #[error("Wrong number of arguments for {name}. Expected {expected}, got {provided}")]
    ArgumentCount {
        name: &'static str,
        expected: usize,
        provided: usize,
    },
    #[error("Called an object that is not a function: {0}")]
    NotCallable(String),
    #[error("Argument {position} of {name} must be {expected}, got {got}")]
    ArgumentType {
        name: &'static str,
        expected: &'static str,
        position: usize,
        got: String,
    },
    #[error("{0} of an empty list")]
    EmptyList(&'static str),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Numeric overflow: {name} on {left} and {right}")]
    NumericOverflow {
        name: &'static str,
        left: i64,
        right: i64,
    },
    #[error("Numeric overflow: {name} of {arg}")]
    ResultTooLarge { name: &'static str, arg: i64 },
    #[error("Math domain error in {0}")]
    MathDomain(&'static str),
}

/// Everything that can go wrong between reading a line and printing its value.
#[derive(Debug, Error)]
pub enum LispError {
    #[error("Not a valid expression: {0}")]
    Read(#[from] ReadError),
    #[error("Error: {0}")]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

#[inline]
pub fn arg_type(name: &'static str, expected: &'static str, position: usize, got: &Value) -> EvalError {
    EvalError::ArgumentType {
        name,
        expected,
        position,
        got: format!("{:?}", got),
    }
}

#[inline]
pub fn bad_form(form: &'static str, usage: &'static str) -> EvalError {
    EvalError::BadForm { form, usage }
}

#[inline]
pub fn arg_count(name: &'static str, expected: usize, provided: usize) -> EvalError {
    EvalError::ArgumentCount {
        name,
        expected,
        provided,
    }
}
