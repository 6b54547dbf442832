use std::{fs::read_to_string, io::Write, path::Path};

use tracing::{debug, info};

use crate::{
    env::Env,
    error::LispError,
    eval::eval,
    reader::{read_all, tokenize},
    value::Value,
};

/// One root environment and everything needed to feed lines into it.
pub struct Interpreter {
    env: Env,
}

impl Interpreter {
    pub fn new() -> Self {
        Self { env: Env::global() }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Reads and evaluates every form on `line` in order. The value of the line
    /// is the value of its last form, or nil if it holds none.
    pub fn rep(&self, line: &str) -> Result<Value, LispError> {
        let tokens = tokenize(line);
        if !tokens.is_empty() {
            let rendered: Vec<String> = tokens.iter().map(ToString::to_string).collect();
            debug!(tokens = %rendered.join(" "), "read");
        }

        let forms = read_all(tokens)?;
        let mut result = Value::Nil;
        for form in forms {
            debug!(tree = ?form, "eval");
            result = eval(&form, &self.env)?;
        }
        Ok(result)
    }

    /// Evaluates `source` line by line against the shared environment, writing
    /// each non-nil result to `out`. A failing line is reported and skipped.
    pub fn execute<W: Write>(&self, source: &str, out: &mut W) -> Result<(), LispError> {
        for (n, line) in source.lines().enumerate() {
            match self.rep(line) {
                Ok(Value::Nil) => {}
                Ok(value) => writeln!(out, "{}", value)?,
                Err(err) => writeln!(out, "line {}: {}", n + 1, err)?,
            }
        }
        Ok(())
    }

    pub fn run_file<P: AsRef<Path>, W: Write>(&self, path: P, out: &mut W) -> Result<(), LispError> {
        info!(path = %path.as_ref().display(), "running file");
        let source = read_to_string(path)?;
        self.execute(&source, out)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
