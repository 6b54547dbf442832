use std::{
    cell::RefCell,
    collections::HashMap,
    rc::Rc,
};

use crate::{
    builtins,
    error::{self as e, EvalError},
    value::{EvalResult, Value},
};

/// A shared handle to one lexical scope. Cloning shares the scope.
pub struct Env(Rc<LispEnv>);

struct LispEnv {
    data: RefCell<HashMap<String, Value>>,
    outer: Option<Env>,
}

impl Env {
    pub fn new() -> EnvBuilder {
        EnvBuilder {
            data: HashMap::new(),
            outer: None,
        }
    }

    /// A root scope populated with every builtin.
    pub fn global() -> Env {
        Env::new().with_globals().make()
    }

    pub fn get(&self, k: &str) -> EvalResult {
        if let Some(value) = self.0.data.borrow().get(k) {
            return Ok(value.clone());
        }

        match &self.0.outer {
            Some(outer) => outer.get(k),
            None => Err(EvalError::UnboundSymbol(k.into())),
        }
    }

    /// The innermost scope in the chain that binds `k`.
    pub fn find(&self, k: &str) -> Option<Self> {
        if self.0.data.borrow().contains_key(k) {
            Some(self.clone())
        } else {
            self.0.outer.as_ref().and_then(|e| e.find(k))
        }
    }

    /// Binds in this scope, shadowing any outer binding.
    pub fn define<K: Into<String>>(&self, key: K, value: Value) {
        self.0.data.borrow_mut().insert(key.into(), value);
    }

    /// Rebinds `k` in whichever scope already holds it.
    pub fn set_existing(&self, k: &str, value: Value) -> Result<(), EvalError> {
        let env = self
            .find(k)
            .ok_or_else(|| EvalError::UnboundSymbol(k.into()))?;
        env.0.data.borrow_mut().insert(k.into(), value);
        Ok(())
    }

    /// Names bound in this scope only.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.data.borrow().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Clone for Env {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

pub struct EnvBuilder {
    data: HashMap<String, Value>,
    outer: Option<Env>,
}

impl EnvBuilder {
    pub fn env(mut self, env: Env) -> Self {
        self.outer = Some(env);
        self
    }

    pub fn with_globals(mut self) -> Self {
        for (name, value) in builtins::ns() {
            self.data.insert(name.into(), value);
        }
        self
    }

    pub fn binds(mut self, vars: &[Rc<String>], values: Vec<Value>) -> Result<Self, EvalError> {
        if vars.len() != values.len() {
            return Err(e::arg_count("lambda", vars.len(), values.len()));
        }

        for (var, value) in vars.iter().zip(values) {
            self.data.insert(var.as_ref().clone(), value);
        }

        Ok(self)
    }

    pub fn make(mut self) -> Env {
        let outer = self.outer.take();

        Env(Rc::new(LispEnv {
            data: RefCell::new(self.data),
            outer,
        }))
    }
}
