use im_rc::Vector;

use std::{
    fmt::{self, Debug, Display},
    ops::RangeInclusive,
    rc::Rc,
};

use crate::{env::Env, error::EvalError};

pub type EvalResult = Result<Value, EvalError>;
pub type BuiltinFunction = fn(&[Value]) -> EvalResult;

pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Symbol(Rc<String>),
    String(Rc<String>),
    List(Vector<Value>),
    Primitive {
        name: &'static str,
        arity: RangeInclusive<usize>,
        func: BuiltinFunction,
    },
    Closure {
        env: Env,
        binds: Rc<Vec<Rc<String>>>,
        body: Rc<Value>,
    },
}

impl Value {
    #[inline]
    pub fn symbol(&self) -> Option<&Rc<String>> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn list(&self) -> Option<&Vector<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Only `False` and the empty list are false.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::List(l) => !l.is_empty(),
            _ => true,
        }
    }

    #[inline]
    pub fn make_symbol<I: Into<String>>(s: I) -> Self {
        Value::Symbol(Rc::new(s.into()))
    }

    #[inline]
    pub fn make_string<I: Into<String>>(s: I) -> Self {
        Value::String(Rc::new(s.into()))
    }

    #[inline]
    pub fn make_list<I: IntoIterator<Item = Value>>(i: I) -> Self {
        Value::List(i.into_iter().collect())
    }

    #[inline]
    pub fn make_primitive(
        name: &'static str,
        arity: RangeInclusive<usize>,
        func: BuiltinFunction,
    ) -> Self {
        Value::Primitive { name, arity, func }
    }

    #[inline]
    pub fn make_closure(env: Env, binds: Vec<Rc<String>>, body: Value) -> Self {
        Value::Closure {
            env,
            binds: Rc::new(binds),
            body: Rc::new(body),
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Self::Nil => Self::Nil,
            Self::Bool(b) => Self::Bool(*b),
            Self::Int(n) => Self::Int(*n),
            Self::Float(n) => Self::Float(*n),
            Self::Symbol(s) => Self::Symbol(Rc::clone(s)),
            Self::String(s) => Self::String(Rc::clone(s)),
            Self::List(l) => Self::List(l.clone()),
            Self::Primitive { name, arity, func } => Self::Primitive {
                name: *name,
                arity: arity.clone(),
                func: *func,
            },
            Self::Closure { env, binds, body } => Self::Closure {
                env: env.clone(),
                binds: Rc::clone(binds),
                body: Rc::clone(body),
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(b), Self::Bool(o)) => b == o,
            (Self::Int(n), Self::Int(o)) => n == o,
            (Self::Float(n), Self::Float(o)) => n == o,
            (Self::Int(n), Self::Float(o)) | (Self::Float(o), Self::Int(n)) => {
                int_equals_float(*n, *o)
            }
            (Self::Symbol(s), Self::Symbol(o)) => s == o,
            (Self::String(s), Self::String(o)) => s == o,
            (Self::List(l), Self::List(o)) => l == o,
            (Self::Primitive { func, .. }, Self::Primitive { func: o, .. }) => {
                *func as usize == *o as usize
            }
            (Self::Closure { body, .. }, Self::Closure { body: o, .. }) => Rc::ptr_eq(body, o),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "None"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => display_float(*n, f),
            Self::Symbol(s) => write!(f, "{}", s),
            Self::String(s) => write!(f, "{}", s),
            Self::List(l) => {
                write!(f, "(")?;
                display_seq(l.iter(), f)?;
                write!(f, ")")
            }
            Self::Primitive { name, .. } => write!(f, "<builtin {}>", name),
            Self::Closure { .. } => write!(f, "<lambda>"),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::List(l) => {
                write!(f, "(")?;
                debug_seq(l.iter(), f)?;
                write!(f, ")")
            }
            other => write!(f, "{}", other),
        }
    }
}

/// Exact comparison; an integer never equals a float it only rounds to.
fn int_equals_float(n: i64, f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 && f as i64 == n
}

pub fn display_float(n: f64, f: &mut fmt::Formatter) -> fmt::Result {
    if n.is_nan() {
        write!(f, "nan")
    } else if n.is_infinite() {
        write!(f, "{}", if n > 0.0 { "inf" } else { "-inf" })
    } else {
        write!(f, "{:?}", n)
    }
}

fn display_seq<P: Display, I: Iterator<Item = P>>(mut i: I, f: &mut fmt::Formatter) -> fmt::Result {
    if let Some(e) = i.next() {
        write!(f, "{}", e)?;
    }

    for e in i {
        write!(f, " {}", e)?;
    }

    Ok(())
}

fn debug_seq<P: Debug, I: Iterator<Item = P>>(mut i: I, f: &mut fmt::Formatter) -> fmt::Result {
    if let Some(e) = i.next() {
        write!(f, "{:?}", e)?;
    }

    for e in i {
        write!(f, " {:?}", e)?;
    }

    Ok(())
}
