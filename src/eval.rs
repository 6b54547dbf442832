use im_rc::Vector;
use tracing::trace;

use std::rc::Rc;

use crate::{
    builtins::ensure_len,
    env::Env,
    error::{self as e, EvalError},
    value::{EvalResult, Value},
};

pub fn eval(ast: &Value, env: &Env) -> EvalResult {
    let form = match ast {
        Value::Symbol(s) => return env.get(s),
        Value::List(l) if !l.is_empty() => l,
        other => return Ok(other.clone()),
    };

    let rest: Vec<&Value> = form.iter().skip(1).collect();

    match form.front().and_then(Value::symbol).map(|s| s.as_str()) {
        Some("quote") | Some("q") => {
            let [exp] = ensure_form::<1>(&rest, "quote", "(quote exp)")?;
            Ok(exp.clone())
        }

        Some("atom?") => {
            let [exp] = ensure_form::<1>(&rest, "atom?", "(atom? exp)")?;
            Ok(Value::Bool(eval(exp, env)?.list().is_none()))
        }

        Some("eq?") => {
            let [exp1, exp2] = ensure_form::<2>(&rest, "eq?", "(eq? exp1 exp2)")?;
            let (v1, v2) = (eval(exp1, env)?, eval(exp2, env)?);
            Ok(Value::Bool(
                v1.list().is_none() && v2.list().is_none() && v1 == v2,
            ))
        }

        Some("car") => {
            let [exp] = ensure_form::<1>(&rest, "car", "(car exp)")?;
            eval_list(exp, env, "car", 0)?
                .front()
                .cloned()
                .ok_or(EvalError::EmptyList("car"))
        }

        Some("cdr") => {
            let [exp] = ensure_form::<1>(&rest, "cdr", "(cdr exp)")?;
            let mut list = eval_list(exp, env, "cdr", 0)?;
            list.pop_front();
            Ok(Value::List(list))
        }

        Some("cons") => {
            let [exp1, exp2] = ensure_form::<2>(&rest, "cons", "(cons exp1 exp2)")?;
            let head = eval(exp1, env)?;
            let mut list = eval_list(exp2, env, "cons", 1)?;
            list.push_front(head);
            Ok(Value::List(list))
        }

        Some("cond") => {
            for clause in rest {
                let [p, exp] = clause
                    .list()
                    .map(|c| c.iter().collect::<Vec<_>>())
                    .ok_or_else(|| e::bad_form("cond", "(cond (p1 e1) ... (pn en))"))
                    .and_then(|c| ensure_form::<2>(&c, "cond", "(cond (p1 e1) ... (pn en))"))?;
                if eval(p, env)?.is_truthy() {
                    return eval(exp, env);
                }
            }
            Ok(Value::Nil)
        }

        Some("null?") => {
            let [exp] = ensure_form::<1>(&rest, "null?", "(null? exp)")?;
            Ok(Value::Bool(matches!(eval(exp, env)?, Value::List(l) if l.is_empty())))
        }

        Some("if") => {
            let [test, conseq, alt] = ensure_form::<3>(&rest, "if", "(if test conseq alt)")?;
            if eval(test, env)?.is_truthy() {
                eval(conseq, env)
            } else {
                eval(alt, env)
            }
        }

        Some("set!") => {
            let [var, exp] = ensure_form::<2>(&rest, "set!", "(set! var exp)")?;
            let var = var.symbol().ok_or_else(|| e::bad_form("set!", "(set! var exp)"))?;
            let value = eval(exp, env)?;
            env.set_existing(var, value)?;
            Ok(Value::Nil)
        }

        Some("define") => {
            let [var, exp] = ensure_form::<2>(&rest, "define", "(define var exp)")?;
            let var = var
                .symbol()
                .ok_or_else(|| e::bad_form("define", "(define var exp)"))?;
            let value = eval(exp, env)?;
            env.define(var.as_str(), value);
            Ok(Value::Nil)
        }

        Some("lambda") => {
            let [vars, exp] = ensure_form::<2>(&rest, "lambda", "(lambda (var*) exp)")?;
            let binds = vars
                .list()
                .and_then(|vars| {
                    vars.iter()
                        .map(|v| v.symbol().cloned())
                        .collect::<Option<Vec<Rc<String>>>>()
                })
                .ok_or_else(|| e::bad_form("lambda", "(lambda (var*) exp)"))?;
            Ok(Value::make_closure(env.clone(), binds, exp.clone()))
        }

        Some("begin") => rest
            .into_iter()
            .try_fold(Value::Nil, |_, exp| eval(exp, env)),

        Some("env") => {
            ensure_form::<0>(&rest, "env", "(env)")?;
            Ok(Value::make_string(format!("( {} )", env.names().join(" "))))
        }

        _ => {
            let mut values = form
                .iter()
                .map(|exp| eval(exp, env))
                .collect::<Result<Vec<_>, _>>()?;
            let func = values.remove(0);
            apply(&func, values)
        }
    }
}

/// Calls a primitive or a closure with already evaluated arguments.
pub fn apply(func: &Value, args: Vec<Value>) -> EvalResult {
    match func {
        Value::Primitive { name, arity, func } => {
            ensure_len(args.len(), arity, *name)?;
            func(&args)
        }
        Value::Closure { env, binds, body } => {
            trace!(?binds, ?args, "applying closure");
            let local = Env::new().env(env.clone()).binds(binds, args)?.make();
            eval(body, &local)
        }
        other => Err(EvalError::NotCallable(format!("{:?}", other))),
    }
}

/// Splits the operands of a special form, checking their count.
fn ensure_form<'a, const N: usize>(
    rest: &[&'a Value],
    form: &'static str,
    usage: &'static str,
) -> Result<[&'a Value; N], EvalError> {
    <[&'a Value; N]>::try_from(rest).map_err(|_| e::bad_form(form, usage))
}

fn eval_list(
    exp: &Value,
    env: &Env,
    name: &'static str,
    position: usize,
) -> Result<Vector<Value>, EvalError> {
    match eval(exp, env)? {
        Value::List(l) => Ok(l),
        other => Err(e::arg_type(name, "a list", position, &other)),
    }
}
