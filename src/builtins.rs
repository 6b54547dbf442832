use std::{cmp::Ordering, f64::consts, ops::RangeInclusive};

use crate::{
    error::{self as e, EvalError},
    value::{BuiltinFunction, EvalResult, Value},
};

#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn float(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }
}

fn number(args: &[Value], name: &'static str, position: usize) -> Result<Number, EvalError> {
    match &args[position] {
        Value::Int(n) => Ok(Number::Int(*n)),
        Value::Float(n) => Ok(Number::Float(*n)),
        other => Err(e::arg_type(name, "a number", position, other)),
    }
}

fn float(args: &[Value], name: &'static str, position: usize) -> Result<f64, EvalError> {
    number(args, name, position).map(Number::float)
}

fn int(args: &[Value], name: &'static str, position: usize) -> Result<i64, EvalError> {
    match &args[position] {
        Value::Int(n) => Ok(*n),
        other => Err(e::arg_type(name, "an integer", position, other)),
    }
}

/// Integer arithmetic is checked; mixing in a float promotes both sides.
fn arithmetic_operation(
    args: &[Value],
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
    name: &'static str,
) -> EvalResult {
    match (number(args, name, 0)?, number(args, name, 1)?) {
        (Number::Int(left), Number::Int(right)) => int_op(left, right)
            .map(Value::Int)
            .ok_or(EvalError::NumericOverflow { name, left, right }),
        (left, right) => Ok(Value::Float(float_op(left.float(), right.float()))),
    }
}

fn arithmetic_compare(args: &[Value], accept: fn(Ordering) -> bool, name: &'static str) -> EvalResult {
    let ordering = match (&args[0], &args[1]) {
        (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
        _ => match (number(args, name, 0)?, number(args, name, 1)?) {
            (Number::Int(left), Number::Int(right)) => Some(left.cmp(&right)),
            (left, right) => left.float().partial_cmp(&right.float()),
        },
    };

    // NaN compares false against everything
    Ok(Value::Bool(ordering.map_or(false, accept)))
}

pub fn add(args: &[Value]) -> EvalResult {
    match (&args[0], &args[1]) {
        (Value::String(left), Value::String(right)) => {
            Ok(Value::make_string(format!("{}{}", left, right)))
        }
        (Value::List(left), Value::List(right)) => {
            let mut list = left.clone();
            list.append(right.clone());
            Ok(Value::List(list))
        }
        _ => arithmetic_operation(args, i64::checked_add, |a, b| a + b, "+"),
    }
}

pub fn subtract(args: &[Value]) -> EvalResult {
    arithmetic_operation(args, i64::checked_sub, |a, b| a - b, "-")
}

pub fn multiply(args: &[Value]) -> EvalResult {
    arithmetic_operation(args, i64::checked_mul, |a, b| a * b, "*")
}

/// True division: the result is always a float.
pub fn divide(args: &[Value]) -> EvalResult {
    let left = float(args, "/", 0)?;
    let right = float(args, "/", 1)?;
    if right == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Float(left / right))
}

/// Floored modulo: the result takes the sign of the divisor.
pub fn modulo(args: &[Value]) -> EvalResult {
    match (number(args, "%", 0)?, number(args, "%", 1)?) {
        (Number::Int(_), Number::Int(0)) => Err(EvalError::DivisionByZero),
        (Number::Int(left), Number::Int(right)) => {
            // only MIN % -1 wraps, and its remainder is 0
            let r = left.wrapping_rem(right);
            Ok(Value::Int(if r != 0 && (r < 0) != (right < 0) {
                r + right
            } else {
                r
            }))
        }
        (left, right) => {
            let (left, right) = (left.float(), right.float());
            if right == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            let r = left % right;
            Ok(Value::Float(if r != 0.0 && (r < 0.0) != (right < 0.0) {
                r + right
            } else {
                r
            }))
        }
    }
}

pub fn equal(args: &[Value]) -> EvalResult {
    Ok(Value::Bool(args[0] == args[1]))
}

pub fn less(args: &[Value]) -> EvalResult {
    arithmetic_compare(args, Ordering::is_lt, "<")
}

pub fn less_equal(args: &[Value]) -> EvalResult {
    arithmetic_compare(args, Ordering::is_le, "<=")
}

pub fn greater(args: &[Value]) -> EvalResult {
    arithmetic_compare(args, Ordering::is_gt, ">")
}

pub fn greater_equal(args: &[Value]) -> EvalResult {
    arithmetic_compare(args, Ordering::is_ge, ">=")
}

pub fn xor(args: &[Value]) -> EvalResult {
    match (&args[0], &args[1]) {
        (Value::Bool(left), Value::Bool(right)) => Ok(Value::Bool(left ^ right)),
        (Value::Bool(_), other) => Err(e::arg_type("^", "a boolean", 1, other)),
        _ => Ok(Value::Int(int(args, "^", 0)? ^ int(args, "^", 1)?)),
    }
}

pub fn not(args: &[Value]) -> EvalResult {
    Ok(Value::Bool(!args[0].is_truthy()))
}

/// Wraps an `f64 -> f64` function as a unary builtin. A finite argument that
/// produces a NaN or an infinity is reported as a domain error.
macro_rules! unary_math {
    ($name:ident, $lisp:literal, $f:expr) => {
        pub fn $name(args: &[Value]) -> EvalResult {
            let x = float(args, $lisp, 0)?;
            let y = ($f)(x);
            if x.is_finite() && !y.is_finite() {
                Err(EvalError::MathDomain($lisp))
            } else {
                Ok(Value::Float(y))
            }
        }
    };
}

macro_rules! binary_math {
    ($name:ident, $lisp:literal, $f:expr) => {
        pub fn $name(args: &[Value]) -> EvalResult {
            let x = float(args, $lisp, 0)?;
            let y = float(args, $lisp, 1)?;
            let z = ($f)(x, y);
            if x.is_finite() && y.is_finite() && !z.is_finite() {
                Err(EvalError::MathDomain($lisp))
            } else {
                Ok(Value::Float(z))
            }
        }
    };
}

unary_math!(sqrt, "sqrt", f64::sqrt);
unary_math!(exp, "exp", f64::exp);
unary_math!(log2, "log2", f64::log2);
unary_math!(log10, "log10", f64::log10);
unary_math!(sin, "sin", f64::sin);
unary_math!(cos, "cos", f64::cos);
unary_math!(tan, "tan", f64::tan);
unary_math!(asin, "asin", f64::asin);
unary_math!(acos, "acos", f64::acos);
unary_math!(atan, "atan", f64::atan);
unary_math!(sinh, "sinh", f64::sinh);
unary_math!(cosh, "cosh", f64::cosh);
unary_math!(tanh, "tanh", f64::tanh);
unary_math!(asinh, "asinh", f64::asinh);
unary_math!(acosh, "acosh", f64::acosh);
unary_math!(atanh, "atanh", f64::atanh);
unary_math!(fabs, "fabs", f64::abs);
unary_math!(degrees, "degrees", f64::to_degrees);
unary_math!(radians, "radians", f64::to_radians);
unary_math!(cbrt, "cbrt", f64::cbrt);
unary_math!(exp2, "exp2", f64::exp2);
unary_math!(expm1, "expm1", f64::exp_m1);
unary_math!(log1p, "log1p", f64::ln_1p);

binary_math!(pow, "pow", f64::powf);
binary_math!(atan2, "atan2", f64::atan2);
binary_math!(hypot, "hypot", f64::hypot);
binary_math!(copysign, "copysign", f64::copysign);

/// Natural logarithm, or the logarithm in the given base.
pub fn log(args: &[Value]) -> EvalResult {
    let x = float(args, "log", 0)?;
    let y = match args.len() {
        1 => x.ln(),
        _ => {
            let base = float(args, "log", 1)?;
            if base <= 0.0 || base == 1.0 {
                return Err(EvalError::MathDomain("log"));
            }
            x.ln() / base.ln()
        }
    };
    if x.is_finite() && !y.is_finite() {
        Err(EvalError::MathDomain("log"))
    } else {
        Ok(Value::Float(y))
    }
}

pub fn fmod(args: &[Value]) -> EvalResult {
    let x = float(args, "fmod", 0)?;
    let y = float(args, "fmod", 1)?;
    if y == 0.0 {
        return Err(EvalError::MathDomain("fmod"));
    }
    Ok(Value::Float(x % y))
}

/// IEEE remainder: `x - n * y` with `n` the nearest integer to `x / y`, ties
/// going to the even one.
pub fn remainder(args: &[Value]) -> EvalResult {
    let x = float(args, "remainder", 0)?;
    let y = float(args, "remainder", 1)?;
    if y == 0.0 || x.is_infinite() {
        return Err(EvalError::MathDomain("remainder"));
    }

    let m = y.abs();
    let r = x.abs() % m;
    let half = m / 2.0;
    let r = if r > half || (r == half && ((x.abs() - r) / m) % 2.0 == 1.0) {
        r - m
    } else {
        r
    };
    Ok(Value::Float(if x < 0.0 { -r } else { r }))
}

/// `x * 2^i`, scaled in steps so an extreme `i` cannot underflow the factor.
pub fn ldexp(args: &[Value]) -> EvalResult {
    let mut x = float(args, "ldexp", 0)?;
    let mut i = int(args, "ldexp", 1)?.clamp(-2200, 2200);
    let finite = x.is_finite();

    while i > 1000 {
        x *= 2f64.powi(1000);
        i -= 1000;
    }
    while i < -1000 {
        x *= 2f64.powi(-1000);
        i += 1000;
    }
    x *= 2f64.powi(i as i32);

    if finite && !x.is_finite() {
        Err(EvalError::MathDomain("ldexp"))
    } else {
        Ok(Value::Float(x))
    }
}

/// Rounds towards an integer; integers pass through unchanged.
fn rounding(args: &[Value], f: fn(f64) -> f64, name: &'static str) -> EvalResult {
    match number(args, name, 0)? {
        Number::Int(n) => Ok(Value::Int(n)),
        Number::Float(x) => {
            let y = f(x);
            if y.is_finite() && y >= i64::MIN as f64 && y < i64::MAX as f64 {
                Ok(Value::Int(y as i64))
            } else {
                Err(EvalError::MathDomain(name))
            }
        }
    }
}

pub fn floor(args: &[Value]) -> EvalResult {
    rounding(args, f64::floor, "floor")
}

pub fn ceil(args: &[Value]) -> EvalResult {
    rounding(args, f64::ceil, "ceil")
}

pub fn trunc(args: &[Value]) -> EvalResult {
    rounding(args, f64::trunc, "trunc")
}

pub fn factorial(args: &[Value]) -> EvalResult {
    let n = int(args, "factorial", 0)?;
    if n < 0 {
        return Err(EvalError::MathDomain("factorial"));
    }
    (2..=n)
        .try_fold(1i64, |acc, k| acc.checked_mul(k))
        .map(Value::Int)
        .ok_or(EvalError::ResultTooLarge {
            name: "factorial",
            arg: n,
        })
}

fn euclid(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

pub fn gcd(args: &[Value]) -> EvalResult {
    let a = int(args, "gcd", 0)?;
    let b = int(args, "gcd", 1)?;
    i64::try_from(euclid(a.unsigned_abs(), b.unsigned_abs()))
        .map(Value::Int)
        .map_err(|_| EvalError::NumericOverflow {
            name: "gcd",
            left: a,
            right: b,
        })
}

pub fn lcm(args: &[Value]) -> EvalResult {
    let a = int(args, "lcm", 0)?;
    let b = int(args, "lcm", 1)?;
    if a == 0 || b == 0 {
        return Ok(Value::Int(0));
    }

    let (ua, ub) = (a.unsigned_abs(), b.unsigned_abs());
    (ua / euclid(ua, ub))
        .checked_mul(ub)
        .and_then(|l| i64::try_from(l).ok())
        .map(Value::Int)
        .ok_or(EvalError::NumericOverflow {
            name: "lcm",
            left: a,
            right: b,
        })
}

/// Reads `n` and `k` for `comb` and `perm`; both must be non-negative.
fn choose_args(args: &[Value], name: &'static str) -> Result<(i64, i64), EvalError> {
    let n = int(args, name, 0)?;
    let k = match args.len() {
        1 => n,
        _ => int(args, name, 1)?,
    };
    if n < 0 || k < 0 {
        Err(EvalError::MathDomain(name))
    } else {
        Ok((n, k))
    }
}

/// Ways to choose `k` of `n` items without order.
pub fn comb(args: &[Value]) -> EvalResult {
    let (n, k) = choose_args(args, "comb")?;
    if k > n {
        return Ok(Value::Int(0));
    }

    // C(n - k + i, i) grows with i, so the first step past i64 is final
    let k = k.min(n - k);
    let mut acc: i128 = 1;
    for i in 1..=k {
        acc = acc * i128::from(n - k + i) / i128::from(i);
        if acc > i128::from(i64::MAX) {
            return Err(EvalError::ResultTooLarge { name: "comb", arg: n });
        }
    }
    Ok(Value::Int(acc as i64))
}

/// Ways to choose `k` of `n` items in order; `k` defaults to `n`.
pub fn perm(args: &[Value]) -> EvalResult {
    let (n, k) = choose_args(args, "perm")?;
    if k > n {
        return Ok(Value::Int(0));
    }

    (n - k + 1..=n)
        .try_fold(1i64, |acc, f| acc.checked_mul(f))
        .map(Value::Int)
        .ok_or(EvalError::ResultTooLarge { name: "perm", arg: n })
}

pub fn isqrt(args: &[Value]) -> EvalResult {
    let n = int(args, "isqrt", 0)?;
    if n < 0 {
        return Err(EvalError::MathDomain("isqrt"));
    }
    let mut root = (n as f64).sqrt() as i64;
    while root.checked_mul(root).map_or(true, |sq| sq > n) {
        root -= 1;
    }
    while (root + 1).checked_mul(root + 1).map_or(false, |sq| sq <= n) {
        root += 1;
    }
    Ok(Value::Int(root))
}

pub fn isnan(args: &[Value]) -> EvalResult {
    Ok(Value::Bool(float(args, "isnan", 0)?.is_nan()))
}

pub fn isinf(args: &[Value]) -> EvalResult {
    Ok(Value::Bool(float(args, "isinf", 0)?.is_infinite()))
}

pub fn isfinite(args: &[Value]) -> EvalResult {
    Ok(Value::Bool(float(args, "isfinite", 0)?.is_finite()))
}

/// Everything bound in the root environment.
pub fn ns() -> Vec<(&'static str, Value)> {
    let constants = [
        ("pi", consts::PI),
        ("e", consts::E),
        ("tau", consts::TAU),
        ("inf", f64::INFINITY),
        ("nan", f64::NAN),
    ];

    let primitives: &[(&'static str, usize, BuiltinFunction)] = &[
        ("+", 2, add),
        ("-", 2, subtract),
        ("*", 2, multiply),
        ("/", 2, divide),
        ("%", 2, modulo),
        (">", 2, greater),
        ("<", 2, less),
        (">=", 2, greater_equal),
        ("<=", 2, less_equal),
        ("==", 2, equal),
        ("^", 2, xor),
        ("!", 1, not),
        ("sqrt", 1, sqrt),
        ("exp", 1, exp),
        ("log2", 1, log2),
        ("log10", 1, log10),
        ("sin", 1, sin),
        ("cos", 1, cos),
        ("tan", 1, tan),
        ("asin", 1, asin),
        ("acos", 1, acos),
        ("atan", 1, atan),
        ("sinh", 1, sinh),
        ("cosh", 1, cosh),
        ("tanh", 1, tanh),
        ("asinh", 1, asinh),
        ("acosh", 1, acosh),
        ("atanh", 1, atanh),
        ("fabs", 1, fabs),
        ("degrees", 1, degrees),
        ("radians", 1, radians),
        ("cbrt", 1, cbrt),
        ("exp2", 1, exp2),
        ("expm1", 1, expm1),
        ("log1p", 1, log1p),
        ("floor", 1, floor),
        ("ceil", 1, ceil),
        ("trunc", 1, trunc),
        ("factorial", 1, factorial),
        ("isqrt", 1, isqrt),
        ("isnan", 1, isnan),
        ("isinf", 1, isinf),
        ("isfinite", 1, isfinite),
        ("pow", 2, pow),
        ("atan2", 2, atan2),
        ("hypot", 2, hypot),
        ("fmod", 2, fmod),
        ("copysign", 2, copysign),
        ("gcd", 2, gcd),
        ("lcm", 2, lcm),
        ("comb", 2, comb),
        ("ldexp", 2, ldexp),
        ("remainder", 2, remainder),
    ];

    // the second argument of these is optional
    let variadic: &[(&'static str, RangeInclusive<usize>, BuiltinFunction)] =
        &[("log", 1..=2, log), ("perm", 1..=2, perm)];

    constants
        .into_iter()
        .map(|(name, value)| (name, Value::Float(value)))
        .chain(
            primitives
                .iter()
                .map(|&(name, arity, func)| (name, Value::make_primitive(name, arity..=arity, func))),
        )
        .chain(
            variadic
                .iter()
                .map(|(name, arity, func)| (*name, Value::make_primitive(*name, arity.clone(), *func))),
        )
        .chain([("True", Value::Bool(true)), ("False", Value::Bool(false))])
        .collect()
}

/// Checks the argument count before a builtin is called. The error names the
/// bound that was missed.
#[inline]
pub fn ensure_len(
    provided: usize,
    required: &RangeInclusive<usize>,
    name: &'static str,
) -> Result<(), EvalError> {
    if required.contains(&provided) {
        Ok(())
    } else if provided < *required.start() {
        Err(e::arg_count(name, *required.start(), provided))
    } else {
        Err(e::arg_count(name, *required.end(), provided))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::make_string(v)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(add(&[Value::Int(1), Value::Int(2)]), Ok(Value::Int(3)));
        assert_eq!(add(&[Value::Int(1), Value::Float(0.5)]), Ok(Value::Float(1.5)));
        assert_eq!(subtract(&[Value::Int(2), Value::Int(5)]), Ok(Value::Int(-3)));
        assert_eq!(multiply(&[Value::Int(3), Value::Int(2)]), Ok(Value::Int(6)));
        assert_eq!(divide(&[Value::Int(2), Value::Int(2)]), Ok(Value::Float(1.0)));
        assert_eq!(divide(&[Value::Int(7), Value::Int(2)]), Ok(Value::Float(3.5)));
        assert_eq!(
            divide(&[Value::Int(1), Value::Int(0)]),
            Err(EvalError::DivisionByZero)
        );
        assert!(matches!(
            add(&[Value::Int(i64::MAX), Value::Int(1)]),
            Err(EvalError::NumericOverflow { name: "+", .. })
        ));
        assert!(matches!(
            add(&[Value::Int(1), Value::Bool(true)]),
            Err(EvalError::ArgumentType {
                name: "+",
                position: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_add_concatenates() {
        assert_eq!(add(&[s("ab"), s("cd")]), Ok(s("abcd")));
        assert_eq!(
            add(&[
                Value::make_list(vec![Value::Int(1)]),
                Value::make_list(vec![Value::Int(2)])
            ]),
            Ok(Value::make_list(vec![Value::Int(1), Value::Int(2)]))
        );
    }

    #[test]
    fn test_modulo_is_floored() {
        assert_eq!(modulo(&[Value::Int(7), Value::Int(3)]), Ok(Value::Int(1)));
        assert_eq!(modulo(&[Value::Int(-7), Value::Int(3)]), Ok(Value::Int(2)));
        assert_eq!(modulo(&[Value::Int(7), Value::Int(-3)]), Ok(Value::Int(-2)));
        assert_eq!(modulo(&[Value::Float(5.5), Value::Int(2)]), Ok(Value::Float(1.5)));
        assert_eq!(
            modulo(&[Value::Int(1), Value::Int(0)]),
            Err(EvalError::DivisionByZero)
        );
        assert_eq!(modulo(&[Value::Int(i64::MIN), Value::Int(-1)]), Ok(Value::Int(0)));
        assert_eq!(modulo(&[Value::Int(i64::MIN), Value::Int(3)]), Ok(Value::Int(1)));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(less(&[Value::Int(1), Value::Int(2)]), Ok(Value::Bool(true)));
        assert_eq!(greater(&[Value::Int(1), Value::Float(0.5)]), Ok(Value::Bool(true)));
        assert_eq!(less_equal(&[Value::Int(2), Value::Int(2)]), Ok(Value::Bool(true)));
        assert_eq!(greater_equal(&[Value::Int(1), Value::Int(2)]), Ok(Value::Bool(false)));
        assert_eq!(less(&[s("a"), s("b")]), Ok(Value::Bool(true)));
        assert_eq!(less(&[Value::Float(f64::NAN), Value::Int(1)]), Ok(Value::Bool(false)));
        assert_eq!(equal(&[Value::Int(1), Value::Float(1.0)]), Ok(Value::Bool(true)));
        assert_eq!(equal(&[s("a"), s("a")]), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_logic() {
        assert_eq!(xor(&[Value::Int(6), Value::Int(3)]), Ok(Value::Int(5)));
        assert_eq!(
            xor(&[Value::Bool(true), Value::Bool(false)]),
            Ok(Value::Bool(true))
        );
        assert_eq!(not(&[Value::Bool(false)]), Ok(Value::Bool(true)));
        assert_eq!(not(&[Value::make_list(vec![])]), Ok(Value::Bool(true)));
        assert_eq!(not(&[Value::Int(0)]), Ok(Value::Bool(false)));
    }

    #[test]
    fn test_math() {
        assert_eq!(sqrt(&[Value::Int(16)]), Ok(Value::Float(4.0)));
        assert_eq!(sqrt(&[Value::Int(-1)]), Err(EvalError::MathDomain("sqrt")));
        assert_eq!(log(&[Value::Int(0)]), Err(EvalError::MathDomain("log")));
        assert_eq!(floor(&[Value::Float(2.7)]), Ok(Value::Int(2)));
        assert_eq!(ceil(&[Value::Float(2.1)]), Ok(Value::Int(3)));
        assert_eq!(floor(&[Value::Int(4)]), Ok(Value::Int(4)));
        assert_eq!(pow(&[Value::Int(2), Value::Int(10)]), Ok(Value::Float(1024.0)));
        assert_eq!(factorial(&[Value::Int(5)]), Ok(Value::Int(120)));
        assert_eq!(factorial(&[Value::Int(0)]), Ok(Value::Int(1)));
        assert_eq!(factorial(&[Value::Int(-1)]), Err(EvalError::MathDomain("factorial")));
        assert_eq!(
            factorial(&[Value::Int(21)]),
            Err(EvalError::ResultTooLarge {
                name: "factorial",
                arg: 21
            })
        );
        assert_eq!(
            factorial(&[Value::Int(21)]).unwrap_err().to_string(),
            "Numeric overflow: factorial of 21"
        );
        assert_eq!(gcd(&[Value::Int(12), Value::Int(-18)]), Ok(Value::Int(6)));
        assert_eq!(isqrt(&[Value::Int(17)]), Ok(Value::Int(4)));
        assert_eq!(isqrt(&[Value::Int(16)]), Ok(Value::Int(4)));
        assert_eq!(isnan(&[Value::Float(f64::NAN)]), Ok(Value::Bool(true)));
        assert_eq!(fmod(&[Value::Int(1), Value::Int(0)]), Err(EvalError::MathDomain("fmod")));
    }

    #[test]
    fn test_more_math() {
        assert_eq!(cbrt(&[Value::Int(27)]), Ok(Value::Float(3.0)));
        assert_eq!(cbrt(&[Value::Int(-8)]), Ok(Value::Float(-2.0)));
        assert_eq!(exp2(&[Value::Int(3)]), Ok(Value::Float(8.0)));
        assert_eq!(expm1(&[Value::Int(0)]), Ok(Value::Float(0.0)));
        assert_eq!(log1p(&[Value::Int(0)]), Ok(Value::Float(0.0)));
        assert_eq!(log1p(&[Value::Int(-2)]), Err(EvalError::MathDomain("log1p")));
        assert_eq!(ldexp(&[Value::Float(0.75), Value::Int(4)]), Ok(Value::Float(12.0)));
        assert_eq!(ldexp(&[Value::Int(1), Value::Int(-1074)]), Ok(Value::Float(f64::from_bits(1))));
        assert_eq!(ldexp(&[Value::Int(1), Value::Int(5000)]), Err(EvalError::MathDomain("ldexp")));
        assert!(matches!(
            ldexp(&[Value::Int(1), Value::Float(2.0)]),
            Err(EvalError::ArgumentType { name: "ldexp", position: 1, .. })
        ));
    }

    #[test]
    fn test_log_with_base() {
        assert_eq!(log(&[Value::Int(1)]), Ok(Value::Float(0.0)));
        assert_eq!(log(&[Value::Int(0)]), Err(EvalError::MathDomain("log")));
        match log(&[Value::Int(8), Value::Int(2)]) {
            Ok(Value::Float(n)) => assert!((n - 3.0).abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }
        match log(&[Value::Int(100), Value::Int(10)]) {
            Ok(Value::Float(n)) => assert!((n - 2.0).abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(log(&[Value::Int(8), Value::Int(1)]), Err(EvalError::MathDomain("log")));
        assert_eq!(log(&[Value::Int(8), Value::Int(0)]), Err(EvalError::MathDomain("log")));
    }

    #[test]
    fn test_remainder_rounds_to_even() {
        assert_eq!(remainder(&[Value::Int(5), Value::Int(2)]), Ok(Value::Float(1.0)));
        assert_eq!(remainder(&[Value::Int(7), Value::Int(2)]), Ok(Value::Float(-1.0)));
        assert_eq!(remainder(&[Value::Int(-7), Value::Int(2)]), Ok(Value::Float(1.0)));
        assert_eq!(remainder(&[Value::Int(10), Value::Int(3)]), Ok(Value::Float(1.0)));
        assert_eq!(remainder(&[Value::Int(11), Value::Int(3)]), Ok(Value::Float(-1.0)));
        assert_eq!(
            remainder(&[Value::Int(1), Value::Int(0)]),
            Err(EvalError::MathDomain("remainder"))
        );
    }

    #[test]
    fn test_integer_math() {
        assert_eq!(lcm(&[Value::Int(4), Value::Int(6)]), Ok(Value::Int(12)));
        assert_eq!(lcm(&[Value::Int(-4), Value::Int(6)]), Ok(Value::Int(12)));
        assert_eq!(lcm(&[Value::Int(0), Value::Int(6)]), Ok(Value::Int(0)));
        assert!(matches!(
            lcm(&[Value::Int(i64::MAX), Value::Int(2)]),
            Err(EvalError::NumericOverflow { name: "lcm", .. })
        ));
        assert_eq!(comb(&[Value::Int(5), Value::Int(2)]), Ok(Value::Int(10)));
        assert_eq!(comb(&[Value::Int(5), Value::Int(0)]), Ok(Value::Int(1)));
        assert_eq!(comb(&[Value::Int(2), Value::Int(5)]), Ok(Value::Int(0)));
        assert_eq!(comb(&[Value::Int(60), Value::Int(30)]), Ok(Value::Int(118264581564861424)));
        assert_eq!(
            comb(&[Value::Int(100), Value::Int(50)]),
            Err(EvalError::ResultTooLarge { name: "comb", arg: 100 })
        );
        assert_eq!(comb(&[Value::Int(-1), Value::Int(1)]), Err(EvalError::MathDomain("comb")));
        assert_eq!(perm(&[Value::Int(5), Value::Int(2)]), Ok(Value::Int(20)));
        assert_eq!(perm(&[Value::Int(4)]), Ok(Value::Int(24)));
        assert_eq!(perm(&[Value::Int(3), Value::Int(4)]), Ok(Value::Int(0)));
        assert_eq!(
            perm(&[Value::Int(30)]),
            Err(EvalError::ResultTooLarge { name: "perm", arg: 30 })
        );
    }

    #[test]
    fn test_ns_is_complete() {
        let ns = ns();
        let names = [
            "+", "-", "*", "/", ">", "<", ">=", "<=", "==", "^", "!", "%", "True", "False", "pi",
            "e", "tau", "inf", "nan", "log", "cbrt", "exp2", "expm1", "log1p", "lcm", "comb",
            "perm", "ldexp", "remainder",
        ];
        for name in names {
            assert!(ns.iter().any(|(n, _)| *n == name), "missing {}", name);
        }
        assert!(ns.iter().any(|(n, v)| *n == "log"
            && matches!(v, Value::Primitive { arity, .. } if *arity == (1..=2))));
    }

    #[test]
    fn test_ensure_len() {
        assert_eq!(ensure_len(2, &(2..=2), "+"), Ok(()));
        assert_eq!(ensure_len(1, &(1..=2), "log"), Ok(()));
        assert_eq!(
            ensure_len(3, &(1..=2), "log"),
            Err(EvalError::ArgumentCount {
                name: "log",
                expected: 2,
                provided: 3
            })
        );
        assert_eq!(
            ensure_len(1, &(2..=2), "+"),
            Err(EvalError::ArgumentCount {
                name: "+",
                expected: 2,
                provided: 1
            })
        );
    }
}
