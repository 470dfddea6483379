use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use rand::distributions::Uniform;
use rand::Rng;

use crate::expect_args;
use crate::invokable::{Invoke, Return};
use crate::primitives::PrimitiveFn;
use crate::propagate;
use crate::universe::Universe;
use crate::value::Value;

pub static INSTANCE_PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("+", self::plus),
    ("-", self::minus),
    ("*", self::times),
    ("/", self::divide),
    ("\\\\", self::modulo),
    ("rem:", self::remainder),
    ("<", self::lt),
    (">", self::gt),
    ("<=", self::le),
    (">=", self::ge),
    ("=", self::eq),
    ("abs", self::abs),
    ("negated", self::negated),
    ("max:", self::max),
    ("min:", self::min),
    ("between:and:", self::between_and),
    ("asString", self::as_string),
    ("printString", self::as_string),
    ("atRandom", self::at_random),
    ("to:do:", self::to_do),
    ("timesRepeat:", self::times_repeat),
];

macro_rules! demote {
    ($expr:expr) => {{
        let value: BigInt = $expr;
        match value.to_i64() {
            Some(value) => Return::Local(Value::Integer(value)),
            None => Return::Local(Value::BigInteger(value)),
        }
    }};
}

fn to_bigint(value: &Value) -> Option<BigInt> {
    match value {
        Value::Integer(value) => Some(BigInt::from(*value)),
        Value::BigInteger(value) => Some(value.clone()),
        _ => None,
    }
}

fn compare(universe: &mut Universe, signature: &str, args: Vec<Value>) -> Result<Ordering, Return> {
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(Value::Integer(a)), Some(Value::Integer(b))) => Ok(a.cmp(&b)),
        (Some(a), Some(b)) => match (to_bigint(&a), to_bigint(&b)) {
            (Some(a), Some(b)) => Ok(a.cmp(&b)),
            _ => Err(universe.primitive_failed(format!("'{}': wrong type(s)", signature))),
        },
        _ => Err(universe.primitive_failed(format!("'{}': missing argument", signature))),
    }
}

fn plus(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#+";

    expect_args!(SIGNATURE, universe, args, [
        a => a,
        b => b,
    ]);

    match (a, b) {
        (Value::Integer(a), Value::Integer(b)) => match a.checked_add(b) {
            Some(value) => Return::Local(Value::Integer(value)),
            None => demote!(BigInt::from(a) + BigInt::from(b)),
        },
        (Value::BigInteger(a), Value::BigInteger(b)) => demote!(a + b),
        (Value::BigInteger(a), Value::Integer(b)) | (Value::Integer(b), Value::BigInteger(a)) => {
            demote!(a + BigInt::from(b))
        }
        _ => universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
    }
}

fn minus(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#-";

    expect_args!(SIGNATURE, universe, args, [
        a => a,
        b => b,
    ]);

    match (a, b) {
        (Value::Integer(a), Value::Integer(b)) => match a.checked_sub(b) {
            Some(value) => Return::Local(Value::Integer(value)),
            None => demote!(BigInt::from(a) - BigInt::from(b)),
        },
        (Value::BigInteger(a), Value::BigInteger(b)) => demote!(a - b),
        (Value::BigInteger(a), Value::Integer(b)) => demote!(a - BigInt::from(b)),
        (Value::Integer(a), Value::BigInteger(b)) => demote!(BigInt::from(a) - b),
        _ => universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
    }
}

fn times(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#*";

    expect_args!(SIGNATURE, universe, args, [
        a => a,
        b => b,
    ]);

    match (a, b) {
        (Value::Integer(a), Value::Integer(b)) => match a.checked_mul(b) {
            Some(value) => Return::Local(Value::Integer(value)),
            None => demote!(BigInt::from(a) * BigInt::from(b)),
        },
        (Value::BigInteger(a), Value::BigInteger(b)) => demote!(a * b),
        (Value::BigInteger(a), Value::Integer(b)) | (Value::Integer(b), Value::BigInteger(a)) => {
            demote!(a * BigInt::from(b))
        }
        _ => universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
    }
}

/// Quotient rounded toward negative infinity.
fn floor_div(a: &BigInt, b: &BigInt) -> BigInt {
    let quotient = a / b;
    let remainder = a % b;
    if !remainder.is_zero() && (remainder.is_negative() != b.is_negative()) {
        quotient - 1
    } else {
        quotient
    }
}

/// Remainder with the sign of the divisor.
fn floor_mod(a: &BigInt, b: &BigInt) -> BigInt {
    let remainder = a % b;
    if !remainder.is_zero() && (remainder.is_negative() != b.is_negative()) {
        remainder + b
    } else {
        remainder
    }
}

fn divide(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#/";

    expect_args!(SIGNATURE, universe, args, [
        a => a,
        b => b,
    ]);

    match (a, b) {
        (Value::Integer(_), Value::Integer(0)) => universe.zero_divide(),
        (Value::Integer(a), Value::Integer(b)) => match a.checked_div(b) {
            Some(quotient) if quotient * b == a || (a < 0) == (b < 0) => {
                Return::Local(Value::Integer(quotient))
            }
            Some(quotient) => Return::Local(Value::Integer(quotient - 1)),
            None => demote!(floor_div(&BigInt::from(a), &BigInt::from(b))),
        },
        (a, b) => match (to_bigint(&a), to_bigint(&b)) {
            (Some(_), Some(b)) if b.is_zero() => universe.zero_divide(),
            (Some(a), Some(b)) => demote!(floor_div(&a, &b)),
            _ => universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
        },
    }
}

fn modulo(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#\\\\";

    expect_args!(SIGNATURE, universe, args, [
        a => a,
        b => b,
    ]);

    match (to_bigint(&a), to_bigint(&b)) {
        (Some(_), Some(b)) if b.is_zero() => universe.zero_divide(),
        (Some(a), Some(b)) => demote!(floor_mod(&a, &b)),
        _ => universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
    }
}

fn remainder(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#rem:";

    expect_args!(SIGNATURE, universe, args, [
        a => a,
        b => b,
    ]);

    match (to_bigint(&a), to_bigint(&b)) {
        (Some(_), Some(b)) if b.is_zero() => universe.zero_divide(),
        (Some(a), Some(b)) => demote!(a % b),
        _ => universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
    }
}

fn lt(universe: &mut Universe, args: Vec<Value>) -> Return {
    match compare(universe, "Integer>>#<", args) {
        Ok(ordering) => Return::Local(Value::Boolean(ordering == Ordering::Less)),
        Err(ret) => ret,
    }
}

fn gt(universe: &mut Universe, args: Vec<Value>) -> Return {
    match compare(universe, "Integer>>#>", args) {
        Ok(ordering) => Return::Local(Value::Boolean(ordering == Ordering::Greater)),
        Err(ret) => ret,
    }
}

fn le(universe: &mut Universe, args: Vec<Value>) -> Return {
    match compare(universe, "Integer>>#<=", args) {
        Ok(ordering) => Return::Local(Value::Boolean(ordering != Ordering::Greater)),
        Err(ret) => ret,
    }
}

fn ge(universe: &mut Universe, args: Vec<Value>) -> Return {
    match compare(universe, "Integer>>#>=", args) {
        Ok(ordering) => Return::Local(Value::Boolean(ordering != Ordering::Less)),
        Err(ret) => ret,
    }
}

fn eq(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#=";

    expect_args!(SIGNATURE, universe, args, [
        a => a,
        b => b,
    ]);

    Return::Local(Value::Boolean(a == b))
}

fn abs(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#abs";

    expect_args!(SIGNATURE, universe, args, [
        value => value,
    ]);

    match value {
        Value::Integer(value) => match value.checked_abs() {
            Some(value) => Return::Local(Value::Integer(value)),
            None => demote!(BigInt::from(value).abs()),
        },
        Value::BigInteger(value) => demote!(value.abs()),
        _ => universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
    }
}

fn negated(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#negated";

    expect_args!(SIGNATURE, universe, args, [
        value => value,
    ]);

    match value {
        Value::Integer(value) => match value.checked_neg() {
            Some(value) => Return::Local(Value::Integer(value)),
            None => demote!(-BigInt::from(value)),
        },
        Value::BigInteger(value) => demote!(-value),
        _ => universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
    }
}

fn max(universe: &mut Universe, args: Vec<Value>) -> Return {
    let (a, b) = match (args.get(0).cloned(), args.get(1).cloned()) {
        (Some(a), Some(b)) => (a, b),
        _ => return universe.primitive_failed("'Integer>>#max:': missing argument"),
    };
    match compare(universe, "Integer>>#max:", args) {
        Ok(Ordering::Less) => Return::Local(b),
        Ok(_) => Return::Local(a),
        Err(ret) => ret,
    }
}

fn min(universe: &mut Universe, args: Vec<Value>) -> Return {
    let (a, b) = match (args.get(0).cloned(), args.get(1).cloned()) {
        (Some(a), Some(b)) => (a, b),
        _ => return universe.primitive_failed("'Integer>>#min:': missing argument"),
    };
    match compare(universe, "Integer>>#min:", args) {
        Ok(Ordering::Greater) => Return::Local(b),
        Ok(_) => Return::Local(a),
        Err(ret) => ret,
    }
}

fn between_and(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#between:and:";

    expect_args!(SIGNATURE, universe, args, [
        value => value,
        low => low,
        high => high,
    ]);

    let above = match compare(universe, SIGNATURE, vec![value.clone(), low]) {
        Ok(ordering) => ordering != Ordering::Less,
        Err(ret) => return ret,
    };
    let below = match compare(universe, SIGNATURE, vec![value, high]) {
        Ok(ordering) => ordering != Ordering::Greater,
        Err(ret) => return ret,
    };

    Return::Local(Value::Boolean(above && below))
}

fn as_string(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#asString";

    expect_args!(SIGNATURE, universe, args, [
        value => value,
    ]);

    let value = match value {
        Value::Integer(value) => value.to_string(),
        Value::BigInteger(value) => value.to_string(),
        _ => return universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
    };

    Return::Local(Value::string(value))
}

fn at_random(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#atRandom";

    expect_args!(SIGNATURE, universe, args, [
        value => value,
    ]);

    let chosen = match value {
        Value::Integer(value) if value >= 1 => {
            let distribution = Uniform::new_inclusive(1, value);
            let mut rng = rand::thread_rng();
            rng.sample(distribution)
        }
        Value::Integer(_) => {
            return universe.primitive_failed(format!(
                "'{}': the receiver must be strictly positive",
                SIGNATURE,
            ))
        }
        Value::BigInteger(_) => {
            return universe.primitive_failed(format!(
                "'{}': the range is too big to pick a random value from",
                SIGNATURE,
            ))
        }
        _ => return universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
    };

    Return::Local(Value::Integer(chosen))
}

fn to_do(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#to:do:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Integer(start) => start,
        Value::Integer(end) => end,
        Value::Block(block) => block,
    ]);

    for index in start..=end {
        propagate!(block.invoke(universe, vec![Value::Integer(index)]));
    }

    Return::Local(Value::Integer(start))
}

fn times_repeat(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Integer>>#timesRepeat:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Integer(count) => count,
        action => action,
    ]);

    for _ in 0..count.max(0) {
        propagate!(universe.value_of(action.clone()));
    }

    Return::Local(Value::Integer(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_rounds_toward_negative_infinity() {
        let big = |value: i64| BigInt::from(value);
        assert_eq!(floor_div(&big(7), &big(2)), big(3));
        assert_eq!(floor_div(&big(-7), &big(2)), big(-4));
        assert_eq!(floor_div(&big(7), &big(-2)), big(-4));
        assert_eq!(floor_div(&big(-8), &big(2)), big(-4));
        assert_eq!(floor_mod(&big(-7), &big(2)), big(1));
        assert_eq!(floor_mod(&big(7), &big(-2)), big(-1));
    }
}
