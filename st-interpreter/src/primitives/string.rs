use std::convert::TryFrom;
use std::rc::Rc;

use crate::expect_args;
use crate::invokable::Return;
use crate::primitives::PrimitiveFn;
use crate::universe::Universe;
use crate::value::Value;

pub static INSTANCE_PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    (",", self::concatenate),
    ("size", self::length),
    ("length", self::length),
    ("=", self::eq),
    ("asSymbol", self::as_symbol),
    ("asString", self::as_string),
    ("printString", self::print_string),
];

pub static SYMBOL_PRIMITIVES: &[(&str, PrimitiveFn)] = &[("asString", self::symbol_as_string)];

fn text(value: &Value) -> Option<&Rc<String>> {
    match value {
        Value::String(value) | Value::Symbol(value) => Some(value),
        _ => None,
    }
}

fn concatenate(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "String>>#,";

    expect_args!(SIGNATURE, universe, args, [
        s1 => s1,
        s2 => s2,
    ]);

    match (text(&s1), text(&s2)) {
        (Some(s1), Some(s2)) => Return::Local(Value::string(format!("{}{}", s1, s2))),
        _ => universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
    }
}

fn length(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "String>>#length";

    expect_args!(SIGNATURE, universe, args, [
        value => value,
    ]);

    let value = match text(&value) {
        Some(value) => value,
        None => return universe.primitive_failed(format!("'{}': invalid self type", SIGNATURE)),
    };

    match i64::try_from(value.chars().count()) {
        Ok(length) => Return::Local(Value::Integer(length)),
        Err(err) => universe.primitive_failed(format!("'{}': {}", SIGNATURE, err)),
    }
}

fn eq(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "String>>#=";

    expect_args!(SIGNATURE, universe, args, [
        s1 => s1,
        s2 => s2,
    ]);

    let equal = match (&s1, &s2) {
        (Value::Symbol(_), Value::Symbol(_)) | (Value::String(_), Value::String(_)) => s1 == s2,
        _ => false,
    };
    Return::Local(Value::Boolean(equal))
}

fn as_symbol(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "String>>#asSymbol";

    expect_args!(SIGNATURE, universe, args, [
        value => value,
    ]);

    match value {
        Value::String(value) => Return::Local(Value::Symbol(value)),
        Value::Symbol(_) => Return::Local(value),
        _ => universe.primitive_failed(format!("'{}': invalid self type", SIGNATURE)),
    }
}

fn as_string(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "String>>#asString";

    expect_args!(SIGNATURE, universe, args, [
        Value::String(value) => value,
    ]);

    Return::Local(Value::String(value))
}

fn symbol_as_string(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Symbol>>#asString";

    expect_args!(SIGNATURE, universe, args, [
        Value::Symbol(value) => value,
    ]);

    Return::Local(Value::string(value.as_str()))
}

fn print_string(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "String>>#printString";

    expect_args!(SIGNATURE, universe, args, [
        value => value,
    ]);

    match value {
        Value::String(value) => Return::Local(Value::string(format!("'{}'", value.replace('\'', "''")))),
        Value::Symbol(_) => Return::Local(Value::string(value.to_string(universe))),
        _ => universe.primitive_failed(format!("'{}': invalid self type", SIGNATURE)),
    }
}
