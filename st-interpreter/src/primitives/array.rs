use std::cell::RefCell;
use std::convert::TryFrom;
use std::rc::Rc;

use crate::expect_args;
use crate::invokable::{Invoke, Return};
use crate::primitives::PrimitiveFn;
use crate::propagate;
use crate::universe::Universe;
use crate::value::Value;

pub static INSTANCE_PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("at:", self::at),
    ("at:put:", self::at_put),
    ("size", self::length),
    ("length", self::length),
    ("do:", self::do_each),
];

pub static CLASS_PRIMITIVES: &[(&str, PrimitiveFn)] = &[("new", self::new_empty), ("new:", self::new)];

fn checked_index(universe: &Universe, signature: &str, index: i64, len: usize) -> Result<usize, Return> {
    match usize::try_from(index - 1) {
        Ok(index) if index < len => Ok(index),
        _ => Err(universe.primitive_failed(format!(
            "'{}': index {} out of bounds (size {})",
            signature, index, len
        ))),
    }
}

fn at(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Array>>#at:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Array(values) => values,
        Value::Integer(index) => index,
    ]);

    let len = values.borrow().len();
    let index = match checked_index(universe, SIGNATURE, index, len) {
        Ok(index) => index,
        Err(ret) => return ret,
    };
    let value = values.borrow()[index].clone();
    Return::Local(value)
}

fn at_put(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Array>>#at:put:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Array(values) => values,
        Value::Integer(index) => index,
        value => value,
    ]);

    let len = values.borrow().len();
    let index = match checked_index(universe, SIGNATURE, index, len) {
        Ok(index) => index,
        Err(ret) => return ret,
    };
    values.borrow_mut()[index] = value.clone();
    Return::Local(value)
}

fn length(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Array>>#length";

    expect_args!(SIGNATURE, universe, args, [
        Value::Array(values) => values,
    ]);

    let length = values.borrow().len();
    match i64::try_from(length) {
        Ok(length) => Return::Local(Value::Integer(length)),
        Err(err) => universe.primitive_failed(format!("'{}': {}", SIGNATURE, err)),
    }
}

fn do_each(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Array>>#do:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Array(values) => values,
        Value::Block(block) => block,
    ]);

    let mut index = 0;
    loop {
        let value = match values.borrow().get(index) {
            Some(value) => value.clone(),
            None => break,
        };
        propagate!(block.invoke(universe, vec![value]));
        index += 1;
    }

    Return::Local(Value::Array(values))
}

fn new_empty(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Array class>>#new";

    expect_args!(SIGNATURE, universe, args, [_]);

    Return::Local(Value::Array(Rc::new(RefCell::new(Vec::new()))))
}

fn new(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Array class>>#new:";

    expect_args!(SIGNATURE, universe, args, [
        _,
        Value::Integer(count) => count,
    ]);

    match usize::try_from(count) {
        Ok(length) => Return::Local(Value::Array(Rc::new(RefCell::new(vec![
            Value::Nil;
            length
        ])))),
        Err(err) => universe.primitive_failed(format!("'{}': {}", SIGNATURE, err)),
    }
}
