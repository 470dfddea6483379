use crate::expect_args;
use crate::invokable::Return;
use crate::primitives::PrimitiveFn;
use crate::universe::Universe;
use crate::value::Value;

pub static INSTANCE_PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("ifTrue:", self::if_true),
    ("ifFalse:", self::if_false),
    ("ifTrue:ifFalse:", self::if_true_if_false),
    ("ifFalse:ifTrue:", self::if_false_if_true),
    ("not", self::not),
    ("&", self::and),
    ("|", self::or),
    ("and:", self::and_lazy),
    ("or:", self::or_lazy),
];

fn if_true(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Boolean>>#ifTrue:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Boolean(condition) => condition,
        action => action,
    ]);

    if condition {
        universe.value_of(action)
    } else {
        Return::Local(Value::Nil)
    }
}

fn if_false(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Boolean>>#ifFalse:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Boolean(condition) => condition,
        action => action,
    ]);

    if condition {
        Return::Local(Value::Nil)
    } else {
        universe.value_of(action)
    }
}

fn if_true_if_false(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Boolean>>#ifTrue:ifFalse:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Boolean(condition) => condition,
        on_true => on_true,
        on_false => on_false,
    ]);

    universe.value_of(if condition { on_true } else { on_false })
}

fn if_false_if_true(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Boolean>>#ifFalse:ifTrue:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Boolean(condition) => condition,
        on_false => on_false,
        on_true => on_true,
    ]);

    universe.value_of(if condition { on_true } else { on_false })
}

fn not(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Boolean>>#not";

    expect_args!(SIGNATURE, universe, args, [
        Value::Boolean(value) => value,
    ]);

    Return::Local(Value::Boolean(!value))
}

fn and(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Boolean>>#&";

    expect_args!(SIGNATURE, universe, args, [
        Value::Boolean(a) => a,
        Value::Boolean(b) => b,
    ]);

    Return::Local(Value::Boolean(a && b))
}

fn or(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Boolean>>#|";

    expect_args!(SIGNATURE, universe, args, [
        Value::Boolean(a) => a,
        Value::Boolean(b) => b,
    ]);

    Return::Local(Value::Boolean(a || b))
}

fn and_lazy(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Boolean>>#and:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Boolean(a) => a,
        other => other,
    ]);

    if a {
        universe.value_of(other)
    } else {
        Return::Local(Value::Boolean(false))
    }
}

fn or_lazy(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Boolean>>#or:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Boolean(a) => a,
        other => other,
    ]);

    if a {
        Return::Local(Value::Boolean(true))
    } else {
        universe.value_of(other)
    }
}
