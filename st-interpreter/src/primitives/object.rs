use std::rc::Rc;

use crate::class::is_subclass_of;
use crate::expect_args;
use crate::invokable::Return;
use crate::method::signature_arity;
use crate::primitives::blocks::cull;
use crate::primitives::PrimitiveFn;
use crate::universe::Universe;
use crate::value::Value;

pub static INSTANCE_PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("==", self::eq),
    ("~~", self::not_eq),
    ("=", self::equals),
    ("~=", self::not_equals),
    ("class", self::class),
    ("isNil", self::is_nil),
    ("notNil", self::not_nil),
    ("ifNil:", self::if_nil),
    ("ifNotNil:", self::if_not_nil),
    ("ifNil:ifNotNil:", self::if_nil_if_not_nil),
    ("printString", self::print_string),
    ("respondsTo:", self::responds_to),
    ("isKindOf:", self::is_kind_of),
    ("perform:", self::perform),
    ("perform:with:", self::perform_with),
    ("instVarNamed:", self::inst_var_named),
    ("instVarNamed:put:", self::inst_var_named_put),
    ("error:", self::error),
    ("doesNotUnderstand:", self::does_not_understand),
    ("value", self::yourself),
    ("yourself", self::yourself),
];

pub static NIL_PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("isNil", self::nil_is_nil),
    ("notNil", self::nil_not_nil),
    ("ifNil:", self::nil_if_nil),
    ("ifNotNil:", self::nil_if_not_nil),
    ("ifNil:ifNotNil:", self::nil_if_nil_if_not_nil),
];

/// Identity: strings are compared by reference, immediates by value.
fn identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Rc::ptr_eq(a, b),
        (a, b) => a == b,
    }
}

fn selector_name(value: &Value) -> Option<&str> {
    match value {
        Value::Symbol(sym) => Some(sym.as_str()),
        Value::String(string) => Some(string.as_str()),
        _ => None,
    }
}

fn eq(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#==";

    expect_args!(SIGNATURE, universe, args, [
        a => a,
        b => b,
    ]);

    Return::Local(Value::Boolean(identical(&a, &b)))
}

fn not_eq(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#~~";

    expect_args!(SIGNATURE, universe, args, [
        a => a,
        b => b,
    ]);

    Return::Local(Value::Boolean(!identical(&a, &b)))
}

fn equals(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#=";

    expect_args!(SIGNATURE, universe, args, [
        a => a,
        b => b,
    ]);

    Return::Local(Value::Boolean(a == b))
}

fn not_equals(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#~=";

    expect_args!(SIGNATURE, universe, args, [
        a => a,
        b => b,
    ]);

    match universe.send(a, "=", vec![b]) {
        Return::Local(Value::Boolean(value)) => Return::Local(Value::Boolean(!value)),
        Return::Local(_) => universe.primitive_failed(format!("'{}': `=` did not answer a boolean", SIGNATURE)),
        ret => ret,
    }
}

fn class(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#class";

    expect_args!(SIGNATURE, universe, args, [
        object => object,
    ]);

    Return::Local(Value::Class(object.class(universe)))
}

fn is_nil(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#isNil";

    expect_args!(SIGNATURE, universe, args, [_]);

    Return::Local(Value::Boolean(false))
}

fn not_nil(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#notNil";

    expect_args!(SIGNATURE, universe, args, [_]);

    Return::Local(Value::Boolean(true))
}

fn if_nil(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#ifNil:";

    expect_args!(SIGNATURE, universe, args, [
        object => object,
        _,
    ]);

    Return::Local(object)
}

fn if_not_nil(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#ifNotNil:";

    expect_args!(SIGNATURE, universe, args, [
        object => object,
        action => action,
    ]);

    cull(universe, action, object)
}

fn if_nil_if_not_nil(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#ifNil:ifNotNil:";

    expect_args!(SIGNATURE, universe, args, [
        object => object,
        _,
        action => action,
    ]);

    cull(universe, action, object)
}

fn print_string(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#printString";

    expect_args!(SIGNATURE, universe, args, [
        object => object,
    ]);

    Return::Local(Value::string(object.to_string(universe)))
}

fn responds_to(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#respondsTo:";

    expect_args!(SIGNATURE, universe, args, [
        object => object,
        selector => selector,
    ]);

    let selector = match selector_name(&selector) {
        Some(selector) => selector,
        None => return universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
    };

    let found = object.lookup_method(universe, selector).is_some();
    Return::Local(Value::Boolean(found))
}

fn is_kind_of(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#isKindOf:";

    expect_args!(SIGNATURE, universe, args, [
        object => object,
        Value::Class(class) => class,
    ]);

    let object_class = object.class(universe);
    Return::Local(Value::Boolean(is_subclass_of(&object_class, &class)))
}

fn perform(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#perform:";

    expect_args!(SIGNATURE, universe, args, [
        object => object,
        selector => selector,
    ]);

    send_performed(universe, SIGNATURE, object, &selector, Vec::new())
}

fn perform_with(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#perform:with:";

    expect_args!(SIGNATURE, universe, args, [
        object => object,
        selector => selector,
        argument => argument,
    ]);

    send_performed(universe, SIGNATURE, object, &selector, vec![argument])
}

fn send_performed(
    universe: &mut Universe,
    signature: &str,
    receiver: Value,
    selector: &Value,
    args: Vec<Value>,
) -> Return {
    let selector = match selector_name(selector) {
        Some(selector) => selector.to_string(),
        None => return universe.primitive_failed(format!("'{}': wrong type(s)", signature)),
    };
    let expected = signature_arity(&selector);
    if expected != args.len() {
        return universe.wrong_argument_count(expected, args.len());
    }
    universe.send(receiver, &selector, args)
}

fn inst_var_named(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#instVarNamed:";

    expect_args!(SIGNATURE, universe, args, [
        object => object,
        name => name,
    ]);

    let local = selector_name(&name).and_then(|name| object.lookup_local(name));
    match local {
        Some(value) => Return::Local(value),
        None => universe.primitive_failed(format!(
            "'{}': no instance variable named {}",
            SIGNATURE,
            name.to_string(universe),
        )),
    }
}

fn inst_var_named_put(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#instVarNamed:put:";

    expect_args!(SIGNATURE, universe, args, [
        object => object,
        name => name,
        value => value,
    ]);

    let assigned = selector_name(&name).and_then(|name| object.assign_local(name, value.clone()));
    match assigned {
        Some(()) => Return::Local(value),
        None => universe.primitive_failed(format!(
            "'{}': no instance variable named {}",
            SIGNATURE,
            name.to_string(universe),
        )),
    }
}

fn error(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#error:";

    expect_args!(SIGNATURE, universe, args, [
        _,
        message => message,
    ]);

    let message = match message {
        Value::String(message) | Value::Symbol(message) => message.to_string(),
        message => message.to_string(universe),
    };

    universe.signal_new(universe.error_class(), message)
}

fn does_not_understand(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#doesNotUnderstand:";

    expect_args!(SIGNATURE, universe, args, [
        _,
        Value::Exception(exception) => exception,
    ]);

    universe.signal(exception)
}

fn yourself(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Object>>#yourself";

    expect_args!(SIGNATURE, universe, args, [
        object => object,
    ]);

    Return::Local(object)
}

fn nil_is_nil(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "UndefinedObject>>#isNil";

    expect_args!(SIGNATURE, universe, args, [Value::Nil]);

    Return::Local(Value::Boolean(true))
}

fn nil_not_nil(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "UndefinedObject>>#notNil";

    expect_args!(SIGNATURE, universe, args, [Value::Nil]);

    Return::Local(Value::Boolean(false))
}

fn nil_if_nil(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "UndefinedObject>>#ifNil:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Nil,
        action => action,
    ]);

    universe.value_of(action)
}

fn nil_if_not_nil(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "UndefinedObject>>#ifNotNil:";

    expect_args!(SIGNATURE, universe, args, [Value::Nil, _]);

    Return::Local(Value::Nil)
}

fn nil_if_nil_if_not_nil(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "UndefinedObject>>#ifNil:ifNotNil:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Nil,
        action => action,
        _,
    ]);

    universe.value_of(action)
}
