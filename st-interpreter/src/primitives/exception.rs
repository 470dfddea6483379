use std::cell::RefCell;
use std::rc::Rc;

use crate::class::Class;
use crate::exception::Exception;
use crate::expect_args;
use crate::invokable::Return;
use crate::primitives::PrimitiveFn;
use crate::universe::Universe;
use crate::value::Value;
use crate::STRef;

pub static INSTANCE_PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("signal", self::signal),
    ("signal:", self::signal_with),
    ("pass", self::signal),
    ("messageText", self::message_text),
    ("messageText:", self::set_message_text),
    ("description", self::description),
    ("receiver", self::receiver),
    ("selector", self::selector),
    ("arguments", self::arguments),
];

pub static CLASS_PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("new", self::new),
    ("new:", self::new_with),
    ("signal", self::class_signal),
    ("signal:", self::class_signal_with),
    (",", self::class_join),
];

pub static EXCEPTION_SET_PRIMITIVES: &[(&str, PrimitiveFn)] = &[(",", self::set_join)];

fn text_of(universe: &Universe, value: Value) -> String {
    match value {
        Value::String(text) | Value::Symbol(text) => text.to_string(),
        value => value.to_string(universe),
    }
}

fn signal(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception>>#signal";

    expect_args!(SIGNATURE, universe, args, [
        Value::Exception(exception) => exception,
    ]);

    universe.signal(exception)
}

fn signal_with(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception>>#signal:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Exception(exception) => exception,
        text => text,
    ]);

    exception.borrow_mut().message_text = Some(text_of(universe, text));
    universe.signal(exception)
}

fn message_text(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception>>#messageText";

    expect_args!(SIGNATURE, universe, args, [
        Value::Exception(exception) => exception,
    ]);

    let text = exception.borrow().description();
    Return::Local(Value::string(text))
}

fn set_message_text(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception>>#messageText:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Exception(exception) => exception,
        text => text,
    ]);

    exception.borrow_mut().message_text = Some(text_of(universe, text));
    Return::Local(Value::Exception(exception))
}

fn description(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception>>#description";

    expect_args!(SIGNATURE, universe, args, [
        exception => exception,
    ]);

    Return::Local(Value::string(exception.to_string(universe)))
}

fn receiver(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception>>#receiver";

    expect_args!(SIGNATURE, universe, args, [
        Value::Exception(exception) => exception,
    ]);

    let exception = exception.borrow();
    let receiver = exception.not_understood.as_ref().map(|payload| payload.receiver.clone());
    Return::Local(receiver.unwrap_or(Value::Nil))
}

fn selector(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception>>#selector";

    expect_args!(SIGNATURE, universe, args, [
        Value::Exception(exception) => exception,
    ]);

    let exception = exception.borrow();
    let selector = exception
        .not_understood
        .as_ref()
        .map(|payload| Value::symbol(payload.selector.as_str()));
    Return::Local(selector.unwrap_or(Value::Nil))
}

fn arguments(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception>>#arguments";

    expect_args!(SIGNATURE, universe, args, [
        Value::Exception(exception) => exception,
    ]);

    let exception = exception.borrow();
    let arguments = exception
        .not_understood
        .as_ref()
        .map(|payload| Value::Array(Rc::new(RefCell::new(payload.arguments.clone()))));
    Return::Local(arguments.unwrap_or(Value::Nil))
}

fn new(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception class>>#new";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
    ]);

    let exception = Exception::from_class(class);
    Return::Local(Value::Exception(Rc::new(RefCell::new(exception))))
}

fn new_with(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception class>>#new:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
        text => text,
    ]);

    let exception = Exception::with_message(class, text_of(universe, text));
    Return::Local(Value::Exception(Rc::new(RefCell::new(exception))))
}

fn class_signal(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception class>>#signal";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
    ]);

    let exception = Exception::from_class(class);
    universe.signal(Rc::new(RefCell::new(exception)))
}

fn class_signal_with(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception class>>#signal:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
        text => text,
    ]);

    let text = text_of(universe, text);
    universe.signal_new(class, text)
}

fn joined(
    universe: &mut Universe,
    signature: &str,
    mut classes: Vec<STRef<Class>>,
    other: Value,
) -> Return {
    match other {
        Value::Class(class) => classes.push(class),
        Value::ExceptionSet(others) => classes.extend(others.iter().cloned()),
        _ => return universe.primitive_failed(format!("'{}': wrong type(s)", signature)),
    }
    Return::Local(Value::ExceptionSet(Rc::new(classes)))
}

fn class_join(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Exception class>>#,";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
        other => other,
    ]);

    joined(universe, SIGNATURE, vec![class], other)
}

fn set_join(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "ExceptionSet>>#,";

    expect_args!(SIGNATURE, universe, args, [
        Value::ExceptionSet(classes) => classes,
        other => other,
    ]);

    joined(universe, SIGNATURE, (*classes).clone(), other)
}
