use crate::exception::handles;
use crate::expect_args;
use crate::invokable::{Invoke, Return};
use crate::primitives::PrimitiveFn;
use crate::propagate;
use crate::universe::Universe;
use crate::value::Value;

pub static INSTANCE_PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("value", self::value),
    ("value:", self::value),
    ("value:value:", self::value),
    ("value:value:value:", self::value),
    ("valueWithArguments:", self::value_with_arguments),
    ("numArgs", self::num_args),
    ("whileTrue:", self::while_true),
    ("whileFalse:", self::while_false),
    ("on:do:", self::on_do),
    ("ensure:", self::ensure),
    ("ifCurtailed:", self::if_curtailed),
];

/// Evaluate `action` with `arg` if it is a one-parameter block, or without any argument otherwise.
pub fn cull(universe: &mut Universe, action: Value, arg: Value) -> Return {
    match action {
        Value::Block(block) if block.nb_parameters() > 0 => block.invoke(universe, vec![arg]),
        action => universe.value_of(action),
    }
}

fn value(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Block>>#value";

    let mut args = args.into_iter();
    let block = match args.next() {
        Some(Value::Block(block)) => block,
        _ => return universe.primitive_failed(format!("'{}': wrong type(s)", SIGNATURE)),
    };

    block.invoke(universe, args.collect())
}

fn value_with_arguments(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Block>>#valueWithArguments:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Block(block) => block,
        Value::Array(values) => values,
    ]);

    let values = values.borrow().clone();
    block.invoke(universe, values)
}

fn num_args(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Block>>#numArgs";

    expect_args!(SIGNATURE, universe, args, [
        Value::Block(block) => block,
    ]);

    Return::Local(Value::Integer(block.nb_parameters() as i64))
}

fn while_loop(universe: &mut Universe, args: Vec<Value>, signature: &str, expected: bool) -> Return {
    expect_args!(signature, universe, args, [
        Value::Block(condition) => condition,
        body => body,
    ]);

    loop {
        match propagate!(condition.invoke(universe, Vec::new())) {
            Value::Boolean(value) if value == expected => {
                propagate!(universe.value_of(body.clone()));
            }
            Value::Boolean(_) => break,
            _ => {
                return universe.primitive_failed(format!(
                    "'{}': the condition did not evaluate to a boolean",
                    signature
                ))
            }
        }
    }

    Return::Local(Value::Nil)
}

fn while_true(universe: &mut Universe, args: Vec<Value>) -> Return {
    while_loop(universe, args, "Block>>#whileTrue:", true)
}

fn while_false(universe: &mut Universe, args: Vec<Value>) -> Return {
    while_loop(universe, args, "Block>>#whileFalse:", false)
}

fn on_do(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Block>>#on:do:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Block(protected) => protected,
        selector => selector,
        handler => handler,
    ]);

    if !matches!(selector, Value::Class(_) | Value::ExceptionSet(_)) {
        return universe.primitive_failed(format!(
            "'{}': the handled selector must be a class or an exception set",
            SIGNATURE
        ));
    }

    match protected.invoke(universe, Vec::new()) {
        Return::Signal(exception) => {
            let caught = handles(&selector, &exception.borrow()).unwrap_or(false);
            if caught {
                tracing::debug!(
                    class = %exception.borrow().class().borrow().name(),
                    "condition handled"
                );
                cull(universe, handler, Value::Exception(exception))
            } else {
                Return::Signal(exception)
            }
        }
        ret => ret,
    }
}

fn ensure(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Block>>#ensure:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Block(protected) => protected,
        action => action,
    ]);

    let output = protected.invoke(universe, Vec::new());
    propagate!(universe.value_of(action));
    output
}

fn if_curtailed(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Block>>#ifCurtailed:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Block(protected) => protected,
        action => action,
    ]);

    match protected.invoke(universe, Vec::new()) {
        Return::Signal(exception) => {
            propagate!(universe.value_of(action));
            Return::Signal(exception)
        }
        ret => ret,
    }
}
