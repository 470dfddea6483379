use std::cell::RefCell;
use std::rc::Rc;

use crate::class::{is_subclass_of, Class};
use crate::expect_args;
use crate::instance::Instance;
use crate::invokable::Return;
use crate::method::signature_arity;
use crate::primitives::PrimitiveFn;
use crate::universe::Universe;
use crate::value::Value;
use crate::STRef;

pub static INSTANCE_PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("new", self::new),
    ("name", self::name),
    ("superclass", self::superclass),
    ("subclass:", self::subclass),
    ("subclass:instanceVariableNames:", self::subclass_with_fields),
    ("new:super:", self::new_super),
    ("define:as:", self::define_as),
    ("includesSelector:", self::includes_selector),
    ("inheritsFrom:", self::inherits_from),
    ("selectors", self::selectors),
];

fn new(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Class>>#new";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
    ]);

    let instance = Instance::from_class(class);
    let instance = Rc::new(RefCell::new(instance));
    Return::Local(Value::Instance(instance))
}

fn name(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Class>>#name";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
    ]);

    let name = class.borrow().name().to_string();
    Return::Local(Value::string(name))
}

fn superclass(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Class>>#superclass";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
    ]);

    let super_class = class.borrow().super_class();
    Return::Local(super_class.map(Value::Class).unwrap_or(Value::Nil))
}

fn create(
    universe: &mut Universe,
    name: &Value,
    super_class: &STRef<Class>,
    fields: &[String],
) -> Return {
    let name = match name {
        Value::Symbol(name) | Value::String(name) => name.clone(),
        _ => return universe.primitive_failed("a class name must be a symbol or a string"),
    };
    match universe.create_class(name.as_str(), super_class, fields) {
        Ok(class) => Return::Local(Value::Class(class)),
        Err(err) => universe.primitive_failed(err.to_string()),
    }
}

fn subclass(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Class>>#subclass:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
        name => name,
    ]);

    create(universe, &name, &class, &[])
}

fn subclass_with_fields(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Class>>#subclass:instanceVariableNames:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
        name => name,
        Value::String(fields) => fields,
    ]);

    let fields: Vec<String> = fields.split_whitespace().map(String::from).collect();
    create(universe, &name, &class, &fields)
}

fn new_super(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Class>>#new:super:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(_),
        name => name,
        Value::Class(super_class) => super_class,
    ]);

    create(universe, &name, &super_class, &[])
}

fn define_as(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Class>>#define:as:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
        Value::Symbol(selector) => selector,
        Value::Block(block) => block,
    ]);

    let expected = signature_arity(selector.as_str());
    if block.nb_parameters() != expected {
        return universe.wrong_argument_count(expected, block.nb_parameters());
    }

    let defined = universe.define_method_from_block(
        &class,
        selector.as_str(),
        block.block.clone(),
        block.frame.clone(),
    );
    match defined {
        Ok(()) => Return::Local(Value::Class(class)),
        Err(err) => universe.primitive_failed(err.to_string()),
    }
}

fn includes_selector(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Class>>#includesSelector:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
        Value::Symbol(selector) => selector,
    ]);

    let found = class.borrow().methods.contains_key(selector.as_str());
    Return::Local(Value::Boolean(found))
}

fn inherits_from(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Class>>#inheritsFrom:";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
        Value::Class(ancestor) => ancestor,
    ]);

    let inherits = !Rc::ptr_eq(&class, &ancestor) && is_subclass_of(&class, &ancestor);
    Return::Local(Value::Boolean(inherits))
}

fn selectors(universe: &mut Universe, args: Vec<Value>) -> Return {
    const SIGNATURE: &str = "Class>>#selectors";

    expect_args!(SIGNATURE, universe, args, [
        Value::Class(class) => class,
    ]);

    let selectors = class
        .borrow()
        .methods
        .keys()
        .map(|selector| Value::symbol(selector.as_str()))
        .collect();

    Return::Local(Value::Array(Rc::new(RefCell::new(selectors))))
}
