use st_core::ast::{Body, Expression};

use st_interpreter::exception::UncaughtCondition;
use st_interpreter::universe::Universe;
use st_interpreter::value::Value;

fn setup_universe() -> Universe {
    Universe::new().expect("could not setup test universe")
}

fn run(universe: &mut Universe, exprs: Vec<Expression>) -> Result<Value, UncaughtCondition> {
    universe.evaluate(&Body::new(exprs))
}

fn var(name: &str) -> Expression {
    Expression::reference(name)
}

fn int(value: i64) -> Expression {
    Expression::integer(value)
}

fn sym(value: &str) -> Expression {
    Expression::symbol(value)
}

fn send(receiver: Expression, signature: &str, values: Vec<Expression>) -> Expression {
    Expression::send(receiver, signature, values)
}

fn block(parameters: &[&str], exprs: Vec<Expression>) -> Expression {
    Expression::block(parameters, exprs)
}

fn assign(name: &str, value: Expression) -> Expression {
    Expression::assign(name, value)
}

/// `<class> define: #<selector> as: [:<parameters> | <exprs>]`
fn define(class: &str, selector: &str, parameters: &[&str], exprs: Vec<Expression>) -> Expression {
    send(
        var(class),
        "define:as:",
        vec![sym(selector), block(parameters, exprs)],
    )
}

#[test]
fn instance_variables_are_visible_from_methods() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![
            send(
                var("Object"),
                "subclass:instanceVariableNames:",
                vec![sym("Point"), Expression::string("x y")],
            ),
            define("Point", "x:", &["value"], vec![assign("x", var("value"))]),
            define("Point", "x", &[], vec![var("x")]),
            assign("p", send(var("Point"), "new", vec![])),
            send(var("p"), "x:", vec![int(3)]),
            send(var("p"), "x", vec![]),
        ],
    );

    assert_eq!(output, Ok(Value::Integer(3)));

    let fresh = run(
        &mut universe,
        vec![send(send(var("Point"), "new", vec![]), "instVarNamed:", vec![sym("y")])],
    );
    assert_eq!(fresh, Ok(Value::Nil));
}

#[test]
fn methods_see_self_and_inherit() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![
            send(var("Object"), "subclass:", vec![sym("Animal")]),
            send(var("Animal"), "subclass:", vec![sym("Dog")]),
            define("Animal", "speak", &[], vec![Expression::string("...")]),
            define(
                "Animal",
                "describe",
                &[],
                vec![send(
                    Expression::string("It says "),
                    ",",
                    vec![send(var("self"), "speak", vec![])],
                )],
            ),
            define("Dog", "speak", &[], vec![Expression::string("Woof")]),
            send(send(var("Dog"), "new", vec![]), "describe", vec![]),
        ],
    );

    assert_eq!(output, Ok(Value::string("It says Woof")));
}

#[test]
fn super_starts_lookup_above_the_holder() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![
            send(var("Object"), "subclass:", vec![sym("Base")]),
            send(var("Base"), "subclass:", vec![sym("Derived")]),
            send(var("Derived"), "subclass:", vec![sym("MostDerived")]),
            define("Base", "value", &[], vec![int(1)]),
            define(
                "Derived",
                "value",
                &[],
                vec![send(send(var("super"), "value", vec![]), "+", vec![int(10)])],
            ),
            send(send(var("MostDerived"), "new", vec![]), "value", vec![]),
        ],
    );

    assert_eq!(output, Ok(Value::Integer(11)));
}

#[test]
fn redefinition_replaces_the_method() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![
            send(var("Object"), "subclass:", vec![sym("Answer")]),
            define("Answer", "get", &[], vec![int(1)]),
            define("Answer", "get", &[], vec![int(2)]),
            send(send(var("Answer"), "new", vec![]), "get", vec![]),
        ],
    );

    assert_eq!(output, Ok(Value::Integer(2)));
}

#[test]
fn new_super_creates_a_class() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![
            send(var("Class"), "new:super:", vec![sym("Thing"), var("Object")]),
            send(var("Thing"), "superclass", vec![]),
        ],
    );

    assert_eq!(output, Ok(universe.lookup_global("Object").unwrap()));
}

#[test]
fn methods_close_over_their_defining_scope() {
    let mut universe = setup_universe();

    // base := 100. Object subclass: #Offset. Offset define: #apply: as: [:n | n + base]
    let output = run(
        &mut universe,
        vec![
            assign("base", int(100)),
            send(var("Object"), "subclass:", vec![sym("Offset")]),
            define("Offset", "apply:", &["n"], vec![send(var("n"), "+", vec![var("base")])]),
            assign("base", int(200)),
            send(send(var("Offset"), "new", vec![]), "apply:", vec![int(1)]),
        ],
    );

    assert_eq!(output, Ok(Value::Integer(201)));
}

#[test]
fn define_checks_the_block_arity() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![
            send(var("Object"), "subclass:", vec![sym("Broken")]),
            define("Broken", "at:put:", &["index"], vec![var("index")]),
        ],
    );

    assert_eq!(output.unwrap_err().class_name, "WrongArgumentCount");
}

#[test]
fn does_not_understand_can_be_overridden() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![
            send(var("Object"), "subclass:", vec![sym("Ghost")]),
            define(
                "Ghost",
                "doesNotUnderstand:",
                &["condition"],
                vec![send(var("condition"), "selector", vec![])],
            ),
            send(send(var("Ghost"), "new", vec![]), "boo", vec![]),
        ],
    );

    assert_eq!(output, Ok(Value::symbol("boo")));
}

#[test]
fn reflection() {
    let mut universe = setup_universe();

    run(
        &mut universe,
        vec![
            send(var("Object"), "subclass:", vec![sym("Shape")]),
            define("Shape", "area", &[], vec![int(0)]),
        ],
    )
    .unwrap();

    let tests: &[(Expression, Value)] = &[
        (send(send(int(3), "class", vec![]), "name", vec![]), Value::string("Integer")),
        (
            send(send(var("Shape"), "class", vec![]), "name", vec![]),
            Value::string("Shape class"),
        ),
        (
            send(send(send(var("Shape"), "class", vec![]), "class", vec![]), "name", vec![]),
            Value::string("Metaclass"),
        ),
        (
            send(var("ZeroDivide"), "inheritsFrom:", vec![var("Error")]),
            Value::Boolean(true),
        ),
        (
            send(var("Error"), "inheritsFrom:", vec![var("Error")]),
            Value::Boolean(false),
        ),
        (
            send(var("Shape"), "includesSelector:", vec![sym("area")]),
            Value::Boolean(true),
        ),
        (
            send(send(var("Shape"), "new", vec![]), "respondsTo:", vec![sym("area")]),
            Value::Boolean(true),
        ),
        (
            send(int(3), "respondsTo:", vec![sym("area")]),
            Value::Boolean(false),
        ),
        (
            send(send(var("Shape"), "new", vec![]), "isKindOf:", vec![var("Object")]),
            Value::Boolean(true),
        ),
        (
            send(send(var("Shape"), "new", vec![]), "printString", vec![]),
            Value::string("a Shape"),
        ),
        (
            send(int(6), "perform:with:", vec![sym("*"), int(7)]),
            Value::Integer(42),
        ),
        (send(var("nil"), "isNil", vec![]), Value::Boolean(true)),
        (send(int(0), "isNil", vec![]), Value::Boolean(false)),
    ];

    for (expr, expected) in tests {
        let output = universe.evaluate_expression(expr);
        assert_eq!(output.as_ref(), Ok(expected), "evaluating {:?}", expr);
    }
}

#[test]
fn methods_can_be_defined_from_rust() {
    let mut universe = setup_universe();
    let integer_class = universe.integer_class();

    universe
        .define_method(
            &integer_class,
            "double",
            &[],
            vec![send(var("self"), "*", vec![int(2)])],
        )
        .unwrap();
    assert!(universe
        .define_method(&integer_class, "plus:", &[], vec![var("self")])
        .is_err());

    let output = universe.evaluate_expression(&send(int(21), "double", vec![]));
    assert_eq!(output, Ok(Value::Integer(42)));
}

#[test]
fn classes_can_be_created_from_rust() {
    let mut universe = setup_universe();
    let object_class = universe.object_class();

    let point = universe
        .create_class("Point", &object_class, &["x".to_string(), "y".to_string()])
        .unwrap();
    assert!(universe
        .create_class("Point3D", &point, &["x".to_string()])
        .is_err());

    let output = run(
        &mut universe,
        vec![send(send(var("Point"), "new", vec![]), "instVarNamed:", vec![sym("x")])],
    );
    assert_eq!(output, Ok(Value::Nil));
}
