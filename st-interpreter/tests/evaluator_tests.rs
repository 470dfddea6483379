use st_core::ast::{Body, Expression};

use st_interpreter::config::{Policy, Strictness};
use st_interpreter::demos;
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

fn send(receiver: Expression, signature: &str, values: Vec<Expression>) -> Expression {
    Expression::send(receiver, signature, values)
}

fn block(parameters: &[&str], exprs: Vec<Expression>) -> Expression {
    Expression::block(parameters, exprs)
}

fn assign(name: &str, value: Expression) -> Expression {
    Expression::assign(name, value)
}

#[test]
fn factorial_of_five() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![
            demos::factorial_definition(),
            send(var("factorial"), "value:", vec![int(5)]),
        ],
    );

    assert_eq!(output, Ok(Value::Integer(120)));
}

#[test]
fn factorial_of_a_negative_number_is_handled() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![
            demos::factorial_definition(),
            demos::guarded_negative_factorial(),
        ],
    );

    assert_eq!(
        output,
        Ok(Value::string(
            "Error: Factorial not defined for negative numbers"
        ))
    );
}

#[test]
fn factorial_of_a_negative_number_is_uncaught_without_handler() {
    let mut universe = setup_universe();

    run(&mut universe, vec![demos::factorial_definition()]).unwrap();
    let output = run(
        &mut universe,
        vec![send(var("factorial"), "value:", vec![int(-5)])],
    );

    let condition = output.unwrap_err();
    assert_eq!(condition.class_name, "Error");
    assert_eq!(
        condition.message_text,
        "Factorial not defined for negative numbers"
    );
    assert_eq!(
        condition.to_string(),
        "Error: Factorial not defined for negative numbers"
    );
}

#[test]
fn factorial_promotes_to_big_integers() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![
            demos::factorial_definition(),
            send(var("factorial"), "value:", vec![int(30)]),
        ],
    );

    let expected = "265252859812191058636308480000000".parse().unwrap();
    assert_eq!(output, Ok(Value::BigInteger(expected)));
}

#[test]
fn definitions_persist_across_evaluations() {
    let mut universe = setup_universe();

    run(&mut universe, vec![assign("answer", int(42))]).unwrap();

    assert_eq!(run(&mut universe, vec![var("answer")]), Ok(Value::Integer(42)));
    assert_eq!(universe.lookup_global("answer"), Some(Value::Integer(42)));
}

#[test]
fn universes_are_independent() {
    let mut first = setup_universe();
    let mut second = setup_universe();

    run(&mut first, vec![assign("answer", int(42))]).unwrap();

    let output = run(&mut second, vec![var("answer")]);
    assert_eq!(output.unwrap_err().class_name, "UnboundVariable");
}

#[test]
fn empty_sequences_yield_nil() {
    let mut universe = setup_universe();

    assert_eq!(run(&mut universe, vec![]), Ok(Value::Nil));
    assert_eq!(
        run(&mut universe, vec![send(block(&[], vec![]), "value", vec![])]),
        Ok(Value::Nil)
    );
}

#[test]
fn blocks_share_their_captured_environment() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![
            assign("counter", int(0)),
            assign(
                "increment",
                block(
                    &[],
                    vec![assign("counter", send(var("counter"), "+", vec![int(1)]))],
                ),
            ),
            send(var("increment"), "value", vec![]),
            send(var("increment"), "value", vec![]),
            var("counter"),
        ],
    );

    assert_eq!(output, Ok(Value::Integer(2)));
}

#[test]
fn each_invocation_gets_fresh_parameters() {
    let mut universe = setup_universe();

    // adder := [:x | [:y | x + y]]
    let adder = block(
        &["x"],
        vec![block(&["y"], vec![send(var("x"), "+", vec![var("y")])])],
    );
    let output = run(
        &mut universe,
        vec![
            assign("adder", adder),
            assign("addOne", send(var("adder"), "value:", vec![int(1)])),
            assign("addFive", send(var("adder"), "value:", vec![int(5)])),
            send(
                send(var("addOne"), "value:", vec![int(10)]),
                "+",
                vec![send(var("addFive"), "value:", vec![int(10)])],
            ),
        ],
    );

    assert_eq!(output, Ok(Value::Integer(26)));
}

#[test]
fn block_locals_do_not_leak() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![
            send(block(&["x"], vec![assign("inner", var("x"))]), "value:", vec![int(3)]),
            var("inner"),
        ],
    );

    assert_eq!(output.unwrap_err().class_name, "UnboundVariable");
}

#[test]
fn receiver_is_evaluated_before_arguments() {
    let mut universe = setup_universe();

    // x := 1. (x := x * 10) + (x := x + 1)
    let output = run(
        &mut universe,
        vec![
            assign("x", int(1)),
            send(
                assign("x", send(var("x"), "*", vec![int(10)])),
                "+",
                vec![assign("x", send(var("x"), "+", vec![int(1)]))],
            ),
        ],
    );

    assert_eq!(output, Ok(Value::Integer(21)));
}

#[test]
fn unbound_references_signal() {
    let mut universe = setup_universe();

    let condition = run(&mut universe, vec![var("missing")]).unwrap_err();

    assert_eq!(condition.class_name, "UnboundVariable");
    assert_eq!(condition.message_text, "Variable not found: missing");
}

#[test]
fn arity_mismatch_is_strict_by_default() {
    let mut universe = setup_universe();

    let output = run(
        &mut universe,
        vec![send(block(&["x"], vec![var("x")]), "value", vec![])],
    );

    assert_eq!(output.unwrap_err().class_name, "WrongArgumentCount");
}

#[test]
fn arity_mismatch_can_be_lenient() {
    let strictness = Strictness {
        arity: Policy::Lenient,
        ..Strictness::default()
    };
    let mut universe = Universe::with_strictness(strictness).unwrap();

    let missing = run(
        &mut universe,
        vec![send(block(&["x"], vec![var("x")]), "value", vec![])],
    );
    let extra = run(
        &mut universe,
        vec![send(
            block(&["x"], vec![var("x")]),
            "value:value:",
            vec![int(1), int(2)],
        )],
    );

    assert_eq!(missing, Ok(Value::Nil));
    assert_eq!(extra, Ok(Value::Integer(1)));
}

#[test]
fn undeclared_assignment_is_lenient_by_default() {
    let mut universe = setup_universe();

    let output = run(&mut universe, vec![assign("fresh", int(3)), var("fresh")]);

    assert_eq!(output, Ok(Value::Integer(3)));
}

#[test]
fn undeclared_assignment_can_be_strict() {
    let mut universe = Universe::with_strictness(Strictness::strict()).unwrap();
    universe.assign_global("declared", Value::Nil);

    let declared = run(&mut universe, vec![assign("declared", int(4)), var("declared")]);
    let undeclared = run(&mut universe, vec![assign("undeclared", int(4))]);

    assert_eq!(declared, Ok(Value::Integer(4)));
    let condition = undeclared.unwrap_err();
    assert_eq!(condition.class_name, "UnboundVariable");
    assert_eq!(condition.message_text, "Variable not found: undeclared");
}

#[test]
fn loops_and_conditionals() {
    let mut universe = setup_universe();

    // i := 0. sum := 0. [i < 5] whileTrue: [i := i + 1. sum := sum + i]. sum
    let while_sum = run(
        &mut universe,
        vec![
            assign("i", int(0)),
            assign("sum", int(0)),
            send(
                block(&[], vec![send(var("i"), "<", vec![int(5)])]),
                "whileTrue:",
                vec![block(
                    &[],
                    vec![
                        assign("i", send(var("i"), "+", vec![int(1)])),
                        assign("sum", send(var("sum"), "+", vec![var("i")])),
                    ],
                )],
            ),
            var("sum"),
        ],
    );
    assert_eq!(while_sum, Ok(Value::Integer(15)));

    // total := 0. 1 to: 4 do: [:each | total := total + each]. total
    let to_do_sum = run(
        &mut universe,
        vec![
            assign("total", int(0)),
            send(
                int(1),
                "to:do:",
                vec![
                    int(4),
                    block(
                        &["each"],
                        vec![assign("total", send(var("total"), "+", vec![var("each")]))],
                    ),
                ],
            ),
            var("total"),
        ],
    );
    assert_eq!(to_do_sum, Ok(Value::Integer(10)));

    let skipped = run(
        &mut universe,
        vec![send(var("false"), "ifTrue:", vec![block(&[], vec![int(1)])])],
    );
    assert_eq!(skipped, Ok(Value::Nil));

    let non_block_branch = run(&mut universe, vec![send(var("true"), "ifTrue:", vec![int(5)])]);
    assert_eq!(non_block_branch, Ok(Value::Integer(5)));

    let lazy = run(
        &mut universe,
        vec![send(
            var("false"),
            "and:",
            vec![block(&[], vec![send(var("nil"), "foo", vec![])])],
        )],
    );
    assert_eq!(lazy, Ok(Value::Boolean(false)));
}

#[test]
fn integer_arithmetic() {
    let mut universe = setup_universe();

    let tests: &[(Expression, Value)] = &[
        (send(int(-7), "/", vec![int(2)]), Value::Integer(-4)),
        (send(int(7), "/", vec![int(2)]), Value::Integer(3)),
        (send(int(-7), "\\\\", vec![int(2)]), Value::Integer(1)),
        (send(int(7), "rem:", vec![int(-2)]), Value::Integer(1)),
        (send(int(-5), "abs", vec![]), Value::Integer(5)),
        (send(int(5), "max:", vec![int(9)]), Value::Integer(9)),
        (send(int(5), "min:", vec![int(9)]), Value::Integer(5)),
        (
            send(int(3), "between:and:", vec![int(1), int(5)]),
            Value::Boolean(true),
        ),
        (send(int(3), "<=", vec![int(3)]), Value::Boolean(true)),
        (send(int(3), "=", vec![Expression::string("3")]), Value::Boolean(false)),
        (send(int(42), "printString", vec![]), Value::string("42")),
        (
            send(send(int(i64::MAX), "+", vec![int(1)]), "-", vec![int(1)]),
            Value::Integer(i64::MAX),
        ),
    ];

    for (expr, expected) in tests {
        let output = universe.evaluate_expression(expr);
        assert_eq!(output.as_ref(), Ok(expected), "evaluating {:?}", expr);
    }

    let overflowed = universe
        .evaluate_expression(&send(int(i64::MAX), "+", vec![int(1)]))
        .unwrap();
    assert_eq!(
        overflowed,
        Value::BigInteger("9223372036854775808".parse().unwrap())
    );
}

#[test]
fn primitive_type_errors_signal() {
    let mut universe = setup_universe();

    let condition = universe
        .evaluate_expression(&send(int(3), "<", vec![Expression::string("a")]))
        .unwrap_err();

    assert_eq!(condition.class_name, "PrimitiveFailed");
    assert_eq!(condition.message_text, "'Integer>>#<': wrong type(s)");
}

#[test]
fn strings_and_symbols() {
    let mut universe = setup_universe();

    let tests: &[(Expression, Value)] = &[
        (
            send(Expression::string("ab"), ",", vec![Expression::string("cd")]),
            Value::string("abcd"),
        ),
        (send(Expression::string("abc"), "size", vec![]), Value::Integer(3)),
        (send(Expression::symbol("foo"), "asString", vec![]), Value::string("foo")),
        (
            send(
                send(Expression::string("foo"), "asSymbol", vec![]),
                "==",
                vec![Expression::symbol("foo")],
            ),
            Value::Boolean(true),
        ),
        (
            send(Expression::string("it's"), "printString", vec![]),
            Value::string("'it''s'"),
        ),
        (send(int(3), "printString", vec![]), Value::string("3")),
    ];

    for (expr, expected) in tests {
        let output = universe.evaluate_expression(expr);
        assert_eq!(output.as_ref(), Ok(expected), "evaluating {:?}", expr);
    }
}

#[test]
fn arrays() {
    let mut universe = setup_universe();

    // items := Array new: 3. items at: 1 put: 4. items at: 3 put: 6.
    // sum := 0. items do: [:each | sum := sum + (each ifNil: [0])]. sum
    let output = run(
        &mut universe,
        vec![
            assign("items", send(var("Array"), "new:", vec![int(3)])),
            send(var("items"), "at:put:", vec![int(1), int(4)]),
            send(var("items"), "at:put:", vec![int(3), int(6)]),
            assign("sum", int(0)),
            send(
                var("items"),
                "do:",
                vec![block(
                    &["each"],
                    vec![assign(
                        "sum",
                        send(
                            var("sum"),
                            "+",
                            vec![send(var("each"), "ifNil:", vec![block(&[], vec![int(0)])])],
                        ),
                    )],
                )],
            ),
            var("sum"),
        ],
    );
    assert_eq!(output, Ok(Value::Integer(10)));

    let out_of_bounds = run(&mut universe, vec![send(var("items"), "at:", vec![int(4)])]);
    assert_eq!(out_of_bounds.unwrap_err().class_name, "PrimitiveFailed");

    let applied = run(
        &mut universe,
        vec![send(
            block(&["a", "b"], vec![send(var("a"), "-", vec![var("b")])]),
            "valueWithArguments:",
            vec![var("items")],
        )],
    );
    assert_eq!(applied.unwrap_err().class_name, "WrongArgumentCount");

    // nested := Array new: 2. nested at: 1 put: nested. nested at: 2 put: 5. nested printString
    let printed = run(
        &mut universe,
        vec![
            assign("nested", send(var("Array"), "new:", vec![int(2)])),
            send(var("nested"), "at:put:", vec![int(1), var("nested")]),
            send(var("nested"), "at:put:", vec![int(2), int(5)]),
            send(var("nested"), "printString", vec![]),
        ],
    );
    assert_eq!(printed, Ok(Value::string("#(#(...) 5)")));

    let nested = universe.lookup_global("nested").unwrap();
    assert_eq!(format!("{:?}", nested), "Array([Array(...), Integer(5)])");
}

#[test]
fn big_integer_literals() {
    let mut universe = setup_universe();

    let big = "100000000000000000000";
    let output = universe.evaluate_expression(&Expression::big_integer(big));
    assert_eq!(output, Ok(Value::BigInteger(big.parse().unwrap())));
    assert!(matches!(output, Ok(Value::BigInteger(_))));

    let demoted = universe.evaluate_expression(&send(
        Expression::big_integer(big),
        "-",
        vec![Expression::big_integer("99999999999999999958")],
    ));
    assert!(matches!(demoted, Ok(Value::Integer(42))));

    let malformed = universe.evaluate_expression(&Expression::big_integer("12ab"));
    assert_eq!(malformed.unwrap_err().class_name, "PrimitiveFailed");
}

#[test]
fn symbols_print_with_doubled_quotes() {
    let mut universe = setup_universe();

    let tests: &[(&str, &str)] = &[
        ("plain", "#plain"),
        ("two words", "#'two words'"),
        ("it's", "#'it''s'"),
    ];

    for (symbol, expected) in tests {
        let output = universe.evaluate_expression(&send(
            Expression::symbol(*symbol),
            "printString",
            vec![],
        ));
        assert_eq!(output, Ok(Value::string(*expected)), "printing #{}", symbol);
    }

    let string = universe.evaluate_expression(&send(Expression::string("it's"), "printString", vec![]));
    assert_eq!(string, Ok(Value::string("'it''s'")));
}

#[test]
fn every_demo_runs() {
    for demo in demos::all() {
        let mut universe = setup_universe();
        for (source, body) in demo.steps.iter() {
            // some steps are expected to end with an uncaught condition
            let _ = universe.evaluate(body);
            assert!(universe.frames.is_empty(), "frames left behind by `{}`", source);
        }
    }
}
