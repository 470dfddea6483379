use st_core::ast::{Body, Expression as E};

/// A bundled program, made of steps evaluated one after the other within the same universe.
pub struct Demo {
    /// The name used to pick this demo from the command line.
    pub name: &'static str,
    /// Each step's source text, along with its syntax tree.
    pub steps: Vec<(&'static str, Body)>,
}

/// Get every bundled demo.
pub fn all() -> Vec<Demo> {
    vec![factorial(), exceptions(), classes()]
}

/// Get a bundled demo by name.
pub fn by_name(name: &str) -> Option<Demo> {
    all().into_iter().find(|demo| demo.name == name)
}

fn step(source: &'static str, exprs: Vec<E>) -> (&'static str, Body) {
    (source, Body::new(exprs))
}

fn var(name: &str) -> E {
    E::reference(name)
}

/// ```text
/// factorial := [:n |
///     (n < 0)
///         ifTrue: [(Error new: 'Factorial not defined for negative numbers') signal]
///         ifFalse: [n = 0 ifTrue: [1] ifFalse: [n * (factorial value: n - 1)]]]
/// ```
pub fn factorial_definition() -> E {
    let signal_error = E::send(
        E::send(
            var("Error"),
            "new:",
            vec![E::string("Factorial not defined for negative numbers")],
        ),
        "signal",
        vec![],
    );
    let recurse = E::send(
        var("n"),
        "*",
        vec![E::send(
            var("factorial"),
            "value:",
            vec![E::send(var("n"), "-", vec![E::integer(1)])],
        )],
    );
    let non_negative = E::send(
        E::send(var("n"), "=", vec![E::integer(0)]),
        "ifTrue:ifFalse:",
        vec![
            E::block(&[], vec![E::integer(1)]),
            E::block(&[], vec![recurse]),
        ],
    );
    let body = E::send(
        E::send(var("n"), "<", vec![E::integer(0)]),
        "ifTrue:ifFalse:",
        vec![
            E::block(&[], vec![signal_error]),
            E::block(&[], vec![non_negative]),
        ],
    );
    E::assign("factorial", E::block(&["n"], vec![body]))
}

/// ```text
/// [factorial value: -5] on: Error do: [:ex | 'Error: ', ex messageText]
/// ```
pub fn guarded_negative_factorial() -> E {
    E::send(
        E::block(
            &[],
            vec![E::send(var("factorial"), "value:", vec![E::integer(-5)])],
        ),
        "on:do:",
        vec![
            var("Error"),
            E::block(
                &["ex"],
                vec![E::send(
                    E::string("Error: "),
                    ",",
                    vec![E::send(var("ex"), "messageText", vec![])],
                )],
            ),
        ],
    )
}

fn factorial() -> Demo {
    let call = |n: i64| E::send(var("factorial"), "value:", vec![E::integer(n)]);
    Demo {
        name: "factorial",
        steps: vec![
            step(
                "factorial := [:n | (n < 0) ifTrue: [...] ifFalse: [...]]",
                vec![factorial_definition()],
            ),
            step("factorial value: 5", vec![call(5)]),
            step("factorial value: 20", vec![call(20)]),
            step("factorial value: 30", vec![call(30)]),
            step("factorial value: -5", vec![call(-5)]),
            step(
                "[factorial value: -5] on: Error do: [:ex | 'Error: ', ex messageText]",
                vec![guarded_negative_factorial()],
            ),
        ],
    }
}

fn exceptions() -> Demo {
    let divide_by_zero = || E::block(&[], vec![E::send(E::integer(5), "/", vec![E::integer(0)])]);
    let answer = |value: i64| E::block(&["ex"], vec![E::integer(value)]);
    let message_text = || E::block(&["ex"], vec![E::send(var("ex"), "messageText", vec![])]);

    Demo {
        name: "exceptions",
        steps: vec![
            step(
                "[5 / 0] on: ZeroDivide do: [:ex | 999]",
                vec![E::send(divide_by_zero(), "on:do:", vec![var("ZeroDivide"), answer(999)])],
            ),
            step(
                "[5 / 0] on: NotFound do: [:ex | 999]",
                vec![E::send(divide_by_zero(), "on:do:", vec![var("NotFound"), answer(999)])],
            ),
            step(
                "[nil frobnicate] on: MessageNotUnderstood do: [:ex | ex selector]",
                vec![E::send(
                    E::block(&[], vec![E::send(var("nil"), "frobnicate", vec![])]),
                    "on:do:",
                    vec![
                        var("MessageNotUnderstood"),
                        E::block(&["ex"], vec![E::send(var("ex"), "selector", vec![])]),
                    ],
                )],
            ),
            step(
                "[[5 / 0] on: ZeroDivide do: [:ex | ex pass]] on: Error do: [:ex | ex messageText]",
                vec![E::send(
                    E::block(
                        &[],
                        vec![E::send(
                            divide_by_zero(),
                            "on:do:",
                            vec![
                                var("ZeroDivide"),
                                E::block(&["ex"], vec![E::send(var("ex"), "pass", vec![])]),
                            ],
                        )],
                    ),
                    "on:do:",
                    vec![var("Error"), message_text()],
                )],
            ),
            step(
                "[NotFound signal: 'no such key'] on: ZeroDivide, NotFound do: [:ex | ex messageText]",
                vec![E::send(
                    E::block(
                        &[],
                        vec![E::send(
                            var("NotFound"),
                            "signal:",
                            vec![E::string("no such key")],
                        )],
                    ),
                    "on:do:",
                    vec![
                        E::send(var("ZeroDivide"), ",", vec![var("NotFound")]),
                        message_text(),
                    ],
                )],
            ),
            step(
                "cleaned := false. [[5 / 0] ensure: [cleaned := true]] on: ZeroDivide do: [:ex | cleaned]",
                vec![
                    E::assign("cleaned", var("false")),
                    E::send(
                        E::block(
                            &[],
                            vec![E::send(
                                divide_by_zero(),
                                "ensure:",
                                vec![E::block(&[], vec![E::assign("cleaned", var("true"))])],
                            )],
                        ),
                        "on:do:",
                        vec![var("ZeroDivide"), E::block(&["ex"], vec![var("cleaned")])],
                    ),
                ],
            ),
        ],
    }
}

fn classes() -> Demo {
    let increment = E::assign(
        "count",
        E::send(
            E::send(
                var("count"),
                "ifNil:",
                vec![E::block(&[], vec![E::integer(0)])],
            ),
            "+",
            vec![E::integer(1)],
        ),
    );

    Demo {
        name: "classes",
        steps: vec![
            step(
                "Object subclass: #Counter instanceVariableNames: 'count'",
                vec![E::send(
                    var("Object"),
                    "subclass:instanceVariableNames:",
                    vec![E::symbol("Counter"), E::string("count")],
                )],
            ),
            step(
                "Counter define: #increment as: [count := (count ifNil: [0]) + 1]",
                vec![E::send(
                    var("Counter"),
                    "define:as:",
                    vec![E::symbol("increment"), E::block(&[], vec![increment])],
                )],
            ),
            step(
                "counter := Counter new. counter increment. counter increment",
                vec![
                    E::assign("counter", E::send(var("Counter"), "new", vec![])),
                    E::send(var("counter"), "increment", vec![]),
                    E::send(var("counter"), "increment", vec![]),
                ],
            ),
            step(
                "Counter subclass: #LoudCounter",
                vec![E::send(var("Counter"), "subclass:", vec![E::symbol("LoudCounter")])],
            ),
            step(
                "LoudCounter define: #increment as: [super increment * 10]",
                vec![E::send(
                    var("LoudCounter"),
                    "define:as:",
                    vec![
                        E::symbol("increment"),
                        E::block(
                            &[],
                            vec![E::send(
                                E::send(var("super"), "increment", vec![]),
                                "*",
                                vec![E::integer(10)],
                            )],
                        ),
                    ],
                )],
            ),
            step(
                "LoudCounter new increment",
                vec![E::send(
                    E::send(var("LoudCounter"), "new", vec![]),
                    "increment",
                    vec![],
                )],
            ),
            step(
                "counter printString",
                vec![E::send(var("counter"), "printString", vec![])],
            ),
            step(
                "counter reset",
                vec![E::send(var("counter"), "reset", vec![])],
            ),
        ],
    }
}
