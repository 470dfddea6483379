/// How the evaluator reacts to a questionable, but recoverable, situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Signal a condition.
    Strict,
    /// Carry on.
    Lenient,
}

/// The strictness settings of a universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strictness {
    /// Assigning to a name that is bound nowhere in the environment chain.
    ///
    /// When lenient, the name gets defined in the current scope.
    /// When strict, an `UnboundVariable` condition is signaled.
    pub undeclared_assignment: Policy,
    /// Invoking a block (or a method) with the wrong number of arguments.
    ///
    /// When lenient, missing parameters are bound to **nil** and extra arguments are dropped.
    /// When strict, a `WrongArgumentCount` condition is signaled.
    pub arity: Policy,
}

impl Strictness {
    /// Every check enabled.
    pub fn strict() -> Self {
        Self {
            undeclared_assignment: Policy::Strict,
            arity: Policy::Strict,
        }
    }

    /// Every check disabled.
    pub fn lenient() -> Self {
        Self {
            undeclared_assignment: Policy::Lenient,
            arity: Policy::Lenient,
        }
    }
}

impl Default for Strictness {
    fn default() -> Self {
        Self {
            undeclared_assignment: Policy::Lenient,
            arity: Policy::Strict,
        }
    }
}
