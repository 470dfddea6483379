use st_core::ast;

use crate::block::Block;
use crate::config::Policy;
use crate::environment::{Environment, EnvironmentKind};
use crate::evaluate::Evaluate;
use crate::exception::Exception;
use crate::method::{Method, MethodKind};
use crate::universe::Universe;
use crate::value::Value;
use crate::STRef;

/// Represents the kinds of possible returns from an invocation.
#[derive(Debug)]
pub enum Return {
    /// A local return, the value is for the immediate caller.
    Local(Value),
    /// A signaled condition, unwinding up to the closest matching handler.
    Signal(STRef<Exception>),
}

/// The trait for invoking methods and blocks.
pub trait Invoke {
    /// Invoke within the given universe and with the given arguments.
    ///
    /// For methods, the receiver comes first in `args`.
    /// For blocks, `args` only holds the values for the block's parameters.
    fn invoke(&self, universe: &mut Universe, args: Vec<Value>) -> Return;
}

impl Invoke for Method {
    fn invoke(&self, universe: &mut Universe, args: Vec<Value>) -> Return {
        match self.kind() {
            MethodKind::Defined { block, environment } => {
                let (self_value, params) = {
                    let mut iter = args.into_iter();
                    let receiver = match iter.next() {
                        Some(receiver) => receiver,
                        None => {
                            return universe.primitive_failed("missing receiver for invocation")
                        }
                    };
                    (receiver, iter.collect::<Vec<_>>())
                };
                let holder = match self.holder().upgrade() {
                    Some(holder) => holder,
                    None => {
                        return universe.primitive_failed(
                            "cannot invoke this method because its holder has been collected",
                        )
                    }
                };
                tracing::trace!(
                    selector = %self.signature(),
                    holder = %holder.borrow().name(),
                    "invoking method"
                );
                let frame = Environment::child(
                    environment,
                    EnvironmentKind::Method { holder, self_value },
                );
                activate(universe, frame, block, params)
            }
            MethodKind::Primitive(func) => func(universe, args),
        }
    }
}

impl Invoke for Block {
    fn invoke(&self, universe: &mut Universe, args: Vec<Value>) -> Return {
        let frame = Environment::child(&self.frame, EnvironmentKind::Block);
        activate(universe, frame, &self.block, args)
    }
}

/// Bind the parameters and locals into a fresh frame and evaluate the body within it.
fn activate(
    universe: &mut Universe,
    mut frame: Environment,
    block: &ast::Block,
    args: Vec<Value>,
) -> Return {
    let expected = block.parameters.len();
    if args.len() != expected && universe.strictness.arity == Policy::Strict {
        return universe.wrong_argument_count(expected, args.len());
    }

    let mut args = args.into_iter();
    for name in block.parameters.iter() {
        frame.define(name.clone(), args.next().unwrap_or(Value::Nil));
    }
    for name in block.locals.iter() {
        frame.define(name.clone(), Value::Nil);
    }

    universe.with_frame(frame.into_ref(), |universe| block.body.evaluate(universe))
}
