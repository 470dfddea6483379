use std::rc::Rc;

use st_core::ast;

use crate::block::Block;
use crate::invokable::Return;
use crate::universe::Universe;
use crate::value::Value;

/// Unwrap a local return, or hand any signaled condition back to the caller.
#[macro_export]
macro_rules! propagate {
    ($expr:expr) => {
        match $expr {
            $crate::invokable::Return::Local(value) => value,
            ret => return ret,
        }
    };
}

/// The trait for evaluating AST nodes.
pub trait Evaluate {
    /// Evaluate the node within a given universe.
    fn evaluate(&self, universe: &mut Universe) -> Return;
}

impl Evaluate for ast::Expression {
    fn evaluate(&self, universe: &mut Universe) -> Return {
        match self {
            Self::Assignment(name, expr) => {
                let value = propagate!(expr.evaluate(universe));
                universe.assign_local(name, value)
            }
            Self::Block(blk) => blk.evaluate(universe),
            Self::Literal(literal) => literal.evaluate(universe),
            Self::Reference(name) => match name.as_str() {
                "self" | "super" => {
                    let frame = universe.current_frame();
                    let self_value = frame.borrow().get_self();
                    Return::Local(self_value)
                }
                name => match universe.lookup_local(name) {
                    Some(value) => Return::Local(value),
                    None => universe.unbound_variable(name),
                },
            },
            Self::Message(msg) => msg.evaluate(universe),
        }
    }
}

impl Evaluate for ast::Literal {
    fn evaluate(&self, universe: &mut Universe) -> Return {
        match self {
            Self::Integer(int) => Return::Local(Value::Integer(*int)),
            Self::BigInteger(int) => match int.parse() {
                Ok(value) => Return::Local(Value::BigInteger(value)),
                Err(err) => universe.primitive_failed(err.to_string()),
            },
            Self::Symbol(sym) => Return::Local(Value::symbol(sym.as_str())),
            Self::String(string) => Return::Local(Value::string(string.as_str())),
        }
    }
}

impl Evaluate for Rc<ast::Block> {
    fn evaluate(&self, universe: &mut Universe) -> Return {
        let frame = universe.current_frame();
        Return::Local(Value::Block(Rc::new(Block {
            block: Rc::clone(self),
            frame,
        })))
    }
}

impl Evaluate for ast::Message {
    fn evaluate(&self, universe: &mut Universe) -> Return {
        let (receiver, super_class) = match self.receiver.as_ref() {
            ast::Expression::Reference(ident) if ident == "super" => {
                let frame = universe.current_frame();
                let receiver = frame.borrow().get_self();
                let holder = match frame.borrow().get_method_holder() {
                    Some(holder) => holder,
                    None => return universe.primitive_failed("`super` used outside of a method"),
                };
                let super_class = match holder.borrow().super_class() {
                    Some(class) => class,
                    None => {
                        return universe
                            .primitive_failed("`super` used without any superclass available")
                    }
                };
                (receiver, Some(super_class))
            }
            expr => (propagate!(expr.evaluate(universe)), None),
        };

        let args = {
            let mut output = Vec::with_capacity(self.values.len());
            for expr in &self.values {
                let value = propagate!(expr.evaluate(universe));
                output.push(value);
            }
            output
        };

        let method = match super_class {
            Some(super_class) => super_class.borrow().lookup_method(&self.signature),
            None => receiver.lookup_method(universe, &self.signature),
        };

        universe.dispatch(method, receiver, &self.signature, args)
    }
}

impl Evaluate for ast::Body {
    fn evaluate(&self, universe: &mut Universe) -> Return {
        let mut last_value = Value::Nil;
        for expr in &self.exprs {
            last_value = propagate!(expr.evaluate(universe));
        }
        Return::Local(last_value)
    }
}
