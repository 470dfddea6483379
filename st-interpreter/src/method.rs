use std::rc::Rc;

use st_core::ast;

use crate::class::Class;
use crate::environment::Environment;
use crate::primitives::PrimitiveFn;
use crate::{STRef, STWeakRef};

/// The kind of a class method.
#[derive(Clone)]
pub enum MethodKind {
    /// A user-defined method, from a syntax tree.
    Defined {
        /// The parameters, locals and body of the method.
        block: Rc<ast::Block>,
        /// The environment the method body is chained to.
        environment: STRef<Environment>,
    },
    /// An interpreter primitive.
    Primitive(PrimitiveFn),
}

/// Represents a class method.
#[derive(Clone)]
pub struct Method {
    /// The method's kind.
    pub kind: MethodKind,
    /// The class holding this method.
    pub holder: STWeakRef<Class>,
    /// The method's selector.
    pub signature: String,
}

impl Method {
    /// Create a user-defined method.
    pub fn defined(
        holder: &STRef<Class>,
        signature: impl Into<String>,
        block: Rc<ast::Block>,
        environment: STRef<Environment>,
    ) -> Self {
        Self {
            kind: MethodKind::Defined { block, environment },
            holder: Rc::downgrade(holder),
            signature: signature.into(),
        }
    }

    /// Get the method's kind.
    pub fn kind(&self) -> &MethodKind {
        &self.kind
    }

    /// Get the class holding this method.
    pub fn holder(&self) -> &STWeakRef<Class> {
        &self.holder
    }

    /// Get the method's selector.
    pub fn signature(&self) -> &str {
        self.signature.as_str()
    }
}

/// The number of arguments a message with the given selector carries.
///
/// Example:
/// ```text
/// "unary"    size              => 0
/// "binary"   +                 => 1
/// "keyword"  ifTrue:ifFalse:   => 2
/// ```
pub fn signature_arity(signature: &str) -> usize {
    let is_binary = signature
        .chars()
        .next()
        .map_or(false, |ch| !ch.is_alphanumeric() && ch != '_');
    if is_binary {
        1
    } else {
        signature.matches(':').count()
    }
}

#[cfg(test)]
mod tests {
    use super::signature_arity;

    #[test]
    fn arity_from_signature() {
        assert_eq!(signature_arity("size"), 0);
        assert_eq!(signature_arity("+"), 1);
        assert_eq!(signature_arity("~="), 1);
        assert_eq!(signature_arity(","), 1);
        assert_eq!(signature_arity("value:"), 1);
        assert_eq!(signature_arity("ifTrue:ifFalse:"), 2);
    }
}
