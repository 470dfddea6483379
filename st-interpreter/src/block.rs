use std::fmt;
use std::rc::Rc;

use st_core::ast;

use crate::environment::Environment;
use crate::STRef;

/// Represents an executable block.
#[derive(Clone)]
pub struct Block {
    /// Reference to the captured environment.
    pub frame: STRef<Environment>,
    /// Block definition from the AST.
    pub block: Rc<ast::Block>,
}

impl Block {
    /// Retrieve the number of parameters this block accepts.
    pub fn nb_parameters(&self) -> usize {
        self.block.parameters.len()
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Block")
            .field("parameters", &self.block.parameters)
            .finish()
    }
}
