use std::collections::HashMap;
use std::fmt;

use crate::class::Class;
use crate::value::Value;
use crate::STRef;

/// Represents a generic (non-primitive) class instance.
#[derive(Clone)]
pub struct Instance {
    /// The class of which this is an instance from.
    pub class: STRef<Class>,
    /// This instance's locals.
    pub locals: HashMap<String, Value>,
}

impl Instance {
    /// Construct an instance for a given class, with every instance variable set to **nil**.
    pub fn from_class(class: STRef<Class>) -> Self {
        let locals = class
            .borrow()
            .all_locals()
            .into_iter()
            .zip(std::iter::repeat(Value::Nil))
            .collect();

        Self { class, locals }
    }

    /// Get the class of which this is an instance from.
    pub fn class(&self) -> STRef<Class> {
        self.class.clone()
    }

    /// Search for a local binding.
    pub fn lookup_local(&self, name: impl AsRef<str>) -> Option<Value> {
        self.locals.get(name.as_ref()).cloned()
    }

    /// Assign a value to a local binding.
    pub fn assign_local(&mut self, name: impl AsRef<str>, value: Value) -> Option<()> {
        *self.locals.get_mut(name.as_ref())? = value;
        Some(())
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.class.borrow().name())
            .field("locals", &self.locals.keys())
            .finish()
    }
}
