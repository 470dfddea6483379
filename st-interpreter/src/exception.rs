use std::collections::HashMap;
use std::fmt;

use crate::class::{is_subclass_of, Class};
use crate::value::Value;
use crate::STRef;

/// The payload of a does-not-understand condition.
#[derive(Debug, Clone)]
pub struct NotUnderstood {
    /// The receiver of the failed send.
    pub receiver: Value,
    /// The selector nothing answered to.
    pub selector: String,
    /// The arguments of the failed send.
    pub arguments: Vec<Value>,
}

/// Represents a condition (an instance of `Exception` or of one of its subclasses).
#[derive(Clone)]
pub struct Exception {
    /// The class of this condition, used to match handlers.
    pub class: STRef<Class>,
    /// The human-readable description of what happened, if any was given.
    pub message_text: Option<String>,
    /// This condition's instance variables (declared by user-defined subclasses).
    pub locals: HashMap<String, Value>,
    /// The failed send, for does-not-understand conditions.
    pub not_understood: Option<NotUnderstood>,
}

impl Exception {
    /// Construct a condition of the given class, without any message.
    pub fn from_class(class: STRef<Class>) -> Self {
        let locals = class
            .borrow()
            .all_locals()
            .into_iter()
            .zip(std::iter::repeat(Value::Nil))
            .collect();

        Self {
            class,
            message_text: None,
            locals,
            not_understood: None,
        }
    }

    /// Construct a condition of the given class, with a message.
    pub fn with_message(class: STRef<Class>, message: impl Into<String>) -> Self {
        let mut exception = Self::from_class(class);
        exception.message_text = Some(message.into());
        exception
    }

    /// Get the class of this condition.
    pub fn class(&self) -> STRef<Class> {
        self.class.clone()
    }

    /// The message text, defaulting to the class name.
    pub fn description(&self) -> String {
        match self.message_text {
            Some(ref text) => text.clone(),
            None => self.class.borrow().name().to_string(),
        }
    }

    /// Is this condition an instance of `class`, or of one of its descendants ?
    pub fn is_kind_of(&self, class: &STRef<Class>) -> bool {
        is_subclass_of(&self.class, class)
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

impl fmt::Debug for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exception")
            .field("class", &self.class.borrow().name())
            .field("message_text", &self.message_text)
            .field("not_understood", &self.not_understood)
            .finish()
    }
}

/// Does a handler registered for `selector` (a class or an exception set) catch this condition ?
///
/// Returns `None` if `selector` is neither a class nor an exception set.
pub fn handles(selector: &Value, exception: &Exception) -> Option<bool> {
    match selector {
        Value::Class(class) => Some(exception.is_kind_of(class)),
        Value::ExceptionSet(classes) => {
            Some(classes.iter().any(|class| exception.is_kind_of(class)))
        }
        _ => None,
    }
}

/// A condition that went through every handler without being caught.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{class_name}: {message_text}")]
pub struct UncaughtCondition {
    /// The name of the condition's class.
    pub class_name: String,
    /// The condition's description.
    pub message_text: String,
    /// The selector nothing answered to, for does-not-understand conditions.
    pub selector: Option<String>,
}

impl From<&Exception> for UncaughtCondition {
    fn from(exception: &Exception) -> Self {
        Self {
            class_name: exception.class.borrow().name().to_string(),
            message_text: exception.description(),
            selector: exception
                .not_understood
                .as_ref()
                .map(|payload| payload.selector.clone()),
        }
    }
}
