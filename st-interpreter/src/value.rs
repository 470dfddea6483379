use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;

use crate::block::Block;
use crate::class::Class;
use crate::exception::Exception;
use crate::instance::Instance;
use crate::method::Method;
use crate::universe::Universe;
use crate::STRef;

/// Represents a value.
#[derive(Clone)]
pub enum Value {
    /// The **nil** value.
    Nil,
    /// A boolean value (**true** or **false**).
    Boolean(bool),
    /// An integer value.
    Integer(i64),
    /// A big integer value (bigger than a 64-bit signed integer can represent).
    BigInteger(BigInt),
    /// A symbol value.
    Symbol(Rc<String>),
    /// A string value.
    String(Rc<String>),
    /// An array of values.
    Array(STRef<Vec<Self>>),
    /// A block value, ready to be evaluated.
    Block(Rc<Block>),
    /// A generic (non-primitive) class instance.
    Instance(STRef<Instance>),
    /// A bare class object.
    Class(STRef<Class>),
    /// A condition, signaled or not.
    Exception(STRef<Exception>),
    /// A set of exception classes, usable as an `on:do:` selector.
    ExceptionSet(Rc<Vec<STRef<Class>>>),
}

impl Value {
    /// Get the class of the current value.
    pub fn class(&self, universe: &Universe) -> STRef<Class> {
        match self {
            Self::Nil => universe.nil_class(),
            Self::Boolean(true) => universe.true_class(),
            Self::Boolean(false) => universe.false_class(),
            Self::Integer(_) | Self::BigInteger(_) => universe.integer_class(),
            Self::Symbol(_) => universe.symbol_class(),
            Self::String(_) => universe.string_class(),
            Self::Array(_) => universe.array_class(),
            Self::Block(_) => universe.block_class(),
            Self::Instance(instance) => instance.borrow().class(),
            Self::Class(class) => class.borrow().class(),
            Self::Exception(exception) => exception.borrow().class(),
            Self::ExceptionSet(_) => universe.exception_set_class(),
        }
    }

    /// Search for a given method for this value.
    pub fn lookup_method(&self, universe: &Universe, signature: impl AsRef<str>) -> Option<Rc<Method>> {
        self.class(universe).borrow().lookup_method(signature)
    }

    /// Does this value carry an instance variable with the given name ?
    pub fn has_local(&self, name: impl AsRef<str>) -> bool {
        match self {
            Self::Instance(instance) => instance.borrow().locals.contains_key(name.as_ref()),
            Self::Exception(exception) => exception.borrow().locals.contains_key(name.as_ref()),
            _ => false,
        }
    }

    /// Search for a local binding within this value.
    pub fn lookup_local(&self, name: impl AsRef<str>) -> Option<Self> {
        match self {
            Self::Instance(instance) => instance.borrow().lookup_local(name),
            Self::Exception(exception) => exception.borrow().lookup_local(name),
            _ => None,
        }
    }

    /// Assign a value to a local binding within this value.
    pub fn assign_local(&self, name: impl AsRef<str>, value: Self) -> Option<()> {
        match self {
            Self::Instance(instance) => instance.borrow_mut().assign_local(name, value),
            Self::Exception(exception) => exception.borrow_mut().assign_local(name, value),
            _ => None,
        }
    }

    /// Build a string value.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(Rc::new(value.into()))
    }

    /// Build a symbol value.
    pub fn symbol(value: impl Into<String>) -> Self {
        Self::Symbol(Rc::new(value.into()))
    }

    /// Get the string representation of this value.
    ///
    /// An array met again while it is being printed renders as `#(...)`.
    pub fn to_string(&self, universe: &Universe) -> String {
        self.render(universe, &mut Vec::new())
    }

    fn render(&self, universe: &Universe, visiting: &mut Vec<*const RefCell<Vec<Value>>>) -> String {
        match self {
            Self::Nil => "nil".to_string(),
            Self::Boolean(value) => value.to_string(),
            Self::Integer(value) => value.to_string(),
            Self::BigInteger(value) => value.to_string(),
            Self::Symbol(value) => {
                if value.chars().any(|ch| ch.is_whitespace() || ch == '\'') {
                    format!("#'{}'", value.replace('\'', "''"))
                } else {
                    format!("#{}", value)
                }
            }
            Self::String(value) => value.to_string(),
            Self::Array(values) => {
                let ptr = Rc::as_ptr(values);
                if visiting.contains(&ptr) {
                    return "#(...)".to_string();
                }
                visiting.push(ptr);
                let strings: Vec<String> = values
                    .borrow()
                    .iter()
                    .map(|value| value.render(universe, visiting))
                    .collect();
                visiting.pop();
                format!("#({})", strings.join(" "))
            }
            Self::Block(_) | Self::Instance(_) | Self::ExceptionSet(_) => {
                let class = self.class(universe);
                let name = class.borrow().name().to_string();
                format!("{} {}", article(&name), name)
            }
            Self::Class(class) => class.borrow().name().to_string(),
            Self::Exception(exception) => {
                let exception = exception.borrow();
                format!("{}: {}", exception.class().borrow().name(), exception.description())
            }
        }
    }
}

fn article(name: &str) -> &'static str {
    match name.chars().next() {
        Some(ch) if "AEIOUaeiou".contains(ch) => "an",
        _ => "a",
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a.eq(b),
            (Self::Integer(a), Self::Integer(b)) => a.eq(b),
            (Self::BigInteger(a), Self::BigInteger(b)) => a.eq(b),
            (Self::Integer(a), Self::BigInteger(b)) | (Self::BigInteger(b), Self::Integer(a)) => {
                BigInt::from(*a).eq(b)
            }
            (Self::String(a), Self::String(b)) => a.eq(b),
            (Self::Symbol(a), Self::Symbol(b)) => a.eq(b),
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::Block(a), Self::Block(b)) => Rc::ptr_eq(a, b),
            (Self::Instance(a), Self::Instance(b)) => Rc::ptr_eq(a, b),
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            (Self::Exception(a), Self::Exception(b)) => Rc::ptr_eq(a, b),
            (Self::ExceptionSet(a), Self::ExceptionSet(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("Nil"),
            Self::Boolean(value) => f.debug_tuple("Boolean").field(value).finish(),
            Self::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            Self::BigInteger(value) => f.debug_tuple("BigInteger").field(value).finish(),
            Self::Symbol(value) => f.debug_tuple("Symbol").field(value).finish(),
            Self::String(value) => f.debug_tuple("String").field(value).finish(),
            Self::Array(values) => {
                let visiting = RefCell::new(Vec::new());
                fmt::Debug::fmt(&ArrayDebug { values, visiting: &visiting }, f)
            }
            Self::Block(block) => fmt::Debug::fmt(block, f),
            Self::Instance(instance) => fmt::Debug::fmt(&*instance.borrow(), f),
            Self::Class(class) => f
                .debug_tuple("Class")
                .field(&class.borrow().name())
                .finish(),
            Self::Exception(exception) => fmt::Debug::fmt(&*exception.borrow(), f),
            Self::ExceptionSet(classes) => f
                .debug_list()
                .entries(classes.iter().map(|class| class.borrow().name().to_string()))
                .finish(),
        }
    }
}

/// Debug view of an array that stops at arrays already being formatted.
struct ArrayDebug<'a> {
    values: &'a STRef<Vec<Value>>,
    visiting: &'a RefCell<Vec<*const RefCell<Vec<Value>>>>,
}

impl fmt::Debug for ArrayDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ptr = Rc::as_ptr(self.values);
        if self.visiting.borrow().contains(&ptr) {
            return f.write_str("Array(...)");
        }
        self.visiting.borrow_mut().push(ptr);
        let values = self.values.borrow();
        let entries = values.iter().map(|value| match value {
            Value::Array(values) => ElementDebug::Array(ArrayDebug {
                values,
                visiting: self.visiting,
            }),
            value => ElementDebug::Other(value),
        });
        let result = f.debug_tuple("Array").field(&Entries(entries.collect())).finish();
        self.visiting.borrow_mut().pop();
        result
    }
}

enum ElementDebug<'a> {
    Array(ArrayDebug<'a>),
    Other(&'a Value),
}

impl fmt::Debug for ElementDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Array(array) => fmt::Debug::fmt(array, f),
            Self::Other(value) => fmt::Debug::fmt(value, f),
        }
    }
}

struct Entries<'a>(Vec<ElementDebug<'a>>);

impl fmt::Debug for Entries<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
