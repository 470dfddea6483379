use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::class::Class;
use crate::value::Value;
use crate::STRef;

/// The kind of a given environment.
#[derive(Debug, Clone)]
pub enum EnvironmentKind {
    /// The root (global) environment.
    Root,
    /// An environment created from a block activation.
    Block,
    /// An environment created from a method activation.
    Method {
        /// The class holding the invoked method.
        holder: STRef<Class>,
        /// The self value.
        self_value: Value,
    },
}

/// Represents a lexical scope.
///
/// Environments form a chain through their parent reference, which always ends at the root environment.
#[derive(Debug)]
pub struct Environment {
    /// This environment's kind.
    pub kind: EnvironmentKind,
    /// The bindings within this environment.
    pub bindings: HashMap<String, Value>,
    /// The enclosing environment.
    pub parent: Option<STRef<Environment>>,
}

impl Environment {
    /// Construct a new empty root environment.
    pub fn root() -> Self {
        Self {
            kind: EnvironmentKind::Root,
            bindings: HashMap::new(),
            parent: None,
        }
    }

    /// Construct a new empty environment chained to the given parent.
    pub fn child(parent: &STRef<Environment>, kind: EnvironmentKind) -> Self {
        Self {
            kind,
            bindings: HashMap::new(),
            parent: Some(Rc::clone(parent)),
        }
    }

    /// Wrap this environment into a shared reference.
    pub fn into_ref(self) -> STRef<Environment> {
        Rc::new(RefCell::new(self))
    }

    /// Get the self value for this environment.
    pub fn get_self(&self) -> Value {
        match &self.kind {
            EnvironmentKind::Method { self_value, .. } => self_value.clone(),
            EnvironmentKind::Block | EnvironmentKind::Root => self
                .parent
                .as_ref()
                .map(|parent| parent.borrow().get_self())
                .unwrap_or(Value::Nil),
        }
    }

    /// Get the class holding the method of the closest method activation.
    pub fn get_method_holder(&self) -> Option<STRef<Class>> {
        match &self.kind {
            EnvironmentKind::Method { holder, .. } => Some(holder.clone()),
            EnvironmentKind::Block | EnvironmentKind::Root => self
                .parent
                .as_ref()
                .and_then(|parent| parent.borrow().get_method_holder()),
        }
    }

    /// Bind a name in this very environment, shadowing any binding from the ancestors.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Search for a binding, walking up the chain of ancestors.
    pub fn lookup_local(&self, name: impl AsRef<str>) -> Option<Value> {
        let name = name.as_ref();
        if let Some(value) = self.bindings.get(name).cloned() {
            return Some(value);
        }
        if let EnvironmentKind::Method { self_value, .. } = &self.kind {
            if let Some(value) = self_value.lookup_local(name) {
                return Some(value);
            }
        }
        self.parent
            .as_ref()
            .and_then(|parent| parent.borrow().lookup_local(name))
    }

    /// Assign to the closest existing binding, walking up the chain of ancestors.
    ///
    /// Returns `None` if the name is bound nowhere in the chain.
    pub fn assign_local(&mut self, name: impl AsRef<str>, value: Value) -> Option<()> {
        let name = name.as_ref();
        if let Some(local) = self.bindings.get_mut(name) {
            *local = value;
            return Some(());
        }
        if let EnvironmentKind::Method { self_value, .. } = &self.kind {
            if self_value.has_local(name) {
                return self_value.assign_local(name, value);
            }
        }
        let parent = self.parent.as_ref()?;
        parent.borrow_mut().assign_local(name, value)
    }

    /// Assign to the closest existing binding, or define it here if there is none.
    pub fn assign(&mut self, name: impl AsRef<str>, value: Value) {
        let name = name.as_ref();
        if self.assign_local(name, value.clone()).is_none() {
            self.define(name, value);
        }
    }
}
