//!
//! This is the evaluation engine for a Smalltalk-like, message-passing language.
//!
//! Programs are handed over as syntax trees (see [`st_core::ast`]) and evaluated
//! within a [`Universe`](universe::Universe), which owns the class hierarchy and the global scope.
//!
#![warn(missing_docs)]

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Facilities for manipulating blocks.
pub mod block;
/// Facilities for manipulating classes.
pub mod class;
/// The strictness settings of the evaluator.
pub mod config;
/// Bundled example programs, built as syntax trees.
pub mod demos;
/// Facilities for manipulating lexical environments.
pub mod environment;
/// Facilities for evaluating nodes and expressions.
pub mod evaluate;
/// Facilities for signaling and matching conditions.
pub mod exception;
/// Facilities for manipulating class instances.
pub mod instance;
/// Facilities for invoking methods and/or primitives.
pub mod invokable;
/// Facilities for manipulating class methods.
pub mod method;
/// Definitions for all supported primitives.
pub mod primitives;
/// The interpreter's main data structure.
pub mod universe;
/// Facilities for manipulating values.
pub mod value;

/// A strong and owning reference to an object.
pub type STRef<T> = Rc<RefCell<T>>;
/// A weak reference to an object.
pub type STWeakRef<T> = Weak<RefCell<T>>;
