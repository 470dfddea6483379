//!
//! This crate contains the syntax tree shared between front ends and the evaluator.
//!

/// The syntax tree definitions.
pub mod ast;
