//! # Expression tree
//!
//! This module defines the abstract syntax tree produced by the parser,
//! the constant-folding pass that rewrites it, and the arithmetic shared by
//! the folder and the virtual machine.
//!
//! ## Documentation conventions
//!
//! - Stack effects are written as `( before -- after )`.
//! - Argument references render as `$n`, where `n` is the slot index.

pub mod fold;
pub mod node;
