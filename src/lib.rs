//! An experiment in solving equations by rearranging expression trees.
//!
//! Expressions are made of numbers, variables, addition and subtraction, and
//! live inside an [`Arena`]. An [`Equation`] with a single occurrence of some
//! variable can be rearranged with [`solve_for()`] so that variable is on its
//! own.

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

mod display;
mod equations;
mod expr;
mod identifier;
pub mod ops;
mod solve;

pub use display::{Displayed, Render};
pub use equations::{equate, Equation};
pub use expr::{Arena, BinaryOperation, ExprId, Expression, Side};
pub use identifier::Identifier;
pub use solve::{solve_for, SolveError};
