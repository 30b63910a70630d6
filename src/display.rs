//! Turning expressions and equations into text.
//!
//! The output is infix notation with no parentheses, so nested expressions
//! with mixed operators (e.g. `1 - (2 + 3)`) render ambiguously as
//! `1.000000 - 2.000000 + 3.000000`.

use crate::{
    equations::Equation,
    expr::{Arena, ExprId, Expression},
};
use std::fmt::{self, Display, Formatter};

/// Something which can be written out using the nodes in an [`Arena`].
pub trait Render {
    fn render(&self, arena: &Arena, f: &mut Formatter<'_>) -> fmt::Result;
}

impl Render for ExprId {
    fn render(&self, arena: &Arena, f: &mut Formatter<'_>) -> fmt::Result {
        match arena[*self] {
            Expression::Number(value) => write!(f, "{:.6}", value),
            Expression::Variable(ref name) => write!(f, "{}", name),
            Expression::Binary { op, left, right } => {
                write_operand(arena, left, f)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(arena, right, f)
            },
        }
    }
}

impl Render for Equation {
    fn render(&self, arena: &Arena, f: &mut Formatter<'_>) -> fmt::Result {
        self.left.render(arena, f)?;
        write!(f, " = ")?;
        self.right.render(arena, f)
    }
}

fn write_operand(
    arena: &Arena,
    operand: Option<ExprId>,
    f: &mut Formatter<'_>,
) -> fmt::Result {
    match operand {
        Some(id) => id.render(arena, f),
        None => write!(f, "_"),
    }
}

/// A [`Display`] adapter returned by [`Arena::display()`].
#[derive(Debug, Copy, Clone)]
pub struct Displayed<'a, R> {
    arena: &'a Arena,
    item: R,
}

impl<'a, R: Render> Display for Displayed<'a, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.item.render(self.arena, f)
    }
}

impl Arena {
    /// Get something which can be used with `format!()` and friends.
    pub fn display<R: Render>(&self, item: R) -> Displayed<'_, R> {
        Displayed { arena: self, item }
    }

    /// Render an [`ExprId`] or [`Equation`] as a freshly allocated string.
    pub fn stringize<R: Render>(&self, item: R) -> String {
        self.display(item).to_string()
    }
}
