use crate::{
    expr::{Arena, ExprId},
    ops::{self, Bindings},
};

/// Two expressions which are equal to each other.
///
/// The two sides are separate trees. Neither has a parent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Equation {
    pub left: ExprId,
    pub right: ExprId,
}

/// Create the [`Equation`] `left = right`.
pub fn equate(left: ExprId, right: ExprId) -> Equation {
    Equation::new(left, right)
}

impl Equation {
    pub fn new(left: ExprId, right: ExprId) -> Self { Equation { left, right } }

    /// The same equation, written the other way around.
    pub fn swapped(self) -> Self {
        Equation {
            left: self.right,
            right: self.left,
        }
    }

    pub fn sides(&self) -> [ExprId; 2] { [self.left, self.right] }

    /// Evaluate `left - right`.
    pub fn residual(&self, arena: &Arena, bindings: &Bindings) -> f64 {
        ops::evaluate(arena, self.left, bindings)
            - ops::evaluate(arena, self.right, bindings)
    }

    /// Do both sides evaluate to the same value (within floating point
    /// tolerance)?
    pub fn is_satisfied_by(&self, arena: &Arena, bindings: &Bindings) -> bool {
        let left = ops::evaluate(arena, self.left, bindings);
        let right = ops::evaluate(arena, self.right, bindings);

        approx::relative_eq!(left, right, epsilon = 1e-9)
    }
}
