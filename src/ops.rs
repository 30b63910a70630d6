//! [`Expression`] operations.

use crate::{
    equations::Equation,
    expr::{Arena, BinaryOperation, ExprId, Expression},
    identifier::Identifier,
};

/// Values to use for variables when evaluating an [`Expression`].
///
/// Bindings can only be added. When the same variable is bound more than
/// once, the most recent binding wins.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Bindings {
    values: Vec<(Identifier, f64)>,
}

impl Bindings {
    pub fn new() -> Self { Bindings::default() }

    pub fn with<I: Into<Identifier>>(mut self, name: I, value: f64) -> Self {
        self.push(name, value);
        self
    }

    pub fn push<I: Into<Identifier>>(&mut self, name: I, value: f64) {
        self.values.push((name.into(), value));
    }

    /// Get the value most recently bound to `name`.
    pub fn resolve(&self, name: &Identifier) -> Option<f64> {
        self.values
            .iter()
            .rev()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

impl<I: Into<Identifier>> Extend<(I, f64)> for Bindings {
    fn extend<T: IntoIterator<Item = (I, f64)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.push(name, value);
        }
    }
}

impl<I: Into<Identifier>> std::iter::FromIterator<(I, f64)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (I, f64)>>(iter: T) -> Self {
        let mut bindings = Bindings::new();
        bindings.extend(iter);
        bindings
    }
}

/// Calculate the numeric value of an [`Expression`].
///
/// Evaluation is lenient. Variables without a binding and operands which
/// were never filled in are both treated as `0.0`.
pub fn evaluate(arena: &Arena, id: ExprId, bindings: &Bindings) -> f64 {
    match arena[id] {
        Expression::Number(value) => value,
        Expression::Variable(ref name) => {
            bindings.resolve(name).unwrap_or(0.0)
        },
        Expression::Binary { op, left, right } => {
            let operand = |slot: Option<ExprId>| {
                slot.map(|id| evaluate(arena, id, bindings)).unwrap_or(0.0)
            };
            let left = operand(left);
            let right = operand(right);

            match op {
                BinaryOperation::Plus => left + right,
                BinaryOperation::Minus => left - right,
            }
        },
    }
}

/// Every occurrence of a particular variable inside an [`Equation`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Occurrences {
    /// The last matching node that was found.
    pub unknown: Option<ExprId>,
    /// How many nodes matched.
    pub hits: usize,
}

impl Occurrences {
    /// The unknown, if it appears exactly once.
    pub fn unique(&self) -> Option<ExprId> {
        if self.hits == 1 {
            self.unknown
        } else {
            None
        }
    }
}

/// Find the [`Expression::Variable`]s in an [`Equation`] which refer to
/// `name`, searching the left side then the right.
pub fn locate(
    arena: &Arena,
    equation: &Equation,
    name: &Identifier,
) -> Occurrences {
    let mut found = Occurrences {
        unknown: None,
        hits: 0,
    };

    for side in equation.sides().iter().copied() {
        for id in variables(arena, side) {
            if let Expression::Variable(ref candidate) = arena[id] {
                if candidate == name {
                    found.unknown = Some(id);
                    found.hits += 1;
                }
            }
        }
    }

    found
}

/// Iterate over every [`Expression::Variable`] in a tree, from left to right.
pub fn variables(
    arena: &Arena,
    root: ExprId,
) -> impl Iterator<Item = ExprId> + '_ {
    let mut pending = vec![root];

    std::iter::from_fn(move || {
        while let Some(id) = pending.pop() {
            match arena[id] {
                Expression::Variable(_) => return Some(id),
                Expression::Number(_) => {},
                Expression::Binary { left, right, .. } => {
                    // push right first so the left operand is visited first
                    pending.extend(right);
                    pending.extend(left);
                },
            }
        }

        None
    })
}

/// Does this tree mention `name` anywhere?
pub fn depends_on(arena: &Arena, root: ExprId, name: &Identifier) -> bool {
    variables(arena, root).any(|id| match arena[id] {
        Expression::Variable(ref candidate) => candidate == name,
        _ => false,
    })
}
