use crate::{
    equations::Equation,
    expr::{Arena, BinaryOperation, ExprId, Expression, Side},
    identifier::Identifier,
    ops,
};
use smol_str::SmolStr;

/// Reasons why [`solve_for()`] couldn't isolate a variable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    #[error("\"{name}\" doesn't appear in the equation")]
    UnknownNotFound { name: SmolStr },
    #[error("\"{name}\" appears {occurrences} times, but can only be isolated when it appears once")]
    UnknownNotUnique { name: SmolStr, occurrences: usize },
    #[error("There is no way to invert {node}")]
    UnsupportedOperator { node: ExprId },
    #[error("{node} is missing an operand")]
    MissingOperand { node: ExprId },
}

/// Rearrange an [`Equation`] so the variable, `name`, is by itself on the
/// left hand side, returning the expression it is equal to.
///
/// This is done by repeatedly taking the operator at the top of the side
/// containing the unknown and applying its inverse to both sides.
///
/// ```text
///  a + b = c   =>   a = c - b
///  a - b = c   =>   a = c + b
///  b - a = c   =>   a = b - c
/// ```
///
/// The [`Arena`] and `equation` are updated in place. On success `equation`
/// will be `name = solution`, and operator nodes which were inverted away
/// are released. Every precondition is checked before anything is touched,
/// so on failure both are left exactly as they were.
///
/// # Panics
///
/// The two sides of `equation` must be separate trees. Passing an equation
/// where one side is part of the other will panic.
///
/// # Examples
///
/// ```rust
/// use isolate::{equate, ops::Bindings, solve_for, Arena};
///
/// // x + 2 = 3
/// let mut arena = Arena::new();
/// let x = arena.variable("x");
/// let two = arena.number(2.0);
/// let left = arena.add(x, two);
/// let right = arena.number(3.0);
/// let mut equation = equate(left, right);
///
/// let solution = solve_for(&mut arena, &mut equation, "x").unwrap();
///
/// assert_eq!(arena.stringize(solution), "3.000000 - 2.000000");
/// assert_eq!(arena.stringize(equation), "x = 3.000000 - 2.000000");
/// assert_eq!(isolate::ops::evaluate(&arena, solution, &Bindings::new()), 1.0);
/// ```
pub fn solve_for(
    arena: &mut Arena,
    equation: &mut Equation,
    name: &str,
) -> Result<ExprId, SolveError> {
    assert!(
        arena.parent(equation.left).is_none()
            && arena.parent(equation.right).is_none()
            && equation.left != equation.right,
        "Both sides of an equation must be separate trees"
    );

    let name = Identifier::new(name);
    let _span = tracing::debug_span!("solve_for", unknown = %name).entered();

    let unknown = find_unknown(arena, equation, &name).map_err(|e| {
        tracing::debug!(error = %e, "Unable to find the unknown");
        e
    })?;
    check_path_to_root(arena, unknown).map_err(|e| {
        tracing::debug!(error = %e, "The unknown can't be isolated");
        e
    })?;

    let mut working = *equation;

    while arena.parent(unknown).is_some() {
        let (root, child) = outermost_operation(arena, unknown);

        if root == working.right {
            working = working.swapped();
        }
        debug_assert_eq!(root, working.left);

        working = invert(arena, root, child, working.right)?;
    }

    if working.right == unknown {
        // the unknown was already on its own, just on the wrong side
        working = working.swapped();
    }

    tracing::debug!(
        solution = %arena.display(working.right),
        "Isolated the unknown"
    );

    *equation = working;
    Ok(working.right)
}

fn find_unknown(
    arena: &Arena,
    equation: &Equation,
    name: &Identifier,
) -> Result<ExprId, SolveError> {
    let occurrences = ops::locate(arena, equation, name);

    match (occurrences.hits, occurrences.unique()) {
        (1, Some(unknown)) => Ok(unknown),
        (0, _) => Err(SolveError::UnknownNotFound {
            name: SmolStr::new(name.as_str()),
        }),
        (hits, _) => Err(SolveError::UnknownNotUnique {
            name: SmolStr::new(name.as_str()),
            occurrences: hits,
        }),
    }
}

/// Make sure every operation between the unknown and the top of its tree
/// can be inverted.
///
/// The rewrite loop visits exactly these nodes (outermost first), so if
/// this passes the loop can't fail halfway through.
fn check_path_to_root(arena: &Arena, unknown: ExprId) -> Result<(), SolveError> {
    for node in arena.ancestors(unknown).skip(1) {
        match arena[node] {
            Expression::Binary {
                left: Some(_),
                right: Some(_),
                ..
            } => {},
            Expression::Binary { .. } => {
                return Err(SolveError::MissingOperand { node })
            },
            _ => return Err(SolveError::UnsupportedOperator { node }),
        }
    }

    Ok(())
}

/// Find the top of the tree containing `unknown`, plus whichever of its
/// operands leads back down to the unknown.
fn outermost_operation(arena: &Arena, unknown: ExprId) -> (ExprId, ExprId) {
    let mut child = unknown;
    let mut root = unknown;

    while let Some(parent) = arena.parent(root) {
        child = root;
        root = parent;
    }

    (root, child)
}

/// Undo `root` by applying its inverse to both sides of `root = c`, giving
/// back an equation where `child` is the left hand side.
fn invert(
    arena: &mut Arena,
    root: ExprId,
    child: ExprId,
    c: ExprId,
) -> Result<Equation, SolveError> {
    let (op, left, right) = match arena[root] {
        Expression::Binary {
            op,
            left: Some(left),
            right: Some(right),
        } => (op, left, right),
        Expression::Binary { .. } => {
            return Err(SolveError::MissingOperand { node: root })
        },
        _ => return Err(SolveError::UnsupportedOperator { node: root }),
    };

    let (a, b, side) = if child == left {
        (left, right, Side::Left)
    } else {
        (right, left, Side::Right)
    };

    tracing::trace!(
        %root,
        ?op,
        unknown_side = ?side,
        equation = %arena.display(Equation::new(root, c)),
        "Inverting"
    );

    arena.detach(a);

    let new_right = match (op, side) {
        // [a + b = c] -> [a = c - b]
        (BinaryOperation::Plus, _) => arena.sub(c, b),
        // [a - b = c] -> [a = c + b]
        (BinaryOperation::Minus, Side::Left) => arena.add(c, b),
        // [b - a = c] -> [a = b - c]
        (BinaryOperation::Minus, Side::Right) => arena.sub(b, c),
    };

    // moving the operands out has left the old root empty
    arena.release(root);

    Ok(Equation::new(a, new_right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{equations::equate, ops::Bindings};

    fn evaluate(arena: &Arena, id: ExprId) -> f64 {
        ops::evaluate(arena, id, &Bindings::new())
    }

    #[test]
    fn unknown_on_the_left_of_a_plus() {
        // x + 2 = 3
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let two = arena.number(2.0);
        let left = arena.add(x, two);
        let right = arena.number(3.0);
        let mut equation = equate(left, right);

        let got = solve_for(&mut arena, &mut equation, "x").unwrap();

        assert_eq!(arena.stringize(got), "3.000000 - 2.000000");
        assert_eq!(evaluate(&arena, got), 1.0);
        assert_eq!(equation.left, x);
        assert_eq!(equation.right, got);
    }

    #[test]
    fn unknown_on_the_right_of_a_plus() {
        // 2 + x = 3
        let mut arena = Arena::new();
        let two = arena.number(2.0);
        let x = arena.variable("x");
        let left = arena.add(two, x);
        let right = arena.number(3.0);
        let mut equation = equate(left, right);

        let got = solve_for(&mut arena, &mut equation, "x").unwrap();

        assert_eq!(arena.stringize(got), "3.000000 - 2.000000");
    }

    #[test]
    fn unknown_is_the_minuend() {
        // x - 2 = 3
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let two = arena.number(2.0);
        let left = arena.sub(x, two);
        let right = arena.number(3.0);
        let mut equation = equate(left, right);

        let got = solve_for(&mut arena, &mut equation, "x").unwrap();

        assert_eq!(arena.stringize(got), "3.000000 + 2.000000");
        assert_eq!(evaluate(&arena, got), 5.0);
    }

    #[test]
    fn unknown_is_the_subtrahend_on_the_right_hand_side() {
        // 2 = 3 - x
        let mut arena = Arena::new();
        let left = arena.number(2.0);
        let three = arena.number(3.0);
        let x = arena.variable("x");
        let right = arena.sub(three, x);
        let mut equation = equate(left, right);

        let got = solve_for(&mut arena, &mut equation, "x").unwrap();

        assert_eq!(arena.stringize(got), "3.000000 - 2.000000");
        assert_eq!(evaluate(&arena, got), 1.0);
        assert_eq!(
            arena.stringize(equation),
            "x = 3.000000 - 2.000000"
        );
    }

    #[test]
    fn deeply_nested_unknown() {
        // (10 - (x + 1)) - y = 4
        let mut arena = Arena::new();
        let ten = arena.number(10.0);
        let x = arena.variable("x");
        let one = arena.number(1.0);
        let inner = arena.add(x, one);
        let middle = arena.sub(ten, inner);
        let y = arena.variable("y");
        let left = arena.sub(middle, y);
        let right = arena.number(4.0);
        let mut equation = equate(left, right);

        let got = solve_for(&mut arena, &mut equation, "x").unwrap();

        // x = (10 - (4 + y)) - 1
        assert_eq!(
            arena.stringize(got),
            "10.000000 - 4.000000 + y - 1.000000"
        );
        let bindings = Bindings::new().with("y", 2.0);
        assert_eq!(ops::evaluate(&arena, got, &bindings), 3.0);
        assert!(!ops::depends_on(&arena, got, &"x".into()));
    }

    #[test]
    fn inverted_operators_are_released() {
        // (x + 1) + 2 = 3
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let one = arena.number(1.0);
        let inner = arena.add(x, one);
        let two = arena.number(2.0);
        let outer = arena.add(inner, two);
        let three = arena.number(3.0);
        let mut equation = equate(outer, three);
        let nodes_before = arena.len();

        let got = solve_for(&mut arena, &mut equation, "x").unwrap();

        // each inversion releases one operator and allocates another
        assert_eq!(arena.len(), nodes_before);
        assert!(arena.try_get(outer).is_none());
        assert!(arena.try_get(inner).is_none());
        assert_eq!(arena.parent(x), None);
        assert_eq!(arena.parent(got), None);
        assert_eq!(evaluate(&arena, got), 0.0);
    }

    #[test]
    fn unknown_already_isolated_on_the_left() {
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let one = arena.number(1.0);
        let two = arena.number(2.0);
        let right = arena.add(one, two);
        let mut equation = equate(x, right);

        let got = solve_for(&mut arena, &mut equation, "x").unwrap();

        assert_eq!(got, right);
        assert_eq!(equation, equate(x, right));
    }

    #[test]
    fn unknown_already_isolated_on_the_right() {
        let mut arena = Arena::new();
        let three = arena.number(3.0);
        let x = arena.variable("x");
        let mut equation = equate(three, x);

        let got = solve_for(&mut arena, &mut equation, "x").unwrap();

        assert_eq!(got, three);
        assert_eq!(equation, equate(x, three));
    }

    #[test]
    fn other_variables_are_left_alone() {
        // x + y = z
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let y = arena.variable("y");
        let left = arena.add(x, y);
        let z = arena.variable("z");
        let mut equation = equate(left, z);

        let got = solve_for(&mut arena, &mut equation, "y").unwrap();

        assert_eq!(arena.stringize(got), "z - x");
    }

    #[test]
    fn missing_variables_are_reported() {
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let two = arena.number(2.0);
        let left = arena.add(x, two);
        let right = arena.number(3.0);
        let mut equation = equate(left, right);

        let got = solve_for(&mut arena, &mut equation, "y").unwrap_err();

        assert_eq!(got, SolveError::UnknownNotFound { name: "y".into() });
    }

    #[test]
    fn duplicate_variables_are_reported() {
        // x + 1 = x - 2
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let one = arena.number(1.0);
        let left = arena.add(x, one);
        let other_x = arena.variable("x");
        let two = arena.number(2.0);
        let right = arena.sub(other_x, two);
        let mut equation = equate(left, right);
        let original = arena.clone();

        let got = solve_for(&mut arena, &mut equation, "x").unwrap_err();

        assert_eq!(
            got,
            SolveError::UnknownNotUnique {
                name: "x".into(),
                occurrences: 2
            }
        );
        assert_eq!(arena, original);
        assert_eq!(equation, equate(left, right));
    }

    #[test]
    fn truncated_names_count_as_duplicates() {
        let mut arena = Arena::new();
        let first = arena.variable("distance_a");
        let second = arena.variable("distance_b");
        let mut equation = equate(first, second);

        let got =
            solve_for(&mut arena, &mut equation, "distance_a").unwrap_err();

        assert_eq!(
            got,
            SolveError::UnknownNotUnique {
                name: "distance".into(),
                occurrences: 2
            }
        );
    }

    #[test]
    fn incomplete_operators_are_reported_without_touching_anything() {
        // (x + _) - 1 = 3
        let mut arena = Arena::new();
        let incomplete = arena.plus();
        let x = arena.variable("x");
        arena.set_left(incomplete, x);
        let one = arena.number(1.0);
        let left = arena.sub(incomplete, one);
        let right = arena.number(3.0);
        let mut equation = equate(left, right);
        let original = arena.clone();

        let got = solve_for(&mut arena, &mut equation, "x").unwrap_err();

        assert_eq!(got, SolveError::MissingOperand { node: incomplete });
        assert_eq!(arena, original);
        assert_eq!(equation, equate(left, right));
    }

    #[test]
    fn only_operators_can_be_inverted() {
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let number = arena.number(1.0);
        let sum = arena.add(x, number);
        let right = arena.number(3.0);
        let equation = equate(sum, right);

        let got = check_path_to_root(&arena, x);
        assert_eq!(got, Ok(()));

        // a leaf can never be a parent through the public API, so invert it
        // directly to exercise the guard
        let got = invert(&mut arena, number, x, equation.right).unwrap_err();
        assert_eq!(got, SolveError::UnsupportedOperator { node: number });
    }

    #[test]
    #[should_panic(expected = "separate trees")]
    fn sides_must_be_separate_trees() {
        let mut arena = Arena::new();
        let x = arena.variable("x");
        let two = arena.number(2.0);
        let left = arena.add(x, two);
        let mut equation = equate(left, two);

        let _ = solve_for(&mut arena, &mut equation, "x");
    }

    #[test]
    fn error_messages() {
        let inputs = vec![
            (
                SolveError::UnknownNotFound { name: "x".into() },
                "\"x\" doesn't appear in the equation",
            ),
            (
                SolveError::UnknownNotUnique {
                    name: "x".into(),
                    occurrences: 3,
                },
                "\"x\" appears 3 times, but can only be isolated when it \
                 appears once",
            ),
        ];

        for (error, should_be) in inputs {
            assert_eq!(error.to_string(), should_be);
        }
    }
}
