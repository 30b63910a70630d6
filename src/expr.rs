use crate::identifier::Identifier;
use std::{
    fmt::{self, Display, Formatter},
    ops::Index,
};

/// A handle to an [`Expression`] living inside an [`Arena`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(usize);

impl Display for ExprId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    Variable(Identifier),
    /// An expression involving two operands.
    ///
    /// Operands start out empty when created with [`Arena::plus()`] or
    /// [`Arena::minus()`] and are filled in afterwards.
    Binary {
        op: BinaryOperation,
        left: Option<ExprId>,
        right: Option<ExprId>,
    },
}

impl Expression {
    pub fn is_binary(&self) -> bool {
        match self {
            Expression::Binary { .. } => true,
            _ => false,
        }
    }

    /// The operands of a binary expression, in order.
    pub fn operands(&self) -> impl Iterator<Item = ExprId> {
        let (left, right) = match *self {
            Expression::Binary { left, right, .. } => (left, right),
            _ => (None, None),
        };

        left.into_iter().chain(right)
    }
}

/// An operation that can be applied to two arguments.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperation {
    Plus,
    Minus,
}

impl BinaryOperation {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperation::Plus => "+",
            BinaryOperation::Minus => "-",
        }
    }
}

/// Which operand slot of a [`Expression::Binary`] a node occupies.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    expr: Expression,
    parent: Option<ExprId>,
}

/// The owner of every [`Expression`] node.
///
/// Nodes refer to their operands and to their parent using [`ExprId`]
/// handles. Every method which changes the tree's shape keeps the two in
/// sync, so a node's `parent` always names the one operator whose slot
/// contains it.
///
/// Released nodes leave a hole behind which is never handed out again,
/// meaning a stale [`ExprId`] can't silently refer to a different node.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Arena {
    nodes: Vec<Option<Node>>,
    live: usize,
}

impl Arena {
    pub fn new() -> Self { Arena::default() }

    pub fn number(&mut self, value: f64) -> ExprId {
        self.alloc(Expression::Number(value))
    }

    pub fn variable<I: Into<Identifier>>(&mut self, name: I) -> ExprId {
        self.alloc(Expression::Variable(name.into()))
    }

    /// Create an addition with empty operands.
    pub fn plus(&mut self) -> ExprId { self.binary(BinaryOperation::Plus) }

    /// Create a subtraction with empty operands.
    pub fn minus(&mut self) -> ExprId { self.binary(BinaryOperation::Minus) }

    /// Create `left + right`.
    pub fn add(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.binary_with(BinaryOperation::Plus, left, right)
    }

    /// Create `left - right`.
    pub fn sub(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.binary_with(BinaryOperation::Minus, left, right)
    }

    pub fn binary_with(
        &mut self,
        op: BinaryOperation,
        left: ExprId,
        right: ExprId,
    ) -> ExprId {
        let id = self.binary(op);
        self.set_left(id, left);
        self.set_right(id, right);
        id
    }

    fn binary(&mut self, op: BinaryOperation) -> ExprId {
        self.alloc(Expression::Binary {
            op,
            left: None,
            right: None,
        })
    }

    fn alloc(&mut self, expr: Expression) -> ExprId {
        let id = ExprId(self.nodes.len());
        self.nodes.push(Some(Node { expr, parent: None }));
        self.live += 1;
        id
    }

    /// Put `child` in the left operand slot of `op`.
    ///
    /// # Panics
    ///
    /// Panics if `op` isn't a binary expression or `child` is one of `op`'s
    /// ancestors (or `op` itself).
    pub fn set_left(&mut self, op: ExprId, child: ExprId) {
        self.attach(op, Side::Left, child);
    }

    /// Put `child` in the right operand slot of `op`.
    ///
    /// # Panics
    ///
    /// Panics if `op` isn't a binary expression or `child` is one of `op`'s
    /// ancestors (or `op` itself).
    pub fn set_right(&mut self, op: ExprId, child: ExprId) {
        self.attach(op, Side::Right, child);
    }

    /// Move `child` into one of `op`'s operand slots.
    ///
    /// Whatever `child` was previously attached to loses it, and whatever
    /// used to occupy the slot becomes a root.
    pub(crate) fn attach(&mut self, op: ExprId, side: Side, child: ExprId) {
        assert!(
            !self.ancestors(op).any(|ancestor| ancestor == child),
            "Attaching {} to {} would create a cycle",
            child,
            op
        );
        assert!(
            self[op].is_binary(),
            "Only binary expressions have operands, but {} is {:?}",
            op,
            self[op]
        );

        self.detach(child);

        let previous = match self.node_mut(op).expr {
            Expression::Binary {
                ref mut left,
                ref mut right,
                ..
            } => match side {
                Side::Left => left.replace(child),
                Side::Right => right.replace(child),
            },
            _ => None,
        };

        if let Some(previous) = previous {
            self.node_mut(previous).parent = None;
        }
        self.node_mut(child).parent = Some(op);
    }

    /// Cut `id` loose from its parent, making it the root of its own tree.
    pub fn detach(&mut self, id: ExprId) {
        let parent = match self.node_mut(id).parent.take() {
            Some(parent) => parent,
            None => return,
        };

        if let Expression::Binary {
            ref mut left,
            ref mut right,
            ..
        } = self.node_mut(parent).expr
        {
            if *left == Some(id) {
                *left = None;
            } else if *right == Some(id) {
                *right = None;
            }
        }
    }

    /// Throw away a node which is no longer referenced by anything.
    ///
    /// Its operands (if any) become roots.
    pub(crate) fn release(&mut self, id: ExprId) {
        self.detach(id);

        let operands: Vec<_> = self[id].operands().collect();
        for operand in operands {
            self.node_mut(operand).parent = None;
        }

        self.nodes[id.0] = None;
        self.live -= 1;
    }

    pub fn parent(&self, id: ExprId) -> Option<ExprId> { self.node(id).parent }

    /// Iterate over `id` and each of its ancestors, innermost first.
    pub fn ancestors(&self, id: ExprId) -> impl Iterator<Item = ExprId> + '_ {
        std::iter::successors(Some(id), move |&current| self.parent(current))
    }

    /// Follow `parent` links all the way up from `id`.
    pub fn root_of(&self, id: ExprId) -> ExprId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Look up an expression, returning `None` if it has been released.
    pub fn try_get(&self, id: ExprId) -> Option<&Expression> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .map(|node| &node.expr)
    }

    /// The number of nodes which haven't been released.
    pub fn len(&self) -> usize { self.live }

    pub fn is_empty(&self) -> bool { self.live == 0 }

    fn node(&self, id: ExprId) -> &Node {
        match self.nodes.get(id.0) {
            Some(Some(node)) => node,
            Some(None) => panic!("{} has already been released", id),
            None => panic!("{} doesn't belong to this arena", id),
        }
    }

    fn node_mut(&mut self, id: ExprId) -> &mut Node {
        match self.nodes.get_mut(id.0) {
            Some(Some(node)) => node,
            Some(None) => panic!("{} has already been released", id),
            None => panic!("{} doesn't belong to this arena", id),
        }
    }
}

impl Index<ExprId> for Arena {
    type Output = Expression;

    fn index(&self, id: ExprId) -> &Expression { &self.node(id).expr }
}
