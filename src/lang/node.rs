use serde::{Deserialize, Serialize};

/// One of the four binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`, truncating toward zero.
    Div,
}

impl BinOp {
    /// Applies the operator with wrapping `i64` semantics.
    ///
    /// Returns `None` only for division by zero. `i64::MIN / -1` wraps to
    /// `i64::MIN`.
    pub fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            BinOp::Add => Some(a.wrapping_add(b)),
            BinOp::Sub => Some(a.wrapping_sub(b)),
            BinOp::Mul => Some(a.wrapping_mul(b)),
            BinOp::Div => {
                if b == 0 {
                    None
                } else {
                    Some(a.wrapping_div(b))
                }
            }
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Abstract syntax tree node for an arithmetic expression.
///
/// Leaves are `Immediate` and `Argument`; every `BinaryOp` owns exactly two
/// children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    // ───────────────────────────── Leaves ─────────────────────────────
    /// An integer literal.
    ///
    /// Stack effect: `( -- n )`
    Immediate(i64),

    /// A reference to a declared parameter by slot index.
    ///
    /// Stack effect: `( -- args[slot] )`
    Argument(usize),

    // ───────────────────────────── Operators ──────────────────────────
    /// `left op right`.
    ///
    /// Stack effect: `( a b -- a op b )`
    BinaryOp {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn binary(op: BinOp, left: Node, right: Node) -> Self {
        Node::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Total number of nodes in the tree, leaves and operators alike.
    pub fn node_count(&self) -> usize {
        match self {
            Node::Immediate(_) | Node::Argument(_) => 1,
            Node::BinaryOp { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// True when no `Argument` appears anywhere in the tree.
    pub fn is_constant(&self) -> bool {
        match self {
            Node::Immediate(_) => true,
            Node::Argument(_) => false,
            Node::BinaryOp { left, right, .. } => left.is_constant() && right.is_constant(),
        }
    }

    /// Highest argument slot referenced, if any.
    pub fn max_slot(&self) -> Option<usize> {
        match self {
            Node::Immediate(_) => None,
            Node::Argument(slot) => Some(*slot),
            Node::BinaryOp { left, right, .. } => left.max_slot().max(right.max_slot()),
        }
    }

    /// Evaluates the tree directly against `args`.
    ///
    /// Uses the same arithmetic as the virtual machine. Returns `None` on
    /// division by zero or when a slot is missing from `args`.
    pub fn eval(&self, args: &[i64]) -> Option<i64> {
        match self {
            Node::Immediate(n) => Some(*n),
            Node::Argument(slot) => args.get(*slot).copied(),
            Node::BinaryOp { op, left, right } => op.apply(left.eval(args)?, right.eval(args)?),
        }
    }
}

impl std::fmt::Display for Node {
    /// Renders fully-parenthesised infix, e.g. `((2 * $0) + 1)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Immediate(n) => write!(f, "{}", n),
            Node::Argument(slot) => write!(f, "${}", slot),
            Node::BinaryOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}
