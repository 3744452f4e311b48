use thiserror::Error;
use tracing::trace;

use super::node::Node;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoldError {
    /// Both operands of `/` were literals and the divisor was zero.
    #[error("fold error: division by zero in constant expression {dividend} / 0")]
    DivisionByZero { dividend: i64 },
}

/// Collapses every fully-constant subtree into a single `Immediate`.
///
/// Children are reduced first, so `(1 + 2) * x` becomes `3 * x`. Nothing
/// beyond literal evaluation is attempted: `x * 0` stays as it is.
pub fn fold(node: Node) -> Result<Node, FoldError> {
    match node {
        Node::Immediate(_) | Node::Argument(_) => Ok(node),
        Node::BinaryOp { op, left, right } => {
            let left = fold(*left)?;
            let right = fold(*right)?;

            match (left, right) {
                (Node::Immediate(a), Node::Immediate(b)) => {
                    let value = op
                        .apply(a, b)
                        .ok_or(FoldError::DivisionByZero { dividend: a })?;
                    trace!(%op, a, b, value, "folded constant");
                    Ok(Node::Immediate(value))
                }
                (left, right) => Ok(Node::binary(op, left, right)),
            }
        }
    }
}
