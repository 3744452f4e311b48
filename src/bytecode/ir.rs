use serde::{Deserialize, Serialize};

use crate::bytecode::Op;

/// A compiled instruction sequence.
///
/// Produced once by code generation and never modified afterwards; the same
/// `Program` can be executed any number of times, from any number of threads,
/// with different argument vectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    ops: Vec<Op>,
}

impl Program {
    pub fn new(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Minimum argument vector length: highest `AR` slot plus one, or zero
    /// when the program reads no arguments. Saturates at `usize::MAX`.
    pub fn arity(&self) -> usize {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Arg(slot) => Some(slot.saturating_add(1)),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Number of instructions equal to `op`.
    pub fn count(&self, op: Op) -> usize {
        self.ops.iter().filter(|o| **o == op).count()
    }
}

impl std::fmt::Display for Program {
    /// One instruction per line, in the textual assembly format.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for op in &self.ops {
            writeln!(f, "{}", op)?;
        }
        Ok(())
    }
}
