use serde::{Deserialize, Serialize};

use crate::lang::node::BinOp;

// =============================================================================
// OP - Instructions for the two-register, one-stack machine
// =============================================================================

/// A single machine instruction.
///
/// The machine has a primary register `r0`, a secondary register `r1`, and an
/// integer stack. Arithmetic always reads `r0` and `r1` and writes `r0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    // registers
    /// `IM n`: r0 := n
    Imm(i64),
    /// `AR n`: r0 := args[n]
    Arg(usize),
    /// `SW`: swap r0 and r1
    Swap,

    // stack
    /// `PU`: push r0
    Push,
    /// `PO`: pop into r0
    Pop,

    // arithmetic, r0 := r0 op r1
    /// `AD`
    Add,
    /// `SU`
    Sub,
    /// `MU`
    Mul,
    /// `DI`
    Div,
}

impl Op {
    /// Two-letter assembly mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Imm(_) => "IM",
            Op::Arg(_) => "AR",
            Op::Swap => "SW",
            Op::Push => "PU",
            Op::Pop => "PO",
            Op::Add => "AD",
            Op::Sub => "SU",
            Op::Mul => "MU",
            Op::Div => "DI",
        }
    }

    /// The arithmetic this instruction performs, if any.
    pub fn binop(&self) -> Option<BinOp> {
        match self {
            Op::Add => Some(BinOp::Add),
            Op::Sub => Some(BinOp::Sub),
            Op::Mul => Some(BinOp::Mul),
            Op::Div => Some(BinOp::Div),
            _ => None,
        }
    }
}

impl From<BinOp> for Op {
    fn from(op: BinOp) -> Self {
        match op {
            BinOp::Add => Op::Add,
            BinOp::Sub => Op::Sub,
            BinOp::Mul => Op::Mul,
            BinOp::Div => Op::Div,
        }
    }
}

impl std::fmt::Display for Op {
    /// Formats as assembly text, e.g. `IM 3`, `AR 0`, `PU`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::Imm(n) => write!(f, "{} {}", self.mnemonic(), n),
            Op::Arg(slot) => write!(f, "{} {}", self.mnemonic(), slot),
            _ => write!(f, "{}", self.mnemonic()),
        }
    }
}
