use thiserror::Error;

use crate::bytecode::Op;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackCheckError {
    #[error("stack-check error: stack underflow at ip={ip}, op={op}")]
    Underflow { ip: usize, op: Op },
}

/// Static facts about a program's stack use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackReport {
    /// Deepest the stack gets during execution.
    pub max_depth: usize,
    /// Stack height after the last instruction.
    pub final_depth: usize,
    /// Minimum argument vector length.
    pub arity: usize,
}

/// Returns (pops, pushes) for an op.
fn effect(op: &Op) -> (usize, usize) {
    match op {
        Op::Push => (0, 1),
        Op::Pop => (1, 0),
        Op::Imm(_) | Op::Arg(_) | Op::Swap => (0, 0),
        Op::Add | Op::Sub | Op::Mul | Op::Div => (0, 0),
    }
}

/// Walks `ops` once, tracking stack height.
///
/// Programs are straight-line, so a linear scan is exact: a program that
/// passes can never underflow at run time.
pub fn check_ops(ops: &[Op]) -> Result<StackReport, StackCheckError> {
    let mut h: usize = 0;
    let mut max_depth = 0;
    let mut arity = 0;

    for (ip, op) in ops.iter().enumerate() {
        let (pops, pushes) = effect(op);
        h = h
            .checked_sub(pops)
            .ok_or(StackCheckError::Underflow { ip, op: *op })?;
        h += pushes;
        max_depth = max_depth.max(h);

        if let Op::Arg(slot) = op {
            arity = arity.max(slot.saturating_add(1));
        }
    }

    Ok(StackReport {
        max_depth,
        final_depth: h,
        arity,
    })
}
