use tracing::debug;

use crate::{
    bytecode::{Op, Program},
    lang::node::Node,
};

/// Lowers an expression tree to machine instructions.
///
/// Every node, the root included, leaves its value on the stack, so the
/// generated program holds exactly one `PU` per tree node. After the last
/// instruction `r0` holds the result.
pub struct CodeGen {
    ops: Vec<Op>,
}

impl CodeGen {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn generate(mut self, node: &Node) -> Program {
        self.emit_node(node);
        debug!(instructions = self.ops.len(), "generated program");
        Program::new(self.ops)
    }

    fn emit_node(&mut self, node: &Node) {
        match node {
            Node::Immediate(n) => self.ops.push(Op::Imm(*n)),
            Node::Argument(slot) => self.ops.push(Op::Arg(*slot)),
            Node::BinaryOp { op, left, right } => {
                self.emit_node(left);
                self.emit_node(right);
                // right -> r0, move it to r1, left -> r0
                self.ops.extend([Op::Pop, Op::Swap, Op::Pop]);
                self.ops.push(Op::from(*op));
            }
        }
        self.ops.push(Op::Push);
    }
}

impl Default for CodeGen {
    fn default() -> Self {
        Self::new()
    }
}

/// Post-order code generation for `node`.
pub fn generate(node: &Node) -> Program {
    CodeGen::new().generate(node)
}
