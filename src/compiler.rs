//! The three compilation passes and their composition.
//!
//! 1. `pass1`: source text → expression tree
//! 2. `pass2`: constant folding
//! 3. `pass3`: code generation

use tracing::debug;

use crate::{
    Result,
    bytecode::{Program, compile::generate},
    frontend::{lexer::Lexer, parser::Parser},
    lang::{fold::fold, node::Node},
};

#[derive(Debug, Clone)]
pub struct Compiler {
    fold: bool,
}

impl Default for Compiler {
    fn default() -> Self {
        Self { fold: true }
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skips `pass2` in `compile`. Literal division by zero then traps at
    /// run time instead of failing compilation.
    pub fn without_folding(mut self) -> Self {
        self.fold = false;
        self
    }

    /// Lexes and parses `source` into an unoptimized tree.
    pub fn pass1(&self, source: &str) -> Result<Node> {
        let tokens = Lexer::new(source).tokenize()?;
        let (params, node) = Parser::new(&tokens).parse_program()?;
        debug!(
            params = params.len(),
            nodes = node.node_count(),
            max_slot = ?node.max_slot(),
            "pass1 complete"
        );
        Ok(node)
    }

    /// Folds constant subtrees.
    pub fn pass2(&self, node: Node) -> Result<Node> {
        let folded = fold(node)?;
        debug!(nodes = folded.node_count(), "pass2 complete");
        Ok(folded)
    }

    /// Generates machine instructions.
    pub fn pass3(&self, node: &Node) -> Program {
        generate(node)
    }

    pub fn compile(&self, source: &str) -> Result<Program> {
        let mut node = self.pass1(source)?;
        if self.fold {
            node = self.pass2(node)?;
        }
        Ok(self.pass3(&node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::bytecode::Op;
    use crate::lang::fold::FoldError;
    use crate::runtime::{RuntimeError, vm::simulate};

    #[test]
    fn test_pass1_is_unoptimized() {
        let node = Compiler::new().pass1("[] 1 + 2").unwrap();
        assert_eq!(node.node_count(), 3);
    }

    #[test]
    fn test_pass2_folds() {
        let compiler = Compiler::new();
        let node = compiler.pass1("[] 1 + 2").unwrap();
        assert_eq!(compiler.pass2(node).unwrap(), Node::Immediate(3));
    }

    #[test]
    fn test_compile_constant_program() {
        let program = Compiler::new().compile("[] 2 + 3 * 4").unwrap();
        assert_eq!(program.ops(), [Op::Imm(14), Op::Push]);
    }

    #[test]
    fn test_without_folding_keeps_tree() {
        let program = Compiler::new()
            .without_folding()
            .compile("[] 2 + 3 * 4")
            .unwrap();
        assert_eq!(program.count(Op::Push), 5);
        assert_eq!(simulate(&program, &[]).unwrap(), 14);
    }

    #[test]
    fn test_literal_division_by_zero() {
        let err = Compiler::new().compile("[] 1/0").unwrap_err();
        assert!(matches!(err, Error::Fold(FoldError::DivisionByZero { dividend: 1 })));

        let program = Compiler::new().without_folding().compile("[] 1/0").unwrap();
        assert!(matches!(
            simulate(&program, &[]),
            Err(RuntimeError::DivisionByZero { .. })
        ));
    }
}
