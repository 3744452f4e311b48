//! Compiler for a small arithmetic expression language targeting a
//! two-register, one-stack virtual machine.
//!
//! ```text
//! [ x y z ] ( 2*3*x + 5*y - 3*z ) / (1 + 3 + 2*2)
//! ```
//!
//! The bracketed header declares parameters; their positions are the slots
//! read by `AR n` at run time. A compiled [`Program`] is immutable and can be
//! run any number of times with [`simulate`].

pub mod bytecode;
pub mod compiler;
pub mod frontend;
pub mod lang;
pub mod runtime;

use thiserror::Error;

pub use bytecode::{AsmError, Op, Program, generate};
pub use compiler::Compiler;
pub use frontend::lexer::{LexerError, Spanned};
pub use frontend::parser::ParamTable;
pub use frontend::parser_error::{ParseErrorKind, ParserError};
pub use lang::fold::{FoldError, fold};
pub use lang::node::{BinOp, Node};
pub use runtime::{RuntimeError, vm::simulate};

use frontend::{lexer::Lexer, parser::Parser};

/// Any failure from compiling or running a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("lexer error: {0}")]
    Lex(#[from] LexerError),

    #[error("parse error: {0}")]
    Parse(#[from] ParserError),

    #[error(transparent)]
    Fold(#[from] FoldError),

    #[error(transparent)]
    Asm(#[from] AsmError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Compiles `source` with constant folding enabled.
pub fn compile(source: &str) -> Result<Program> {
    Compiler::new().compile(source)
}

/// Splits `source` into tokens ending with a single end-of-stream token.
pub fn tokenize(source: &str) -> std::result::Result<Vec<Spanned>, LexerError> {
    Lexer::new(source).tokenize()
}

/// Parses the `[ ... ]` header at the start of `tokens`.
///
/// Returns the parameter table and the index of the first token after `]`.
pub fn parse_arguments(
    tokens: &[Spanned],
) -> std::result::Result<(ParamTable, usize), ParserError> {
    let mut parser = Parser::new(tokens);
    let params = parser.parse_arguments()?;
    Ok((params, parser.position()))
}

/// Parses one expression starting at token index `cursor`.
///
/// Returns the tree and the index of the first token not consumed. Trailing
/// tokens are left for the caller.
pub fn parse_expression(
    tokens: &[Spanned],
    cursor: usize,
    params: &ParamTable,
) -> std::result::Result<(Node, usize), ParserError> {
    let mut parser = Parser::at(tokens, cursor);
    let node = parser.parse_expression(params)?;
    Ok((node, parser.position()))
}

/// Lexes and parses a whole program into an unoptimized tree.
pub fn parse(source: &str) -> Result<Node> {
    Compiler::new().pass1(source)
}
