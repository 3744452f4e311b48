use thiserror::Error;

use crate::frontend::lexer::Span;

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// An identifier in the expression that the header never declared.
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    /// The `[ ... ]` parameter header is missing, unterminated, or holds
    /// something other than names.
    #[error("malformed argument list: {0}")]
    MalformedBracket(String),

    /// A token that cannot appear where it was found, an unmatched `(`, or
    /// leftover tokens after a complete expression.
    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    /// The input ended where an operand was required.
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEof(String),
}

/// A parsing error with source location.
///
/// `span` is 1-based and comes from the lexer. Errors at end of input point
/// at the end-of-stream token, which sits just past the last character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{span}: {kind}")]
pub struct ParserError {
    pub kind: ParseErrorKind,
    pub span: Span,
}
