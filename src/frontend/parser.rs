use tracing::debug;

use crate::frontend::lexer::{Span, Spanned};
use crate::frontend::parser_error::{ParseErrorKind, ParserError};
use crate::frontend::token::Token;
use crate::lang::node::{BinOp, Node};

/// Parameter names declared in the `[ ... ]` header, in declaration order.
///
/// A name's position is the slot index the virtual machine reads from the
/// argument vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamTable {
    names: Vec<String>,
}

impl ParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    /// Slot index of `name`. A name declared twice resolves to its last
    /// declaration.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.names.iter().rposition(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl<S: Into<String>> FromIterator<S> for ParamTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Deepest expression tree a `Parser` builds by default.
///
/// Applies both to the height of the resulting tree and to how many
/// parentheses may be open at once.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Recursive-descent parser for the expression language.
///
/// ```text
/// program    := '[' IDENTIFIER* ']' expression EOF
/// expression := term (('+' | '-') term)*
/// term       := factor (('*' | '/') factor)*
/// factor     := INTEGER | '(' expression ')' | IDENTIFIER
/// ```
///
/// The parser borrows the lexer output and only ever moves its own cursor;
/// the token slice is never modified. Trees taller than `max_depth`, and
/// parentheses nested deeper than it, are rejected.
pub struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    /// Span of the most recently consumed token.
    ///
    /// Used for errors raised after running off the end of the slice.
    last_span: Option<Span>,
    max_depth: usize,
    /// Parentheses currently open.
    nesting: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned]) -> Self {
        Self::at(tokens, 0)
    }

    /// Creates a parser whose cursor starts at `pos`.
    pub fn at(tokens: &'a [Spanned], pos: usize) -> Self {
        Parser {
            tokens,
            pos,
            last_span: None,
            max_depth: DEFAULT_MAX_DEPTH,
            nesting: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Index of the next token to be consumed.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn current(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.current().map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<&'a Spanned> {
        let token = self.tokens.get(self.pos);
        if let Some(s) = token {
            self.last_span = Some(s.span);
        }
        self.pos += 1;
        token
    }

    /// Constructs a `ParserError` at the most relevant location.
    ///
    /// Priority:
    /// 1. If `current()` exists, use its span.
    /// 2. Else, use `last_span`.
    /// 3. Else, default to (1,1) for an empty token slice.
    fn error(&self, kind: ParseErrorKind) -> ParserError {
        let span = match (self.current(), &self.last_span) {
            (Some(spanned), _) => spanned.span,
            (None, Some(span)) => *span,
            (None, None) => Span { line: 1, col: 1 },
        };
        ParserError { kind, span }
    }

    fn at_end(&self) -> bool {
        matches!(self.peek(), None | Some(Token::Eof))
    }

    /// Parses a whole program: the parameter header, one expression, and
    /// nothing after it.
    pub fn parse_program(&mut self) -> Result<(ParamTable, Node), ParserError> {
        let params = self.parse_arguments()?;
        let node = self.parse_expression(&params)?;

        if !self.at_end() {
            let found = self.peek().map(ToString::to_string).unwrap_or_default();
            return Err(self.error(ParseErrorKind::MalformedExpression(format!(
                "unexpected '{}' after expression",
                found
            ))));
        }

        Ok((params, node))
    }

    /// Parses the parameter header:
    ///
    /// ```text
    /// [ <name>* ]
    /// ```
    ///
    /// # Errors
    /// - If the cursor is not on `[`.
    /// - If the header holds anything but identifiers.
    /// - If EOF is reached before `]`.
    pub fn parse_arguments(&mut self) -> Result<ParamTable, ParserError> {
        match self.peek() {
            Some(Token::LBracket) => {
                self.advance();
            }
            Some(other) => {
                let message = format!("expected '[', found '{}'", other);
                return Err(self.error(ParseErrorKind::MalformedBracket(message)));
            }
            None => {
                let message = "expected '['".to_string();
                return Err(self.error(ParseErrorKind::MalformedBracket(message)));
            }
        }

        let mut params = ParamTable::new();

        loop {
            match self.peek() {
                Some(Token::RBracket) => {
                    self.advance();
                    break;
                }
                Some(Token::Ident(name)) => {
                    params.push(name.clone());
                    self.advance();
                }
                None | Some(Token::Eof) => {
                    let message = "unexpected end of input, expected ']'".to_string();
                    return Err(self.error(ParseErrorKind::MalformedBracket(message)));
                }
                Some(other) => {
                    let message = format!("expected parameter name or ']', found '{}'", other);
                    return Err(self.error(ParseErrorKind::MalformedBracket(message)));
                }
            }
        }

        debug!(params = ?params.names(), "parsed argument list");
        Ok(params)
    }

    /// `expression := term (('+' | '-') term)*`
    pub fn parse_expression(&mut self, params: &ParamTable) -> Result<Node, ParserError> {
        self.expression(params).map(|(node, _)| node)
    }

    // Each rule returns the parsed tree together with its height.

    fn expression(&mut self, params: &ParamTable) -> Result<(Node, usize), ParserError> {
        let (mut node, mut depth) = self.term(params)?;

        while let Some(op) = self.peek().and_then(additive_op) {
            self.advance();
            let (rhs, rhs_depth) = self.term(params)?;
            depth = self.check_depth(1 + depth.max(rhs_depth))?;
            node = Node::binary(op, node, rhs);
        }

        Ok((node, depth))
    }

    /// `term := factor (('*' | '/') factor)*`
    fn term(&mut self, params: &ParamTable) -> Result<(Node, usize), ParserError> {
        let (mut node, mut depth) = self.factor(params)?;

        while let Some(op) = self.peek().and_then(multiplicative_op) {
            self.advance();
            let (rhs, rhs_depth) = self.factor(params)?;
            depth = self.check_depth(1 + depth.max(rhs_depth))?;
            node = Node::binary(op, node, rhs);
        }

        Ok((node, depth))
    }

    /// `factor := INTEGER | '(' expression ')' | IDENTIFIER`
    fn factor(&mut self, params: &ParamTable) -> Result<(Node, usize), ParserError> {
        match self.peek() {
            Some(Token::Integer(n)) => {
                let n = *n;
                self.advance();
                Ok((Node::Immediate(n), 1))
            }
            Some(Token::LParen) => {
                self.nesting += 1;
                self.check_depth(self.nesting)?;
                self.advance(); // consume '('
                let inner = self.expression(params)?;
                match self.peek() {
                    Some(Token::RParen) => {
                        self.advance();
                        self.nesting -= 1;
                        Ok(inner)
                    }
                    _ => Err(self.error(ParseErrorKind::MalformedExpression(
                        "expected ')' to close '('".to_string(),
                    ))),
                }
            }
            Some(Token::Ident(name)) => match params.lookup(name) {
                Some(slot) => {
                    self.advance();
                    Ok((Node::Argument(slot), 1))
                }
                None => Err(self.error(ParseErrorKind::UnknownIdentifier(name.clone()))),
            },
            None | Some(Token::Eof) => Err(self.error(ParseErrorKind::UnexpectedEof(
                "integer, identifier or '('".to_string(),
            ))),
            Some(other) => Err(self.error(ParseErrorKind::MalformedExpression(format!(
                "expected operand, found '{}'",
                other
            )))),
        }
    }

    fn check_depth(&self, depth: usize) -> Result<usize, ParserError> {
        if depth > self.max_depth {
            return Err(self.error(ParseErrorKind::MalformedExpression(format!(
                "expression nested too deeply (limit {})",
                self.max_depth
            ))));
        }
        Ok(depth)
    }
}

fn additive_op(token: &Token) -> Option<BinOp> {
    match token {
        Token::Plus => Some(BinOp::Add),
        Token::Minus => Some(BinOp::Sub),
        _ => None,
    }
}

fn multiplicative_op(token: &Token) -> Option<BinOp> {
    match token {
        Token::Star => Some(BinOp::Mul),
        Token::Slash => Some(BinOp::Div),
        _ => None,
    }
}
