use thiserror::Error;
use tracing::{debug, warn};

use crate::frontend::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{col}: {message}")]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current();
        if ch == Some('\n') {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.pos += 1;
        ch
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            col: self.col,
        }
    }

    fn read_number(&mut self) -> Result<Token, LexerError> {
        let start = self.span();

        let mut digits = String::new();
        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        digits
            .parse::<i64>()
            .map(Token::Integer)
            .map_err(|_| LexerError {
                message: format!("integer literal out of range: {}", digits),
                line: start.line,
                col: start.col,
            })
    }

    fn read_identifier(&mut self) -> Token {
        let mut ident = String::new();
        while let Some(ch) = self.current() {
            if ch.is_ascii_alphabetic() {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::Ident(ident)
    }

    fn read_operator(&mut self) -> Option<Token> {
        let token = match self.current()? {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            _ => return None,
        };
        self.advance();
        Some(token)
    }

    /// Splits the source into tokens, always ending with exactly one `Token::Eof`.
    ///
    /// Characters that start no token (whitespace, punctuation outside the
    /// operator set, non-ASCII letters) are skipped rather than rejected.
    /// Only an integer literal too large for `i64` is an error.
    pub fn tokenize(&mut self) -> Result<Vec<Spanned>, LexerError> {
        let mut tokens = Vec::new();

        loop {
            let span = self.span();

            match self.current() {
                None => {
                    tokens.push(Spanned {
                        token: Token::Eof,
                        span,
                    });
                    break;
                }
                Some(ch) if ch.is_ascii_digit() => {
                    let token = self.read_number()?;
                    tokens.push(Spanned { token, span });
                }
                Some(ch) if ch.is_ascii_alphabetic() => {
                    let token = self.read_identifier();
                    tokens.push(Spanned { token, span });
                }
                Some(ch) => {
                    if let Some(token) = self.read_operator() {
                        tokens.push(Spanned { token, span });
                    } else {
                        if !ch.is_whitespace() {
                            warn!(%span, character = ?ch, "skipping unrecognized character");
                        }
                        self.advance();
                    }
                }
            }
        }

        debug!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        lexer
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    fn ident(name: &str) -> Token {
        Token::Ident(name.to_string())
    }

    #[test]
    fn test_empty_source_is_just_eof() {
        assert_eq!(tokens(""), vec![Token::Eof]);
        assert_eq!(tokens("   \n\t"), vec![Token::Eof]);
    }

    #[test]
    fn test_header_and_expression() {
        let t = tokens("[ x y ] x + 12");
        assert_eq!(
            t,
            vec![
                Token::LBracket,
                ident("x"),
                ident("y"),
                Token::RBracket,
                ident("x"),
                Token::Plus,
                Token::Integer(12),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_all_operators_and_delimiters() {
        let t = tokens("+-*/()[]");
        assert_eq!(
            t,
            vec![
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
                Token::LParen,
                Token::RParen,
                Token::LBracket,
                Token::RBracket,
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_longest_match_runs() {
        // letters and digits never merge into one token
        let t = tokens("abc123def");
        assert_eq!(
            t,
            vec![ident("abc"), Token::Integer(123), ident("def"), Token::Eof]
        );
    }

    #[test]
    fn test_no_whitespace_needed() {
        let t = tokens("2*3*x");
        assert_eq!(
            t,
            vec![
                Token::Integer(2),
                Token::Star,
                Token::Integer(3),
                Token::Star,
                ident("x"),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_unrecognized_characters_are_skipped() {
        let t = tokens("1 % 2 _a ; b");
        assert_eq!(
            t,
            vec![
                Token::Integer(1),
                Token::Integer(2),
                ident("a"),
                ident("b"),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(tokens("007"), vec![Token::Integer(7), Token::Eof]);
    }

    #[test]
    fn test_integer_overflow_is_error() {
        let mut lexer = Lexer::new("[] 1 + 99999999999999999999");
        let err = lexer.tokenize().unwrap_err();
        assert!(err.message.contains("out of range"));
        assert_eq!((err.line, err.col), (1, 8));
    }

    #[test]
    fn test_spans_track_lines_and_columns() {
        let mut lexer = Lexer::new("[ a ]\n  a");
        let spanned = lexer.tokenize().unwrap();
        assert_eq!(spanned[1].span, Span { line: 1, col: 3 });
        assert_eq!(spanned[3].span, Span { line: 2, col: 3 });
    }

    #[test]
    fn test_single_eof_at_tail() {
        let t = tokens("[a] a");
        assert_eq!(t.iter().filter(|t| **t == Token::Eof).count(), 1);
        assert_eq!(t.last(), Some(&Token::Eof));
    }
}
