#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // Literals
    Integer(i64),

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,

    // Delimiters
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]

    // Parameter name or reference
    Ident(String),

    // Special
    Eof,
}

impl Token {
    /// Short human-readable name for the token kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Integer(_) => "INT",
            Token::Plus | Token::Minus | Token::Star | Token::Slash => "OP",
            Token::LParen | Token::RParen | Token::LBracket | Token::RBracket => "DELIM",
            Token::Ident(_) => "IDENT",
            Token::Eof => "EOF",
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "{}", n),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Ident(s) => write!(f, "{}", s),
            Token::Eof => write!(f, "EOF"),
        }
    }
}
