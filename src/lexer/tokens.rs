use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("let", TokenKind::Let);
        map.insert("function", TokenKind::Function);
        map.insert("return", TokenKind::Return);
        map.insert("check", TokenKind::Check);
        map.insert("fail", TokenKind::Fail);
        map.insert("during", TokenKind::During);
        map.insert("import", TokenKind::Import);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Illegal,
    EOF,
    Newline,

    Identifier,
    Int,
    String,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Plus,
    Dash,
    Slash,
    Star,

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    And,
    Or,

    Comma,
    Dot,
    Semicolon,
    Colon,

    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,

    // Reserved
    Let,
    Function,
    Return,
    Check,
    Fail,
    During,
    Import,
    True,
    False,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Illegal => "illegal",
            TokenKind::EOF => "EOF",
            TokenKind::Newline => "newline",
            TokenKind::Identifier => "identifier",
            TokenKind::Int => "integer",
            TokenKind::String => "string",
            TokenKind::Assignment => "=",
            TokenKind::Equals => "==",
            TokenKind::Not => "!",
            TokenKind::NotEquals => "!=",
            TokenKind::Plus => "+",
            TokenKind::Dash => "-",
            TokenKind::Slash => "/",
            TokenKind::Star => "*",
            TokenKind::Less => "<",
            TokenKind::LessEquals => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEquals => ">=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::Let => "let",
            TokenKind::Function => "function",
            TokenKind::Return => "return",
            TokenKind::Check => "check",
            TokenKind::Fail => "fail",
            TokenKind::During => "during",
            TokenKind::Import => "import",
            TokenKind::True => "true",
            TokenKind::False => "false",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    /// Zero-based source line; diagnostics render it one-based.
    pub line: u32,
    /// One-based column of the token's first character.
    pub column: u32,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Identifier | TokenKind::Int | TokenKind::String => {
                write!(f, "{} ({})", self.kind, self.literal)
            }
            _ => write!(f, "{} ()", self.kind),
        }
    }
}
