use crate::errors::errors::{Error, ErrorImpl, Mark};
use crate::MK_TOKEN;

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Cursor-based lexer over the raw source text.
///
/// Newlines are significant and come out as their own tokens; spaces, tabs
/// and carriage returns are skipped. `//` comments run to the end of the
/// line and produce nothing.
pub struct Lexer {
    source: Vec<char>,
    position: usize,
    read_position: usize,
    ch: char,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer {
            source: source.chars().collect(),
            position: 0,
            read_position: 0,
            ch: '\0',
            line: 0,
            column: 0,
        };
        lexer.read_char();
        lexer
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.skip_whitespace();

        let line = self.line;
        let column = self.column;

        let token = match self.ch {
            '=' => {
                if self.peek_char() == '=' {
                    self.read_char();
                    MK_TOKEN!(TokenKind::Equals, "==", line, column)
                } else {
                    MK_TOKEN!(TokenKind::Assignment, "=", line, column)
                }
            }
            '!' => {
                if self.peek_char() == '=' {
                    self.read_char();
                    MK_TOKEN!(TokenKind::NotEquals, "!=", line, column)
                } else {
                    MK_TOKEN!(TokenKind::Not, "!", line, column)
                }
            }
            '<' => {
                if self.peek_char() == '=' {
                    self.read_char();
                    MK_TOKEN!(TokenKind::LessEquals, "<=", line, column)
                } else {
                    MK_TOKEN!(TokenKind::Less, "<", line, column)
                }
            }
            '>' => {
                if self.peek_char() == '=' {
                    self.read_char();
                    MK_TOKEN!(TokenKind::GreaterEquals, ">=", line, column)
                } else {
                    MK_TOKEN!(TokenKind::Greater, ">", line, column)
                }
            }
            '&' => {
                if self.peek_char() == '&' {
                    self.read_char();
                    MK_TOKEN!(TokenKind::And, "&&", line, column)
                } else {
                    return Err(Error::with_mark(
                        ErrorImpl::IllegalToken,
                        line,
                        column,
                        Mark::width(1),
                    ));
                }
            }
            '|' => {
                if self.peek_char() == '|' {
                    self.read_char();
                    MK_TOKEN!(TokenKind::Or, "||", line, column)
                } else {
                    return Err(Error::with_mark(
                        ErrorImpl::IllegalToken,
                        line,
                        column,
                        Mark::width(1),
                    ));
                }
            }
            '/' => {
                if self.peek_char() == '/' {
                    while self.ch != '\n' && self.ch != '\0' {
                        self.read_char();
                    }
                    return self.next_token();
                }
                MK_TOKEN!(TokenKind::Slash, "/", line, column)
            }
            '+' => MK_TOKEN!(TokenKind::Plus, "+", line, column),
            '-' => MK_TOKEN!(TokenKind::Dash, "-", line, column),
            '*' => MK_TOKEN!(TokenKind::Star, "*", line, column),
            ',' => MK_TOKEN!(TokenKind::Comma, ",", line, column),
            '.' => MK_TOKEN!(TokenKind::Dot, ".", line, column),
            ';' => MK_TOKEN!(TokenKind::Semicolon, ";", line, column),
            ':' => MK_TOKEN!(TokenKind::Colon, ":", line, column),
            '(' => MK_TOKEN!(TokenKind::OpenParen, "(", line, column),
            ')' => MK_TOKEN!(TokenKind::CloseParen, ")", line, column),
            '{' => MK_TOKEN!(TokenKind::OpenCurly, "{", line, column),
            '}' => MK_TOKEN!(TokenKind::CloseCurly, "}", line, column),
            '\n' => MK_TOKEN!(TokenKind::Newline, "\n", line, column),
            '"' => {
                let literal = self.read_string(line, column)?;
                let token = MK_TOKEN!(TokenKind::String, literal, line, column);
                self.read_char();
                return Ok(token);
            }
            '\0' => MK_TOKEN!(TokenKind::EOF, "", line, column),
            ch if is_identifier_start(ch) => {
                let literal = self.read_identifier();
                let kind = RESERVED_LOOKUP
                    .get(literal.as_str())
                    .copied()
                    .unwrap_or(TokenKind::Identifier);
                return Ok(MK_TOKEN!(kind, literal, line, column));
            }
            ch if ch.is_ascii_digit() => {
                let literal = self.read_number();
                return Ok(MK_TOKEN!(TokenKind::Int, literal, line, column));
            }
            _ => {
                return Err(Error::with_mark(
                    ErrorImpl::IllegalToken,
                    line,
                    column,
                    Mark::width(1),
                ));
            }
        };

        self.read_char();
        Ok(token)
    }

    fn read_char(&mut self) {
        self.ch = self.source.get(self.read_position).copied().unwrap_or('\0');
        self.position = self.read_position;
        self.read_position += 1;
        if self.ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    fn peek_char(&self) -> char {
        self.source.get(self.read_position).copied().unwrap_or('\0')
    }

    fn skip_whitespace(&mut self) {
        while self.ch == ' ' || self.ch == '\t' || self.ch == '\r' {
            self.read_char();
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut literal = String::new();
        while is_identifier_start(self.ch) || self.ch.is_ascii_digit() {
            literal.push(self.ch);
            self.read_char();
        }
        literal
    }

    fn read_number(&mut self) -> String {
        let mut literal = String::new();
        while self.ch.is_ascii_digit() {
            literal.push(self.ch);
            self.read_char();
        }
        literal
    }

    /// Reads a string literal, resolving escape sequences. `self.ch` is the
    /// opening quote on entry and the closing quote on a successful return.
    fn read_string(&mut self, line: u32, column: u32) -> Result<String, Error> {
        let mut literal = String::new();
        self.read_char();

        while self.ch != '"' {
            if self.ch == '\0' {
                return Err(Error::with_mark(
                    ErrorImpl::UnterminatedString,
                    line,
                    column,
                    Mark::to_end_of_line((column as usize).saturating_sub(1)),
                ));
            }
            if self.ch == '\\' {
                match self.peek_char() {
                    '"' => literal.push('"'),
                    '\\' => literal.push('\\'),
                    'n' => literal.push('\n'),
                    'r' => literal.push('\r'),
                    't' => literal.push('\t'),
                    'b' => literal.push('\x08'),
                    'f' => literal.push('\x0c'),
                    'v' => literal.push('\x0b'),
                    '0' => literal.push('\0'),
                    _ => {
                        // Unknown escape, keep the backslash as-is.
                        literal.push(self.ch);
                        self.read_char();
                        continue;
                    }
                }
                self.read_char();
            } else {
                literal.push(self.ch);
            }
            self.read_char();
        }

        Ok(literal)
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Drains the lexer into a token stream, ending with an `EOF` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);
        if done {
            break;
        }
    }

    Ok(tokens)
}
