//! Single-pass parser with fused type checking.
//!
//! The parser pulls tokens from the lexer through a two-token cursor and
//! builds a fully typed tree in one pass; there is no separate semantic
//! phase. The first error aborts the whole compilation, warnings are
//! accumulated and flushed once the program parsed successfully.

use std::collections::HashMap;

use crate::ast::ast::{FunctionSignature, Program};
use crate::ast::types::StaticType;
use crate::errors::errors::{Error, ErrorImpl, Mark, Warning};
use crate::lexer::lexer::Lexer;
use crate::lexer::tokens::{Token, TokenKind};
use crate::registry::registry::Registries;

use super::scope::{Binding, ScopeManager};
use super::stmt;

/// Owns the lexer and the two-token lookahead window.
pub struct TokenCursor {
    lexer: Lexer,
    pub cur: Token,
    pub peek: Token,
}

impl TokenCursor {
    pub fn new(mut lexer: Lexer) -> Result<Self, Error> {
        let cur = lexer.next_token()?;
        let peek = lexer.next_token()?;
        Ok(TokenCursor { lexer, cur, peek })
    }

    pub fn advance(&mut self) -> Result<(), Error> {
        self.cur = std::mem::replace(&mut self.peek, self.lexer.next_token()?);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ImportInfo {
    pub token: Token,
    pub used: bool,
}

pub struct Parser<'a> {
    pub(super) cursor: TokenCursor,
    pub(super) registries: &'a Registries,
    pub(super) identifiers: ScopeManager<StaticType>,
    pub(super) functions: ScopeManager<FunctionSignature>,
    pub(super) imports: HashMap<String, ImportInfo>,
    warnings: Vec<Warning>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &str, registries: &'a Registries) -> Result<Self, Error> {
        Ok(Parser {
            cursor: TokenCursor::new(Lexer::new(source))?,
            registries,
            identifiers: ScopeManager::new(),
            functions: ScopeManager::new(),
            imports: HashMap::new(),
            warnings: Vec::new(),
        })
    }

    pub fn parse_program(&mut self) -> Result<Program, Error> {
        let mut body = Vec::new();

        while self.cursor.cur.kind != TokenKind::EOF {
            if self.cursor.cur.kind == TokenKind::Newline {
                self.cursor.advance()?;
                continue;
            }

            body.push(stmt::parse_statement(self)?);

            self.cursor.advance()?;
            self.skip_semicolons()?;
        }

        self.flush_unused_warnings();

        Ok(Program { body })
    }

    /// Warnings accumulated during the parse; meaningful only after
    /// [`parse_program`](Self::parse_program) succeeded.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    pub(super) fn expect_peek(&mut self, kind: TokenKind) -> Result<(), Error> {
        self.skip_newlines()?;
        self.skip_semicolons()?;
        if self.cursor.peek.kind == kind {
            self.cursor.advance()
        } else {
            Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    got: self.cursor.peek.kind.to_string(),
                    expected: kind.to_string(),
                },
                &self.cursor.peek,
            ))
        }
    }

    pub(super) fn expect_cur(&mut self, kind: TokenKind, no_next: bool) -> Result<(), Error> {
        self.skip_newlines()?;
        self.skip_semicolons()?;
        if self.cursor.cur.kind == kind {
            if !no_next {
                self.cursor.advance()?;
            }
            Ok(())
        } else {
            Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    got: self.cursor.cur.kind.to_string(),
                    expected: kind.to_string(),
                },
                &self.cursor.cur,
            ))
        }
    }

    pub(super) fn skip_newlines(&mut self) -> Result<(), Error> {
        while self.cursor.cur.kind == TokenKind::Newline {
            self.cursor.advance()?;
        }
        Ok(())
    }

    pub(super) fn skip_semicolons(&mut self) -> Result<(), Error> {
        while self.cursor.cur.kind == TokenKind::Semicolon {
            self.cursor.advance()?;
        }
        Ok(())
    }

    pub(super) fn warn(&mut self, token: &Token, message: String, mark: Option<Mark>) {
        let mark = mark.unwrap_or_else(|| Mark::width(token.literal.chars().count().max(1)));
        self.warnings.push(Warning {
            message,
            line: token.line,
            column: token.column,
            mark,
        });
    }

    pub(super) fn define_identifier(&mut self, name: &str, ty: StaticType, declared_at: &Token) {
        self.identifiers.define(
            name,
            Binding {
                value: ty,
                referenced: false,
                declared_at: declared_at.clone(),
            },
        );
    }

    fn flush_unused_warnings(&mut self) {
        let mut warnings = Vec::new();

        for (name, binding) in self.identifiers.unused() {
            warnings.push((
                binding.declared_at.clone(),
                format!("Identifier {} is declared but never used", name),
                None,
            ));
        }

        for (name, binding) in self.functions.unused() {
            warnings.push((
                binding.declared_at.clone(),
                format!("Function {} is declared but never used", name),
                None,
            ));
        }

        for (name, info) in self.imports.iter().filter(|(_, info)| !info.used) {
            // Widen the underline over the angle brackets around the name.
            let mark = Mark {
                spaces: Some((info.token.column as usize).saturating_sub(2)),
                carets: crate::errors::errors::Carets::Width(name.chars().count() + 2),
            };
            warnings.push((
                info.token.clone(),
                format!("Module <{}> is imported but never used", name),
                Some(mark),
            ));
        }

        warnings.sort_by_key(|(token, _, _)| (token.line, token.column));

        for (token, message, mark) in warnings {
            self.warn(&token, message, mark);
        }
    }
}
