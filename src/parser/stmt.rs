//! Statement-level grammar rules.
//!
//! Each rule enters with the cursor on the statement's first token and
//! leaves it on the statement's last consumed token; the program loop
//! advances between statements.

use crate::ast::ast::{
    AssignmentStatement, BlockStatement, CheckStatement, DuringStatement, Expression,
    FunctionSignature, FunctionStatement, Identifier, ImportStatement, LetStatement,
    ReturnStatement, Statement, VoidLiteral,
};
use crate::ast::types::StaticType;
use crate::errors::errors::{Carets, Error, ErrorImpl, Mark};
use crate::lexer::tokens::TokenKind;

use super::expr;
use super::parser::{ImportInfo, Parser};
use super::scope::Binding;

pub(super) fn parse_statement(parser: &mut Parser) -> Result<Statement, Error> {
    match parser.cursor.cur.kind {
        TokenKind::Let => parse_let(parser),
        TokenKind::Check => parse_check(parser).map(Statement::Check),
        TokenKind::During => parse_during(parser),
        TokenKind::Import => parse_import(parser),
        TokenKind::Function => parse_function(parser),
        TokenKind::Return => parse_return(parser),
        TokenKind::Identifier if parser.cursor.peek.kind == TokenKind::Assignment => {
            parse_assignment(parser)
        }
        _ => expr::parse_expression(parser, 0, None).map(Statement::Expression),
    }
}

fn parse_let(parser: &mut Parser) -> Result<Statement, Error> {
    parser.expect_peek(TokenKind::Identifier)?;
    let name_token = parser.cursor.cur.clone();

    parser.expect_peek(TokenKind::Assignment)?;
    parser.cursor.advance()?;

    let value = expr::parse_expression(parser, 0, Some(&name_token))?;

    // Underline from the identifier to the end of the line.
    let statement_mark = || Mark::to_end_of_line((name_token.column as usize).saturating_sub(5));

    if value.ty() == StaticType::Void {
        return Err(Error::with_mark(
            ErrorImpl::VoidAssignment {
                name: name_token.literal.clone(),
            },
            value.token().line,
            value.token().column,
            statement_mark(),
        ));
    }

    parser.cursor.advance()?;

    if parser.identifiers.has_scope(&name_token.literal) {
        return Err(Error::with_mark(
            ErrorImpl::IdentifierRedeclared {
                name: name_token.literal.clone(),
            },
            name_token.line,
            0,
            statement_mark(),
        ));
    }

    parser.define_identifier(&name_token.literal, value.ty(), &name_token);

    Ok(Statement::Let(LetStatement {
        name: Identifier {
            value: name_token.literal.clone(),
            ty: value.ty(),
            token: name_token.clone(),
        },
        value,
        token: name_token,
    }))
}

fn parse_assignment(parser: &mut Parser) -> Result<Statement, Error> {
    let name_token = parser.cursor.cur.clone();

    let declared_ty = match parser.identifiers.resolve(&name_token.literal) {
        Some(binding) => binding.value,
        None => {
            return Err(Error::new(
                ErrorImpl::IdentifierNotDeclared {
                    name: name_token.literal.clone(),
                },
                &name_token,
            ));
        }
    };

    parser.expect_peek(TokenKind::Assignment)?;
    parser.cursor.advance()?;

    let value = expr::parse_expression(parser, 0, None)?;

    if declared_ty != value.ty() {
        return Err(Error::new(
            ErrorImpl::AssignmentTypeMismatch {
                name: name_token.literal.clone(),
                expected: declared_ty.to_string(),
                received: value.ty().to_string(),
            },
            &parser.cursor.cur,
        ));
    }

    parser.cursor.advance()?;

    // Read the flag after the value parsed: a use of the identifier on its
    // own right-hand side counts.
    let referenced = parser
        .identifiers
        .resolve(&name_token.literal)
        .map(|binding| binding.referenced)
        .unwrap_or(false);

    parser.identifiers.define(
        name_token.literal.clone(),
        Binding {
            value: value.ty(),
            referenced,
            declared_at: name_token.clone(),
        },
    );

    Ok(Statement::Assignment(AssignmentStatement {
        name: Identifier {
            value: name_token.literal.clone(),
            ty: value.ty(),
            token: name_token.clone(),
        },
        value,
        token: name_token,
    }))
}

fn parse_import(parser: &mut Parser) -> Result<Statement, Error> {
    parser.expect_peek(TokenKind::Less)?;
    let start = parser.cursor.cur.clone();
    parser.cursor.advance()?;
    let name_token = parser.cursor.cur.clone();
    let name = name_token.literal.clone();

    parser.expect_peek(TokenKind::Greater)?;

    if !parser.registries.is_module(&name) {
        // Underline the angle brackets as well.
        return Err(Error::with_mark(
            ErrorImpl::UnknownModule { name },
            start.line,
            start.column,
            Mark {
                spaces: None,
                carets: Carets::Width(name_token.literal.chars().count() + 2),
            },
        ));
    }
    parser.cursor.advance()?;

    parser.imports.insert(
        name.clone(),
        ImportInfo {
            token: name_token.clone(),
            used: false,
        },
    );

    Ok(Statement::Import(ImportStatement {
        module: name,
        token: name_token,
    }))
}

/// Parses a braced block, entering a fresh scope frame for both
/// namespaces. `params` pre-binds function parameters into the new frame.
pub(super) fn parse_block(
    parser: &mut Parser,
    params: Option<&[Identifier]>,
) -> Result<BlockStatement, Error> {
    let token = parser.cursor.cur.clone();

    parser.identifiers.enter_scope();
    parser.functions.enter_scope();

    parser.cursor.advance()?;
    parser.expect_cur(TokenKind::OpenCurly, false)?;

    if let Some(params) = params {
        for param in params {
            parser.define_identifier(&param.value, param.ty, &param.token);
        }
    }

    let mut body = Vec::new();
    while parser.cursor.cur.kind != TokenKind::CloseCurly
        && parser.cursor.cur.kind != TokenKind::EOF
    {
        parser.skip_newlines()?;
        if parser.cursor.cur.kind == TokenKind::CloseCurly {
            break;
        }

        body.push(parse_statement(parser)?);

        if parser.cursor.cur.kind != TokenKind::CloseCurly {
            parser.cursor.advance()?;
        }
        parser.skip_semicolons()?;
        parser.skip_newlines()?;
    }

    parser.expect_cur(TokenKind::CloseCurly, false)?;

    parser.identifiers.exit_scope();
    parser.functions.exit_scope();

    Ok(BlockStatement { body, token })
}

fn parse_condition(parser: &mut Parser, statement: &str) -> Result<Expression, Error> {
    parser.cursor.advance()?;
    parser.skip_newlines()?;

    if parser.cursor.cur.kind == TokenKind::OpenParen {
        return Err(Error::new(
            ErrorImpl::MissingCondition {
                got: parser.cursor.cur.kind.to_string(),
                statement: statement.to_string(),
            },
            &parser.cursor.cur,
        ));
    }

    let condition = expr::parse_expression(parser, 0, None)?;

    if condition.ty() != StaticType::Boolean {
        return Err(Error::new(
            ErrorImpl::ConditionType {
                got: condition.ty().to_string(),
            },
            condition.token(),
        ));
    }

    Ok(condition)
}

fn parse_check(parser: &mut Parser) -> Result<CheckStatement, Error> {
    let token = parser.cursor.cur.clone();
    let condition = parse_condition(parser, "check")?;
    let body = parse_block(parser, None)?;

    let mut fail = None;
    let mut fail_check = None;

    parser.skip_newlines()?;
    if parser.cursor.cur.kind == TokenKind::Fail {
        if parser.cursor.peek.kind == TokenKind::Check {
            parser.cursor.advance()?;
            fail_check = Some(Box::new(parse_check(parser)?));
        } else {
            fail = Some(parse_block(parser, None)?);
        }
    }

    Ok(CheckStatement {
        condition,
        body,
        fail,
        fail_check,
        token,
    })
}

fn parse_during(parser: &mut Parser) -> Result<Statement, Error> {
    let token = parser.cursor.cur.clone();
    let condition = parse_condition(parser, "during")?;
    let body = parse_block(parser, None)?;

    let mut fail = None;
    parser.skip_newlines()?;
    if parser.cursor.cur.kind == TokenKind::Fail {
        fail = Some(parse_block(parser, None)?);
    }

    Ok(Statement::During(DuringStatement {
        condition,
        body,
        fail,
        token,
    }))
}

fn parse_return(parser: &mut Parser) -> Result<Statement, Error> {
    let token = parser.cursor.cur.clone();
    parser.cursor.advance()?;

    if parser.cursor.cur.kind == TokenKind::Newline
        || parser.cursor.cur.kind == TokenKind::Semicolon
    {
        return Ok(Statement::Return(ReturnStatement {
            value: Expression::Void(VoidLiteral {
                token: token.clone(),
            }),
            token,
        }));
    }

    let value = expr::parse_expression(parser, 0, None)?;
    parser.cursor.advance()?;

    Ok(Statement::Return(ReturnStatement { value, token }))
}

fn parse_function_param(parser: &mut Parser) -> Result<Identifier, Error> {
    let ty = match StaticType::from_name(&parser.cursor.cur.literal) {
        Some(ty) => ty,
        None => {
            return Err(Error::new(
                ErrorImpl::ExpectedParameterType {
                    got: parser.cursor.cur.kind.to_string(),
                },
                &parser.cursor.cur,
            ));
        }
    };
    parser.cursor.advance()?;

    parser.expect_cur(TokenKind::Identifier, true)?;

    Ok(Identifier {
        value: parser.cursor.cur.literal.clone(),
        ty,
        token: parser.cursor.cur.clone(),
    })
}

fn parse_function_params(parser: &mut Parser) -> Result<Vec<Identifier>, Error> {
    parser.expect_peek(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    if parser.cursor.peek.kind != TokenKind::CloseParen {
        parser.cursor.advance()?;
        params.push(parse_function_param(parser)?);

        while parser.cursor.peek.kind == TokenKind::Comma {
            parser.cursor.advance()?;
            parser.cursor.advance()?;
            params.push(parse_function_param(parser)?);
        }
    }

    parser.expect_peek(TokenKind::CloseParen)?;

    Ok(params)
}

fn parse_function(parser: &mut Parser) -> Result<Statement, Error> {
    parser.expect_peek(TokenKind::Identifier)?;
    let name_token = parser.cursor.cur.clone();
    let name = name_token.literal.clone();

    let params = parse_function_params(parser)?;

    // Underline from the function name to the end of the line.
    let statement_mark = || Mark::to_end_of_line((name_token.column as usize).saturating_sub(10));

    if let Some(def) = parser.registries.functions.get(&name) {
        if parser.imports.contains_key(&def.module) {
            return Err(Error::with_mark(
                ErrorImpl::BuiltinRedefined { name },
                name_token.line,
                name_token.column,
                statement_mark(),
            ));
        }
    }

    if parser.functions.has_scope(&name) || parser.identifiers.has_scope(&name) {
        return Err(Error::with_mark(
            ErrorImpl::FunctionRedeclared { name },
            name_token.line,
            name_token.column,
            statement_mark(),
        ));
    }

    if parser.cursor.peek.kind != TokenKind::Dash {
        return Err(Error::new(
            ErrorImpl::ExpectedArrow {
                got: parser.cursor.peek.kind.to_string(),
            },
            &parser.cursor.peek,
        ));
    }
    parser.cursor.advance()?;
    if parser.cursor.peek.kind != TokenKind::Greater {
        return Err(Error::new(
            ErrorImpl::ExpectedArrow {
                got: parser.cursor.peek.kind.to_string(),
            },
            &parser.cursor.peek,
        ));
    }
    parser.cursor.advance()?;
    parser.cursor.advance()?;

    let return_type = match StaticType::from_name(&parser.cursor.cur.literal) {
        Some(ty) => ty,
        None => {
            return Err(Error::new(
                ErrorImpl::ExpectedReturnType {
                    got: parser.cursor.cur.kind.to_string(),
                },
                &parser.cursor.cur,
            ));
        }
    };

    // Registered before the body parses so the body can call itself.
    parser.functions.define(
        name.clone(),
        Binding {
            value: FunctionSignature {
                name: name.clone(),
                params: params.clone(),
                return_type,
            },
            referenced: false,
            declared_at: name_token.clone(),
        },
    );

    let body = parse_block(parser, Some(&params))?;

    if let Some(bad) = find_return_mismatch(&body, return_type) {
        return Err(Error::with_mark(
            ErrorImpl::ReturnTypeMismatch {
                got: bad.value.ty().to_string(),
                expected: return_type.to_string(),
            },
            bad.value.token().line,
            bad.value.token().column,
            Mark::to_end_of_line((bad.token.column as usize).saturating_sub(1)),
        ));
    }

    Ok(Statement::Function(FunctionStatement {
        name: Identifier {
            value: name,
            ty: return_type,
            token: name_token.clone(),
        },
        params,
        return_type,
        body,
        token: name_token,
    }))
}

/// Finds a `return` whose value type disagrees with the declared return
/// type, descending through conditionals and loops but not into nested
/// function declarations.
fn find_return_mismatch(block: &BlockStatement, expected: StaticType) -> Option<&ReturnStatement> {
    fn check_block(block: &BlockStatement, expected: StaticType) -> Option<&ReturnStatement> {
        for statement in &block.body {
            let found = match statement {
                Statement::Return(ret) if ret.value.ty() != expected => Some(ret),
                Statement::Check(check) => check_check(check, expected),
                Statement::During(during) => check_block(&during.body, expected)
                    .or_else(|| during.fail.as_ref().and_then(|b| check_block(b, expected))),
                _ => None,
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    fn check_check(check: &CheckStatement, expected: StaticType) -> Option<&ReturnStatement> {
        check_block(&check.body, expected)
            .or_else(|| check.fail.as_ref().and_then(|b| check_block(b, expected)))
            .or_else(|| {
                check
                    .fail_check
                    .as_ref()
                    .and_then(|c| check_check(c, expected))
            })
    }

    check_block(block, expected)
}
