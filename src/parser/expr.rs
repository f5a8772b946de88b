//! Expression grammar: precedence climbing with type checking fused into
//! every fold.

use crate::ast::ast::{
    BooleanLiteral, CallExpression, Expression, Identifier, InfixExpression, IntegerLiteral,
    MethodCallExpression, PrefixExpression, PropertyExpression, StringLiteral,
};
use crate::ast::types::StaticType;
use crate::errors::errors::{Error, ErrorImpl};
use crate::lexer::tokens::{Token, TokenKind};
use crate::registry::registry::Param;
use crate::registry::validate::validate_call;

use super::parser::Parser;

fn get_precedence(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Or => 1,
        TokenKind::And => 2,
        TokenKind::Equals | TokenKind::NotEquals => 3,
        TokenKind::Less
        | TokenKind::Greater
        | TokenKind::LessEquals
        | TokenKind::GreaterEquals => 4,
        TokenKind::Plus | TokenKind::Dash => 5,
        TokenKind::Star | TokenKind::Slash => 6,
        TokenKind::Not => 7,
        _ => 0,
    }
}

/// Parses an expression at the given minimum precedence. `target` names
/// the identifier a `let` is assigning into, for better diagnostics when
/// the value is not an expression at all.
pub(super) fn parse_expression(
    parser: &mut Parser,
    precedence: u8,
    target: Option<&Token>,
) -> Result<Expression, Error> {
    if parser.cursor.cur.kind == TokenKind::Not {
        let token = parser.cursor.cur.clone();
        parser.cursor.advance()?;
        let operand = parse_expression(parser, get_precedence(TokenKind::Not), None)?;

        match operand.ty() {
            StaticType::Boolean | StaticType::String | StaticType::Integer => {}
            other => {
                return Err(Error::new(
                    ErrorImpl::PrefixOperandType {
                        operand: other.to_string(),
                    },
                    &token,
                ));
            }
        }

        return Ok(Expression::Prefix(PrefixExpression {
            operand: Box::new(operand),
            token,
        }));
    }

    let mut left = if parser.cursor.cur.kind == TokenKind::Identifier
        && parser.cursor.peek.kind == TokenKind::OpenParen
    {
        let callee = parser.cursor.cur.clone();
        parse_call(parser, callee)?
    } else {
        parse_literal(parser, target)?
    };

    if let Expression::Identifier(identifier) = &left {
        if let Some(binding) = parser.identifiers.resolve_mut(&identifier.value) {
            binding.referenced = true;
        }
    }

    left = parse_members(parser, left)?;

    while parser.cursor.peek.kind != TokenKind::EOF
        && parser.cursor.peek.kind != TokenKind::Newline
        && precedence < get_precedence(parser.cursor.peek.kind)
    {
        if parser.cursor.peek.kind == TokenKind::CloseParen {
            break;
        }

        let operator_token = parser.cursor.peek.clone();
        let operator = operator_token.literal.clone();
        let op_precedence = get_precedence(operator_token.kind);

        parser.cursor.advance()?;
        parser.cursor.advance()?;

        let right = parse_expression(parser, op_precedence, None)?;

        let left_ty = left.ty();
        let right_ty = right.ty();

        if left_ty == StaticType::Void || right_ty == StaticType::Void {
            return Err(Error::new(ErrorImpl::VoidOperand, &operator_token));
        }

        let kind = operator_token.kind;
        let is_logical = kind == TokenKind::And || kind == TokenKind::Or;
        let is_equality = kind == TokenKind::Equals || kind == TokenKind::NotEquals;
        let is_relational = matches!(
            kind,
            TokenKind::Less | TokenKind::Greater | TokenKind::LessEquals | TokenKind::GreaterEquals
        );

        // Only the left operand is checked for logical operators; a
        // non-boolean right operand surfaces through the shared-type rule.
        if is_logical && left_ty != StaticType::Boolean {
            return Err(Error::new(
                ErrorImpl::LogicalOperandType {
                    operator,
                    operand: left_ty.to_string(),
                },
                &operator_token,
            ));
        }

        let ty = if is_equality {
            if left_ty != right_ty {
                return Err(Error::new(
                    ErrorImpl::CompareTypeMismatch {
                        left: left_ty.to_string(),
                        right: right_ty.to_string(),
                    },
                    &operator_token,
                ));
            }
            StaticType::Boolean
        } else if is_relational {
            if left_ty != StaticType::Integer || right_ty != StaticType::Integer {
                return Err(Error::new(
                    ErrorImpl::RelationalOperandType { operator },
                    &operator_token,
                ));
            }
            StaticType::Boolean
        } else {
            if left_ty != right_ty {
                let hint = if left_ty == StaticType::String || right_ty == StaticType::String {
                    ", consider using to_string()"
                } else {
                    ""
                };
                return Err(Error::new(
                    ErrorImpl::InfixTypeMismatch {
                        left: left_ty.to_string(),
                        right: right_ty.to_string(),
                        hint: hint.to_string(),
                    },
                    &operator_token,
                ));
            }
            if left_ty == StaticType::String && kind != TokenKind::Plus {
                return Err(Error::new(
                    ErrorImpl::StringOperator { operator },
                    &operator_token,
                ));
            }
            left_ty
        };

        left = Expression::Infix(InfixExpression {
            left: Box::new(left),
            right: Box::new(right),
            operator: operator_token.literal.clone(),
            ty,
            token: operator_token,
        });
    }

    Ok(left)
}

fn parse_literal(parser: &mut Parser, target: Option<&Token>) -> Result<Expression, Error> {
    let token = parser.cursor.cur.clone();
    match token.kind {
        TokenKind::Int => {
            let value: i64 = token.literal.parse().map_err(|_| {
                Error::new(
                    ErrorImpl::NumberParse {
                        literal: token.literal.clone(),
                    },
                    &token,
                )
            })?;
            Ok(Expression::Integer(IntegerLiteral { value, token }))
        }
        TokenKind::String => Ok(Expression::Str(StringLiteral {
            value: token.literal.clone(),
            token,
        })),
        TokenKind::True => Ok(Expression::Boolean(BooleanLiteral { value: true, token })),
        TokenKind::False => Ok(Expression::Boolean(BooleanLiteral {
            value: false,
            token,
        })),
        TokenKind::Identifier => {
            let ty = match parser.identifiers.resolve(&token.literal) {
                Some(binding) => binding.value,
                None => {
                    return Err(Error::new(
                        ErrorImpl::IdentifierNotDefined {
                            name: token.literal.clone(),
                        },
                        &token,
                    ));
                }
            };
            Ok(Expression::Identifier(Identifier {
                value: token.literal.clone(),
                ty,
                token,
            }))
        }
        _ => match target {
            Some(target) => Err(Error::new(
                ErrorImpl::UnexpectedValueType {
                    got: token.kind.to_string(),
                    identifier: target.literal.clone(),
                },
                &token,
            )),
            None => Err(Error::new(
                ErrorImpl::UnexpectedExpressionToken {
                    got: token.kind.to_string(),
                },
                &token,
            )),
        },
    }
}

fn parse_call_args(parser: &mut Parser) -> Result<Vec<Expression>, Error> {
    parser.expect_peek(TokenKind::OpenParen)?;

    let mut args = Vec::new();
    if parser.cursor.peek.kind != TokenKind::CloseParen {
        parser.cursor.advance()?;
        args.push(parse_expression(parser, 0, None)?);

        while parser.cursor.peek.kind == TokenKind::Comma {
            parser.cursor.advance()?;
            parser.cursor.advance()?;
            args.push(parse_expression(parser, 0, None)?);
        }
    }

    parser.expect_peek(TokenKind::CloseParen)?;

    Ok(args)
}

/// Resolves and validates a call. User functions win over built-ins;
/// built-ins additionally require their module to be imported and mark
/// that import as used.
fn parse_call(parser: &mut Parser, callee: Token) -> Result<Expression, Error> {
    let registries = parser.registries;
    let args = parse_call_args(parser)?;

    let user_fn = parser
        .functions
        .resolve_mut(&callee.literal)
        .map(|binding| {
            binding.referenced = true;
            binding.value.clone()
        });

    if let Some(signature) = user_fn {
        let params: Vec<Param> = signature
            .params
            .iter()
            .map(|param| Param {
                types: vec![param.ty],
                optional: false,
                variadic: false,
                name: Some(param.value.clone()),
            })
            .collect();
        validate_call(&signature.name, &args, &params, &parser.cursor.cur)?;

        let call = Expression::Call(CallExpression {
            name: callee.literal.clone(),
            args,
            ty: signature.return_type,
            is_local: true,
            module: String::new(),
            token: callee,
        });
        return parse_members(parser, call);
    }

    let def = match registries.functions.get(&callee.literal) {
        Some(def) => def,
        None => {
            return Err(Error::new(
                ErrorImpl::NotAFunction {
                    name: callee.literal.clone(),
                },
                &callee,
            ));
        }
    };

    if !parser.imports.contains_key(&def.module) {
        return Err(Error::new(
            ErrorImpl::MissingImport {
                name: def.name.clone(),
                module: def.module.clone(),
            },
            &callee,
        ));
    }

    validate_call(&def.name, &args, &def.params, &parser.cursor.cur)?;

    if let Some(import) = parser.imports.get_mut(&def.module) {
        import.used = true;
    }

    let call = Expression::Call(CallExpression {
        name: callee.literal.clone(),
        args,
        ty: def.return_type,
        is_local: false,
        module: def.module.clone(),
        token: callee,
    });
    parse_members(parser, call)
}

/// Folds `.member` and `.member(..)` chains onto `left`, resolving each
/// against the method or property registry for the object's type.
fn parse_members(parser: &mut Parser, mut left: Expression) -> Result<Expression, Error> {
    let registries = parser.registries;

    while parser.cursor.peek.kind == TokenKind::Dot {
        parser.cursor.advance()?;

        let property_token = parser.cursor.peek.clone();
        if property_token.kind != TokenKind::Identifier {
            return Err(Error::new(
                ErrorImpl::ExpectedProperty {
                    got: property_token.kind.to_string(),
                },
                &property_token,
            ));
        }
        parser.cursor.advance()?;

        let object_ty = left.ty();
        let name = parser.cursor.cur.literal.clone();
        let is_call = parser.cursor.peek.kind == TokenKind::OpenParen;

        if is_call {
            let args = parse_call_args(parser)?;

            let method = match registries.methods.get(object_ty, &name) {
                Some(method) => method,
                None => {
                    let hint = if registries.properties.has(object_ty, &name) {
                        ", did you mean to use it as a property?"
                    } else {
                        ""
                    };
                    return Err(Error::new(
                        ErrorImpl::UnknownMethod {
                            ty: object_ty.to_string(),
                            name,
                            hint: hint.to_string(),
                        },
                        &property_token,
                    ));
                }
            };

            validate_call(&name, &args, &method.params, &property_token)?;

            left = Expression::MethodCall(MethodCallExpression {
                object: Box::new(left),
                method: name,
                args,
                ty: method.return_type,
                token: property_token,
            });
        } else {
            let property = match registries.properties.get(object_ty, &name) {
                Some(property) => property,
                None => {
                    let hint = if registries.methods.has(object_ty, &name) {
                        ", did you mean to use it as a method?"
                    } else {
                        ""
                    };
                    return Err(Error::new(
                        ErrorImpl::UnknownProperty {
                            ty: object_ty.to_string(),
                            name,
                            hint: hint.to_string(),
                        },
                        &property_token,
                    ));
                }
            };

            left = Expression::Property(PropertyExpression {
                object: Box::new(left),
                property: name,
                ty: property.return_type,
                token: property_token,
            });
        }
    }

    Ok(left)
}
