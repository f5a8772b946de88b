//! The typed syntax tree produced by the parser.
//!
//! Statements and expressions are closed enums so every consumer matches
//! exhaustively. Every expression carries a resolved static type by the
//! time its parent receives it.

use crate::lexer::tokens::Token;

use super::types::StaticType;

#[derive(Debug, Clone)]
pub struct Program {
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct Identifier {
    pub value: String,
    pub ty: StaticType,
    pub token: Token,
}

/// A braced statement list. Blocks never stand alone, they are always the
/// body of a conditional, loop or function.
#[derive(Debug, Clone)]
pub struct BlockStatement {
    pub body: Vec<Statement>,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub enum Statement {
    Let(LetStatement),
    Assignment(AssignmentStatement),
    Expression(Expression),
    Import(ImportStatement),
    Check(CheckStatement),
    During(DuringStatement),
    Function(FunctionStatement),
    Return(ReturnStatement),
}

#[derive(Debug, Clone)]
pub struct LetStatement {
    pub name: Identifier,
    pub value: Expression,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct AssignmentStatement {
    pub name: Identifier,
    pub value: Expression,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct ImportStatement {
    pub module: String,
    pub token: Token,
}

/// `check cond { .. }` with either a plain `fail` block or a chained
/// `fail check`, never both.
#[derive(Debug, Clone)]
pub struct CheckStatement {
    pub condition: Expression,
    pub body: BlockStatement,
    pub fail: Option<BlockStatement>,
    pub fail_check: Option<Box<CheckStatement>>,
    pub token: Token,
}

/// `during cond { .. }` with an optional `fail` block that runs only when
/// the loop body never executed.
#[derive(Debug, Clone)]
pub struct DuringStatement {
    pub condition: Expression,
    pub body: BlockStatement,
    pub fail: Option<BlockStatement>,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct FunctionStatement {
    pub name: Identifier,
    pub params: Vec<Identifier>,
    pub return_type: StaticType,
    pub body: BlockStatement,
    pub token: Token,
}

/// What the scope manager remembers about a user function; registered
/// before the body is parsed so the body can recurse.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<Identifier>,
    pub return_type: StaticType,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub value: Expression,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub enum Expression {
    Integer(IntegerLiteral),
    Str(StringLiteral),
    Boolean(BooleanLiteral),
    Void(VoidLiteral),
    Identifier(Identifier),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    Call(CallExpression),
    Property(PropertyExpression),
    MethodCall(MethodCallExpression),
}

#[derive(Debug, Clone)]
pub struct IntegerLiteral {
    pub value: i64,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub value: String,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct BooleanLiteral {
    pub value: bool,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct VoidLiteral {
    pub token: Token,
}

/// `!operand`; always boolean-typed, a string operand lowers to an
/// emptiness test.
#[derive(Debug, Clone)]
pub struct PrefixExpression {
    pub operand: Box<Expression>,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub operator: String,
    pub ty: StaticType,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct CallExpression {
    pub name: String,
    pub args: Vec<Expression>,
    pub ty: StaticType,
    /// True when the callee is a user-declared function rather than a
    /// runtime built-in.
    pub is_local: bool,
    /// Owning module of a built-in callee, empty for local calls.
    pub module: String,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct PropertyExpression {
    pub object: Box<Expression>,
    pub property: String,
    pub ty: StaticType,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct MethodCallExpression {
    pub object: Box<Expression>,
    pub method: String,
    pub args: Vec<Expression>,
    pub ty: StaticType,
    pub token: Token,
}

impl Expression {
    /// The resolved static type of the expression.
    pub fn ty(&self) -> StaticType {
        match self {
            Expression::Integer(_) => StaticType::Integer,
            Expression::Str(_) => StaticType::String,
            Expression::Boolean(_) => StaticType::Boolean,
            Expression::Void(_) => StaticType::Void,
            Expression::Identifier(identifier) => identifier.ty,
            Expression::Prefix(_) => StaticType::Boolean,
            Expression::Infix(infix) => infix.ty,
            Expression::Call(call) => call.ty,
            Expression::Property(property) => property.ty,
            Expression::MethodCall(method) => method.ty,
        }
    }

    /// The token the expression is anchored at, for diagnostics.
    pub fn token(&self) -> &Token {
        match self {
            Expression::Integer(integer) => &integer.token,
            Expression::Str(string) => &string.token,
            Expression::Boolean(boolean) => &boolean.token,
            Expression::Void(void) => &void.token,
            Expression::Identifier(identifier) => &identifier.token,
            Expression::Prefix(prefix) => &prefix.token,
            Expression::Infix(infix) => &infix.token,
            Expression::Call(call) => &call.token,
            Expression::Property(property) => &property.token,
            Expression::MethodCall(method) => &method.token,
        }
    }
}
