use thiserror::Error as ThisError;

use crate::lexer::tokens::Token;

/// Caret rendering instructions attached to a diagnostic.
///
/// `spaces` overrides the leading offset (defaults to the token column);
/// `carets` is either a fixed width or a sentinel meaning "underline to the
/// end of the source line".
#[derive(Debug, Clone)]
pub struct Mark {
    pub spaces: Option<usize>,
    pub carets: Carets,
}

#[derive(Debug, Clone, Copy)]
pub enum Carets {
    Width(usize),
    ToEndOfLine,
}

impl Mark {
    pub fn width(width: usize) -> Self {
        Mark {
            spaces: None,
            carets: Carets::Width(width),
        }
    }

    pub fn to_end_of_line(spaces: usize) -> Self {
        Mark {
            spaces: Some(spaces),
            carets: Carets::ToEndOfLine,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    line: u32,
    column: u32,
    mark: Mark,
}

impl Error {
    /// Creates an error pointing at `token`, underlining its literal.
    pub fn new(internal_error: ErrorImpl, token: &Token) -> Self {
        let width = token.literal.chars().count().max(1);
        Error {
            internal_error,
            line: token.line,
            column: token.column,
            mark: Mark::width(width),
        }
    }

    /// Creates an error with explicit position and caret instructions.
    pub fn with_mark(internal_error: ErrorImpl, line: u32, column: u32, mark: Mark) -> Self {
        Error {
            internal_error,
            line,
            column,
            mark,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::IllegalToken | ErrorImpl::UnterminatedString => "LexError",
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedValueType { .. }
            | ErrorImpl::UnexpectedExpressionToken { .. }
            | ErrorImpl::MissingCondition { .. }
            | ErrorImpl::ExpectedArrow { .. }
            | ErrorImpl::ExpectedReturnType { .. }
            | ErrorImpl::ExpectedParameterType { .. }
            | ErrorImpl::ExpectedProperty { .. }
            | ErrorImpl::NumberParse { .. } => "SyntaxError",
            _ => "SemanticError",
        }
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn mark(&self) -> &Mark {
        &self.mark
    }
}

/// A non-fatal finding, accumulated during parsing and flushed after a
/// successful pass.
#[derive(Debug, Clone)]
pub struct Warning {
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub mark: Mark,
}

#[derive(ThisError, Debug, Clone)]
pub enum ErrorImpl {
    #[error("Unexpected illegal token")]
    IllegalToken,
    #[error("Unterminated string literal")]
    UnterminatedString,

    #[error("Unexpected token {got} expected {expected}")]
    UnexpectedToken { got: String, expected: String },
    #[error("Unexpected value type {got} for identifier {identifier}")]
    UnexpectedValueType { got: String, identifier: String },
    #[error("Unexpected token {got} in expression")]
    UnexpectedExpressionToken { got: String },
    #[error("Unexpected token {got} in {statement} statement, expected condition expression")]
    MissingCondition { got: String, statement: String },
    #[error("Expected -> after function arguments, got {got}")]
    ExpectedArrow { got: String },
    #[error("Expected return type after -> got {got}")]
    ExpectedReturnType { got: String },
    #[error("Expected primitive type after ( got {got}")]
    ExpectedParameterType { got: String },
    #[error("Expected identifier after . got {got}")]
    ExpectedProperty { got: String },
    #[error("Invalid number {literal}, is it above the integer limit?")]
    NumberParse { literal: String },

    #[error("Identifier {name} is not defined")]
    IdentifierNotDefined { name: String },
    #[error("Identifier {name} is not declared")]
    IdentifierNotDeclared { name: String },
    #[error("Identifier {name} has already been declared")]
    IdentifierRedeclared { name: String },
    #[error("Function {name} has already been declared")]
    FunctionRedeclared { name: String },
    #[error("Function {name} is a built-in function and cannot be redefined")]
    BuiltinRedefined { name: String },
    #[error("Cannot assign void literal to identifier {name}")]
    VoidAssignment { name: String },
    #[error("Cannot assign value of type {received} to identifier {name} of type {expected}")]
    AssignmentTypeMismatch {
        name: String,
        expected: String,
        received: String,
    },
    #[error("Cannot use ! operator on {operand}")]
    PrefixOperandType { operand: String },
    #[error("Cannot operate on void literals")]
    VoidOperand,
    #[error("Cannot use logical operator {operator} on non-boolean type {operand}")]
    LogicalOperandType { operator: String, operand: String },
    #[error("Cannot compare {left} and {right}")]
    CompareTypeMismatch { left: String, right: String },
    #[error("Cannot use comparison operator {operator} on non-integer types")]
    RelationalOperandType { operator: String },
    #[error("Cannot operate on {left} and {right}{hint}")]
    InfixTypeMismatch {
        left: String,
        right: String,
        hint: String,
    },
    #[error("Cannot use operator {operator} on string literals, only + is allowed")]
    StringOperator { operator: String },
    #[error("Expected condition expression to be of type boolean, got {got}")]
    ConditionType { got: String },
    #[error("Return type {got} does not match function return type {expected}")]
    ReturnTypeMismatch { got: String, expected: String },
    #[error("{name} is not a function")]
    NotAFunction { name: String },
    #[error("{name} is not a function, did you forget to import <{module}>?")]
    MissingImport { name: String, module: String },
    #[error("Unknown module <{name}>")]
    UnknownModule { name: String },
    #[error("{name} expects at least {expected} argument(s), got {received}")]
    MissingArguments {
        name: String,
        expected: usize,
        received: usize,
    },
    #[error("{name} expects at most {expected} argument(s), got {received}")]
    UnexpectedArguments {
        name: String,
        expected: usize,
        received: usize,
    },
    #[error("Argument {argument} of {name} must be {expected}, got {received}")]
    ArgumentTypeMismatch {
        argument: String,
        name: String,
        expected: String,
        received: String,
    },
    #[error("{ty} has no method called {name}{hint}")]
    UnknownMethod {
        ty: String,
        name: String,
        hint: String,
    },
    #[error("{ty} has no property called {name}{hint}")]
    UnknownProperty {
        ty: String,
        name: String,
        hint: String,
    },
}
