//! Unit tests for the parser module.
//!
//! This module contains tests for:
//! - Statement and expression parsing
//! - Fused type checking and its diagnostics
//! - Scope management, shadowing and unused tracking
//! - Call resolution against user functions and built-ins

use crate::ast::ast::{Expression, Program, Statement};
use crate::ast::types::StaticType;
use crate::errors::errors::Error;
use crate::lexer::tokens::Token;
use crate::registry::registry::{FunctionDef, MethodDef, Param, Registries};

use super::parser::Parser;
use super::scope::{Binding, ScopeManager};

fn parse(source: &str) -> Result<(Program, usize), Error> {
    let registries = Registries::standard();
    let mut parser = Parser::new(source, &registries)?;
    let program = parser.parse_program()?;
    Ok((program, parser.warnings().len()))
}

fn parse_err(source: &str) -> Error {
    let registries = Registries::standard();
    let mut parser = Parser::new(source, &registries).expect("lexing the first tokens failed");
    parser.parse_program().unwrap_err()
}

/// Registries with a `test` module mirroring the shapes the standard
/// modules use.
fn test_registries() -> Registries {
    let mut registries = Registries::new();
    registries.register_module("test");
    registries.functions.register(FunctionDef {
        name: "foo".into(),
        return_type: StaticType::Integer,
        params: vec![],
        module: "test".into(),
    });
    registries.functions.register(FunctionDef {
        name: "add".into(),
        return_type: StaticType::Integer,
        params: vec![
            Param::required(&[StaticType::Integer]),
            Param::required(&[StaticType::Integer]),
        ],
        module: "test".into(),
    });
    registries.functions.register(FunctionDef {
        name: "double".into(),
        return_type: StaticType::Integer,
        params: vec![Param::required(&[StaticType::Integer])],
        module: "test".into(),
    });
    registries.functions.register(FunctionDef {
        name: "process".into(),
        return_type: StaticType::Integer,
        params: vec![Param::required(&[StaticType::String])],
        module: "test".into(),
    });
    registries.methods.register(
        StaticType::String,
        MethodDef {
            name: "shout".into(),
            return_type: StaticType::String,
            params: vec![Param::required(&[StaticType::Integer])],
        },
    );
    registries
}

fn parse_with(source: &str, registries: &Registries) -> Result<Program, Error> {
    Parser::new(source, registries)?.parse_program()
}

#[test]
fn test_parse_let_with_int() {
    let (program, _) = parse("let x = 42").unwrap();

    assert_eq!(program.body.len(), 1);
    let Statement::Let(stmt) = &program.body[0] else {
        panic!("expected let statement");
    };
    assert_eq!(stmt.name.value, "x");
    assert_eq!(stmt.name.ty, StaticType::Integer);
    let Expression::Integer(value) = &stmt.value else {
        panic!("expected integer literal");
    };
    assert_eq!(value.value, 42);
}

#[test]
fn test_parse_let_with_string() {
    let (program, _) = parse("let s = \"hello\"").unwrap();

    let Statement::Let(stmt) = &program.body[0] else {
        panic!("expected let statement");
    };
    let Expression::Str(value) = &stmt.value else {
        panic!("expected string literal");
    };
    assert_eq!(value.value, "hello");
    assert_eq!(stmt.value.ty(), StaticType::String);
}

#[test]
fn test_parse_let_with_booleans() {
    let (program, _) = parse("let t = true\nlet f = false").unwrap();

    let Statement::Let(stmt) = &program.body[0] else {
        panic!("expected let statement");
    };
    let Expression::Boolean(value) = &stmt.value else {
        panic!("expected boolean literal");
    };
    assert!(value.value);

    let Statement::Let(stmt) = &program.body[1] else {
        panic!("expected let statement");
    };
    let Expression::Boolean(value) = &stmt.value else {
        panic!("expected boolean literal");
    };
    assert!(!value.value);
}

#[test]
fn test_parse_multiple_lets() {
    let (program, _) = parse("let a = 1\nlet b = \"str\"\nlet c = false").unwrap();

    assert_eq!(program.body.len(), 3);
}

#[test]
fn test_duplicate_declaration() {
    let error = parse_err("let x = 1\nlet x = 2");

    assert_eq!(error.message(), "Identifier x has already been declared");
    assert_eq!(error.line(), 1);
    assert_eq!(error.column(), 0);
}

#[test]
fn test_shadowing_in_inner_scope_is_legal() {
    let source = "let x = 1\ncheck x == 1 {\nlet x = 2\nx = 3\n}";
    let (program, warnings) = parse(source).unwrap();

    assert_eq!(program.body.len(), 2);
    // The inner x is never read, the outer one is.
    assert_eq!(warnings, 1);
}

#[test]
fn test_unexpected_token_in_let() {
    let error = parse_err("let = 5");

    assert_eq!(error.message(), "Unexpected token = expected identifier");
}

#[test]
fn test_undefined_identifier() {
    let error = parse_err("let x = unknown");

    assert_eq!(error.message(), "Identifier unknown is not defined");
}

#[test]
fn test_integer_overflow() {
    let error = parse_err("let x = 99999999999999999999");

    assert_eq!(
        error.message(),
        "Invalid number 99999999999999999999, is it above the integer limit?"
    );
}

#[test]
fn test_infix_precedence() {
    let (program, _) = parse("let result = 1 + 2 * 3 - 4 / 2").unwrap();

    let Statement::Let(stmt) = &program.body[0] else {
        panic!("expected let statement");
    };
    let Expression::Infix(top) = &stmt.value else {
        panic!("expected infix expression");
    };
    assert_eq!(top.operator, "-");
    let Expression::Infix(left) = top.left.as_ref() else {
        panic!("expected infix left operand");
    };
    assert_eq!(left.operator, "+");
    let Expression::Infix(right) = top.right.as_ref() else {
        panic!("expected infix right operand");
    };
    assert_eq!(right.operator, "/");
}

#[test]
fn test_string_concatenation_left_associative() {
    let (program, _) = parse("let greeting = \"Hello, \" + \"world!\" + \" Again??\"").unwrap();

    let Statement::Let(stmt) = &program.body[0] else {
        panic!("expected let statement");
    };
    let Expression::Infix(top) = &stmt.value else {
        panic!("expected infix expression");
    };
    assert_eq!(top.operator, "+");
    assert!(matches!(top.left.as_ref(), Expression::Infix(_)));
    assert!(matches!(top.right.as_ref(), Expression::Str(_)));
    assert_eq!(top.ty, StaticType::String);
}

#[test]
fn test_string_plus_integer_suggests_conversion() {
    let error = parse_err("let result = \"Hello\" + 42");

    assert_eq!(
        error.message(),
        "Cannot operate on string and integer, consider using to_string()"
    );
}

#[test]
fn test_string_supports_only_plus() {
    let error = parse_err("let x = \"a\" - \"b\"");

    assert_eq!(
        error.message(),
        "Cannot use operator - on string literals, only + is allowed"
    );
}

#[test]
fn test_equality_requires_identical_types() {
    let error = parse_err("let x = 1 == \"a\"");

    assert_eq!(error.message(), "Cannot compare integer and string");
}

#[test]
fn test_relational_requires_integers() {
    let error = parse_err("let x = true < false");

    assert_eq!(
        error.message(),
        "Cannot use comparison operator < on non-integer types"
    );
}

#[test]
fn test_logical_checks_left_operand() {
    let error = parse_err("let x = 1 && true");

    assert_eq!(
        error.message(),
        "Cannot use logical operator && on non-boolean type integer"
    );
}

#[test]
fn test_void_is_illegal_beside_operators() {
    let error = parse_err("import <io>\nlet x = print(\"hi\") == print(\"ho\")");

    assert_eq!(error.message(), "Cannot operate on void literals");
}

#[test]
fn test_prefix_operator_types() {
    let (program, _) = parse("let a = !true\nlet b = !\"s\"\nlet c = !1\nc").unwrap();

    for statement in &program.body[..3] {
        let Statement::Let(stmt) = statement else {
            panic!("expected let statement");
        };
        assert_eq!(stmt.value.ty(), StaticType::Boolean);
    }

    let error = parse_err("import <io>\nlet x = !print(\"hi\")");
    assert_eq!(error.message(), "Cannot use ! operator on void");
}

#[test]
fn test_void_assignment() {
    let error = parse_err("import <io>\nlet x = print(\"hi\")");

    assert_eq!(
        error.message(),
        "Cannot assign void literal to identifier x"
    );
}

#[test]
fn test_assignment_updates_existing_binding() {
    let (program, _) = parse("let x = 1\nx = 2\nx").unwrap();

    assert!(matches!(program.body[1], Statement::Assignment(_)));
}

#[test]
fn test_assignment_rhs_read_counts_as_use() {
    let (_, warnings) = parse("let x = 1\nx = x + 1").unwrap();

    assert_eq!(warnings, 0);
}

#[test]
fn test_assignment_alone_is_not_a_use() {
    let (_, warnings) = parse("let x = 1\nx = 2").unwrap();

    assert_eq!(warnings, 1);
}

#[test]
fn test_assignment_to_undeclared_identifier() {
    let error = parse_err("x = 1");

    assert_eq!(error.message(), "Identifier x is not declared");
}

#[test]
fn test_assignment_type_mismatch() {
    let error = parse_err("let x = 1\nx = \"s\"");

    assert_eq!(
        error.message(),
        "Cannot assign value of type string to identifier x of type integer"
    );
}

#[test]
fn test_call_with_no_arguments() {
    let registries = test_registries();
    let program = parse_with("import <test>\nlet x = foo()\nx", &registries).unwrap();

    let Statement::Let(stmt) = &program.body[1] else {
        panic!("expected let statement");
    };
    let Expression::Call(call) = &stmt.value else {
        panic!("expected call expression");
    };
    assert_eq!(call.name, "foo");
    assert!(call.args.is_empty());
    assert!(!call.is_local);
    assert_eq!(call.ty, StaticType::Integer);
}

#[test]
fn test_nested_calls() {
    let registries = test_registries();
    let program = parse_with("import <test>\nlet n = double(add(1, 2))\nn", &registries).unwrap();

    let Statement::Let(stmt) = &program.body[1] else {
        panic!("expected let statement");
    };
    let Expression::Call(outer) = &stmt.value else {
        panic!("expected call expression");
    };
    assert_eq!(outer.name, "double");
    let Expression::Call(inner) = &outer.args[0] else {
        panic!("expected nested call");
    };
    assert_eq!(inner.name, "add");
    assert_eq!(inner.args.len(), 2);
}

#[test]
fn test_unknown_function() {
    let error = parse_err("let z = unknownFn()");

    assert_eq!(error.message(), "unknownFn is not a function");
}

#[test]
fn test_builtin_requires_import() {
    let error = parse_err("let x = sqrt(16)");

    assert_eq!(
        error.message(),
        "sqrt is not a function, did you forget to import <math>?"
    );
}

#[test]
fn test_unknown_module() {
    let error = parse_err("import <banana>");

    assert_eq!(error.message(), "Unknown module <banana>");
}

#[test]
fn test_call_arity_errors() {
    let too_many = parse_err("import <math>\nlet x = sqrt(1, 2)");
    assert_eq!(too_many.message(), "sqrt expects at most 1 argument(s), got 2");

    let too_few = parse_err("import <math>\nlet x = pow(1)");
    assert_eq!(too_few.message(), "pow expects at least 2 argument(s), got 1");
}

#[test]
fn test_call_argument_type_error() {
    let error = parse_err("import <math>\nlet x = sqrt(\"s\")");

    assert_eq!(
        error.message(),
        "Argument 1 of sqrt must be integer, got string"
    );
}

#[test]
fn test_variadic_and_optional_builtins() {
    let (_, warnings) =
        parse("import <io>\nprint(\"a\", 1, true)\nlet name = input()\nname").unwrap();

    assert_eq!(warnings, 0);
}

#[test]
fn test_method_call_on_string() {
    let (program, _) = parse("let s = \"hello\".upper()\ns").unwrap();

    let Statement::Let(stmt) = &program.body[0] else {
        panic!("expected let statement");
    };
    let Expression::MethodCall(method) = &stmt.value else {
        panic!("expected method call");
    };
    assert_eq!(method.method, "upper");
    assert_eq!(method.ty, StaticType::String);
}

#[test]
fn test_chained_method_calls() {
    let (program, _) = parse("let s = \"hello\".upper().lower()\ns").unwrap();

    let Statement::Let(stmt) = &program.body[0] else {
        panic!("expected let statement");
    };
    let Expression::MethodCall(outer) = &stmt.value else {
        panic!("expected method call");
    };
    assert_eq!(outer.method, "lower");
    let Expression::MethodCall(inner) = outer.object.as_ref() else {
        panic!("expected nested method call");
    };
    assert_eq!(inner.method, "upper");
}

#[test]
fn test_method_call_with_arguments() {
    let registries = test_registries();
    let program = parse_with("let s = \"hey\".shout(3)\ns", &registries).unwrap();

    let Statement::Let(stmt) = &program.body[0] else {
        panic!("expected let statement");
    };
    let Expression::MethodCall(method) = &stmt.value else {
        panic!("expected method call");
    };
    assert_eq!(method.args.len(), 1);
}

#[test]
fn test_property_access() {
    let (program, _) = parse("let len = \"hello\".len\nlen").unwrap();

    let Statement::Let(stmt) = &program.body[0] else {
        panic!("expected let statement");
    };
    let Expression::Property(property) = &stmt.value else {
        panic!("expected property expression");
    };
    assert_eq!(property.property, "len");
    assert_eq!(property.ty, StaticType::Integer);
}

#[test]
fn test_member_confusion_hints() {
    let as_method = parse_err("let x = \"hello\".len()");
    assert_eq!(
        as_method.message(),
        "string has no method called len, did you mean to use it as a property?"
    );

    let as_property = parse_err("let x = \"hello\".upper");
    assert_eq!(
        as_property.message(),
        "string has no property called upper, did you mean to use it as a method?"
    );
}

#[test]
fn test_parse_check_statement() {
    let (program, _) = parse("check true {\nlet x = 1\nx\n}").unwrap();

    assert_eq!(program.body.len(), 1);
    let Statement::Check(stmt) = &program.body[0] else {
        panic!("expected check statement");
    };
    assert!(matches!(stmt.condition, Expression::Boolean(_)));
    assert_eq!(stmt.body.body.len(), 2);
    assert!(stmt.fail.is_none());
    assert!(stmt.fail_check.is_none());
}

#[test]
fn test_parse_check_with_fail_block() {
    let (program, _) = parse("check true {\nlet x = 1\nx\n} fail {\nlet y = 2\ny\n}").unwrap();

    let Statement::Check(stmt) = &program.body[0] else {
        panic!("expected check statement");
    };
    assert!(stmt.fail.is_some());
    assert!(stmt.fail_check.is_none());
}

#[test]
fn test_parse_check_fail_check_chain() {
    let source = "let x = 1\n\
                  check x == 1 {\nx = 2\n} fail check x == 2 {\nx = 3\n} fail {\nx = 4\n}";
    let (program, _) = parse(source).unwrap();

    let Statement::Check(stmt) = &program.body[1] else {
        panic!("expected check statement");
    };
    assert!(stmt.fail.is_none());
    let chained = stmt.fail_check.as_ref().expect("expected chained check");
    assert!(chained.fail.is_some());
    assert!(chained.fail_check.is_none());
}

#[test]
fn test_check_condition_must_be_boolean() {
    let error = parse_err("check 123 {\nlet x = 1\n}");

    assert_eq!(
        error.message(),
        "Expected condition expression to be of type boolean, got integer"
    );
}

#[test]
fn test_check_rejects_parenthesized_condition() {
    let error = parse_err("check (true) {\nlet x = 1\n}");

    assert_eq!(
        error.message(),
        "Unexpected token ( in check statement, expected condition expression"
    );
}

#[test]
fn test_parse_during_statement() {
    let (program, _) = parse("during true {\nlet x = 1\nx\n}").unwrap();

    let Statement::During(stmt) = &program.body[0] else {
        panic!("expected during statement");
    };
    assert!(matches!(stmt.condition, Expression::Boolean(_)));
    assert_eq!(stmt.body.body.len(), 2);
    assert!(stmt.fail.is_none());
}

#[test]
fn test_parse_during_with_fail_block() {
    let (program, _) = parse("during true {\nlet x = 1\nx\n} fail {\nlet y = 2\ny\n}").unwrap();

    let Statement::During(stmt) = &program.body[0] else {
        panic!("expected during statement");
    };
    assert!(stmt.fail.is_some());
}

#[test]
fn test_during_condition_must_be_boolean() {
    let error = parse_err("during 123 {\nlet x = 1\n}");

    assert_eq!(
        error.message(),
        "Expected condition expression to be of type boolean, got integer"
    );
}

#[test]
fn test_parse_function_and_call() {
    let source = "function add(integer a, integer b) -> integer {\nreturn a + b\n}\n\
                  let x = add(1, 2)\nx";
    let (program, warnings) = parse(source).unwrap();

    let Statement::Function(stmt) = &program.body[0] else {
        panic!("expected function statement");
    };
    assert_eq!(stmt.name.value, "add");
    assert_eq!(stmt.params.len(), 2);
    assert_eq!(stmt.return_type, StaticType::Integer);
    assert_eq!(warnings, 0);

    let Statement::Let(stmt) = &program.body[1] else {
        panic!("expected let statement");
    };
    let Expression::Call(call) = &stmt.value else {
        panic!("expected call expression");
    };
    assert!(call.is_local);
}

#[test]
fn test_recursion_is_legal() {
    let source = "function fact(integer n) -> integer {\n\
                  check n <= 1 {\nreturn 1\n}\n\
                  return n * fact(n - 1)\n}\n\
                  let x = fact(5)\nx";
    let (_, warnings) = parse(source).unwrap();

    assert_eq!(warnings, 0);
}

#[test]
fn test_user_function_wins_over_builtin_argument_name() {
    let source = "function add(integer a, integer b) -> integer {\nreturn a + b\n}\n\
                  let x = add(1, \"s\")";
    let error = parse_err(source);

    assert_eq!(error.message(), "Argument b of add must be integer, got string");
}

#[test]
fn test_return_type_mismatch() {
    let error = parse_err("function f() -> integer {\nreturn \"s\"\n}");

    assert_eq!(
        error.message(),
        "Return type string does not match function return type integer"
    );
}

#[test]
fn test_return_type_checked_inside_nested_blocks() {
    let source = "function f(integer n) -> integer {\n\
                  check n > 0 {\nreturn \"s\"\n}\n\
                  return 0\n}";
    let error = parse_err(source);

    assert_eq!(
        error.message(),
        "Return type string does not match function return type integer"
    );
}

#[test]
fn test_function_arrow_is_required() {
    let error = parse_err("function f() integer {\nreturn 0\n}");

    assert_eq!(
        error.message(),
        "Expected -> after function arguments, got identifier"
    );
}

#[test]
fn test_function_redeclaration() {
    let source = "function f() -> integer {\nreturn 0\n}\n\
                  function f() -> integer {\nreturn 1\n}";
    let error = parse_err(source);

    assert_eq!(error.message(), "Function f has already been declared");
}

#[test]
fn test_builtin_redefinition_requires_import() {
    let error = parse_err("import <io>\nfunction print() -> void {\nreturn\n}");
    assert_eq!(
        error.message(),
        "Function print is a built-in function and cannot be redefined"
    );

    // Without the import the name is free to use.
    let (_, warnings) = parse("function print() -> void {\nreturn\n}\nprint()").unwrap();
    assert_eq!(warnings, 0);
}

#[test]
fn test_unused_identifier_warning() {
    let (_, warnings) = parse("let x = 1").unwrap();

    assert_eq!(warnings, 1);
}

#[test]
fn test_unused_function_warning() {
    let (_, warnings) = parse("function f() -> void {\nreturn\n}").unwrap();

    assert_eq!(warnings, 1);
}

#[test]
fn test_unused_import_warning() {
    let (_, warnings) = parse("import <io>").unwrap();

    assert_eq!(warnings, 1);

    let (_, warnings) = parse("import <io>\nprint(\"hi\")").unwrap();
    assert_eq!(warnings, 0);
}

#[test]
fn test_unused_warnings_are_ordered_by_position() {
    let source = "import <math>\nfunction f() -> void {\nreturn\n}\nlet x = 1";
    let registries = Registries::standard();
    let mut parser = Parser::new(source, &registries).unwrap();
    parser.parse_program().unwrap();

    let messages: Vec<&str> = parser
        .warnings()
        .iter()
        .map(|warning| warning.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Module <math> is imported but never used",
            "Function f is declared but never used",
            "Identifier x is declared but never used",
        ]
    );
}

#[test]
fn test_bare_check_block_consumes_the_following_newline() {
    // The fail lookahead skips newlines after the closing brace, so a
    // statement on the next line loses its leading keyword.
    let error = parse_err("check true {\nlet x = 1\nx\n}\nlet y = 2");

    assert_eq!(error.message(), "Identifier y is not declared");
}

#[test]
fn test_semicolons_are_optional_terminators() {
    let (program, _) = parse("let x = 1;\nlet y = 2;;\nx\ny").unwrap();

    assert_eq!(program.body.len(), 4);
}

fn declared_at(line: u32, column: u32) -> Token {
    Token {
        kind: crate::lexer::tokens::TokenKind::Identifier,
        literal: "x".to_string(),
        line,
        column,
    }
}

#[test]
fn test_scope_manager_shadowing() {
    let mut scopes: ScopeManager<StaticType> = ScopeManager::new();
    scopes.define(
        "x",
        Binding {
            value: StaticType::Integer,
            referenced: true,
            declared_at: declared_at(0, 5),
        },
    );
    scopes.enter_scope();
    scopes.define(
        "x",
        Binding {
            value: StaticType::String,
            referenced: true,
            declared_at: declared_at(1, 5),
        },
    );

    assert_eq!(scopes.resolve("x").unwrap().value, StaticType::String);
    assert!(scopes.has_scope("x"));

    scopes.exit_scope();
    assert_eq!(scopes.resolve("x").unwrap().value, StaticType::Integer);
}

#[test]
fn test_scope_manager_redeclaration_checks_innermost_only() {
    let mut scopes: ScopeManager<StaticType> = ScopeManager::new();
    scopes.define(
        "x",
        Binding {
            value: StaticType::Integer,
            referenced: true,
            declared_at: declared_at(0, 5),
        },
    );
    scopes.enter_scope();

    assert!(!scopes.has_scope("x"));
    assert!(scopes.resolve("x").is_some());
}

#[test]
fn test_scope_manager_collects_unused_from_exited_scopes() {
    let mut scopes: ScopeManager<StaticType> = ScopeManager::new();
    scopes.enter_scope();
    scopes.define(
        "x",
        Binding {
            value: StaticType::Integer,
            referenced: false,
            declared_at: declared_at(2, 5),
        },
    );
    scopes.exit_scope();
    scopes.define(
        "x",
        Binding {
            value: StaticType::Integer,
            referenced: false,
            declared_at: declared_at(0, 5),
        },
    );

    let unused = scopes.unused();
    assert_eq!(unused.len(), 2);
    // Sorted by declaration position.
    assert_eq!(unused[0].1.declared_at.line, 0);
    assert_eq!(unused[1].1.declared_at.line, 2);
}
