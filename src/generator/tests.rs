//! Unit tests for the code generator.
//!
//! This module contains tests for:
//! - Statement and expression lowering to C++ text
//! - Include collection, deduplication and ordering
//! - The hidden loop flag for during/fail and check chains

use crate::parser::parser::Parser;
use crate::registry::registry::Registries;

use super::generator::CodeGenerator;

fn generate(source: &str) -> String {
    let registries = Registries::standard();
    let mut parser = Parser::new(source, &registries).expect("lexing failed");
    let program = parser.parse_program().expect("parsing failed");
    CodeGenerator::new().generate(&program)
}

#[test]
fn test_integer_let() {
    let output = generate("let x = 42");

    assert_eq!(output, "int main() {\n    int x = 42;\n    return 0;\n}\n");
}

#[test]
fn test_string_let_pulls_string_header() {
    let output = generate("let message = \"hello\"");

    assert_eq!(
        output,
        "#include <string>\n\n\
         int main() {\n    \
             std::string message = std::string(\"hello\");\n    \
             return 0;\n\
         }\n"
    );
}

#[test]
fn test_infix_is_parenthesized() {
    let output = generate("let result = 3 + 4");

    assert!(output.contains("    int result = (3 + 4);\n"));
}

#[test]
fn test_builtin_call() {
    let output = generate("import <math>\nlet x = sqrt(16)");

    assert_eq!(
        output,
        "#include \"ecem2/math.hpp\"\n\n\
         int main() {\n    \
             int x = ecem2::sqrt(16);\n    \
             return 0;\n\
         }\n"
    );
}

#[test]
fn test_includes_are_deduplicated() {
    let output = generate("import <math>\nlet x = sqrt(16)\nlet y = sqrt(x)\ny");

    assert_eq!(output.matches("#include \"ecem2/math.hpp\"").count(), 1);
}

#[test]
fn test_method_call_lowering() {
    let output = generate("\"hello\".upper()");

    assert!(output.contains("#include \"ecem2/StringLiteral/methods/upper.hpp\"\n"));
    assert!(output.contains("#include <string>\n"));
    assert!(output.contains("    ecem2::StringLiteral::upper(std::string(\"hello\"));\n"));
}

#[test]
fn test_method_call_arguments_follow_object() {
    let output = generate("import <string>\nlet x = contains(\"hello\".upper(), \"HE\")\nx");

    assert!(output.contains(
        "bool x = ecem2::contains(\
             ecem2::StringLiteral::upper(std::string(\"hello\")), \
             std::string(\"HE\"));"
    ));
}

#[test]
fn test_property_lowering() {
    let output = generate("let n = \"hello\".len\nn");

    assert!(output.contains("#include \"ecem2/StringLiteral/properties/len.hpp\"\n"));
    assert!(output.contains("    int n = ecem2::StringLiteral::len(std::string(\"hello\"));\n"));
}

#[test]
fn test_during_lowering() {
    let output = generate("let i = 0\nduring i < 3 {\ni = i + 1\n}");

    assert!(output.contains(
        "    while ((i < 3)) {\n        \
             i = (i + 1);\n    \
         }\n"
    ));
    assert!(!output.contains("__during_ran"));
}

#[test]
fn test_during_fail_uses_hidden_flag() {
    let output = generate("let i = 0\nduring i < 3 {\ni = i + 1\n} fail {\ni = 99\n}");

    assert!(output.contains(
        "    bool __during_ran_0 = false;\n    \
         while ((i < 3)) {\n        \
             __during_ran_0 = true;\n        \
             i = (i + 1);\n    \
         }\n    \
         if (!__during_ran_0) {\n        \
             i = 99;\n    \
         }\n"
    ));
}

#[test]
fn test_during_flags_are_numbered() {
    let source = "let i = 0\n\
                  during i < 1 {\ni = 1\n} fail {\ni = 2\n}\n\
                  during i < 2 {\ni = 3\n} fail {\ni = 4\n}";
    let output = generate(source);

    assert!(output.contains("bool __during_ran_0 = false;"));
    assert!(output.contains("bool __during_ran_1 = false;"));
}

#[test]
fn test_check_chain_lowering() {
    let source = "let x = 1\n\
                  check x == 1 {\nx = 2\n} fail check x == 2 {\nx = 3\n} fail {\nx = 4\n}";
    let output = generate(source);

    assert!(output.contains(
        "    if ((x == 1)) {\n        \
             x = 2;\n    \
         } else if ((x == 2)) {\n        \
             x = 3;\n    \
         } else {\n        \
             x = 4;\n    \
         }\n"
    ));
}

#[test]
fn test_function_emitted_before_main() {
    let source = "function add(integer a, integer b) -> integer {\nreturn a + b\n}\n\
                  let x = add(1, 2)\nx";
    let output = generate(source);

    let function = output.find("int add(int a, int b) {\n    return (a + b);\n}\n\n");
    let main = output.find("int main() {");
    assert!(function.is_some());
    assert!(function.unwrap() < main.unwrap());
    assert!(output.contains("    int x = add(1, 2);\n"));
}

#[test]
fn test_bare_return_in_void_function() {
    let output = generate("function f() -> void {\nreturn\n}\nf()");

    assert!(output.contains("void f() {\n    return;\n}\n\n"));
    assert!(output.contains("    f();\n"));
}

#[test]
fn test_import_emits_nothing() {
    let output = generate("import <io>");

    assert_eq!(output, "int main() {\n    return 0;\n}\n");
}

#[test]
fn test_explicit_semicolons_do_not_double() {
    let output = generate("let x = 1;\nx;");

    assert!(!output.contains(";;"));
}

#[test]
fn test_prefix_on_string_becomes_empty_check() {
    let output = generate("let b = !\"abc\"\nb");

    assert!(output.contains("    bool b = (std::string(\"abc\")).empty();\n"));
}

#[test]
fn test_prefix_on_integer() {
    let output = generate("let c = !1\nc");

    assert!(output.contains("    bool c = (!1);\n"));
}

#[test]
fn test_string_escapes_are_reencoded() {
    let output = generate(r#"let s = "a\nb\t\"q\"""#);

    assert!(output.contains("std::string(\"a\\nb\\t\\\"q\\\"\")"));
}

#[test]
fn test_main_scaffold() {
    let output = generate("");

    assert_eq!(output, "int main() {\n    return 0;\n}\n");
}
