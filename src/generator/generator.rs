//! Lowers the typed tree to C++ source text.
//!
//! Generation is a single visitor pass that appends to an output buffer.
//! Headers are collected as they are first needed and prepended once the
//! pass finishes, deduplicated in first-use order. User functions are
//! emitted into a separate buffer ahead of `main`.

use crate::ast::ast::{
    BlockStatement, CheckStatement, DuringStatement, Expression, FunctionStatement, Program,
    Statement,
};
use crate::ast::types::StaticType;

const INDENT: &str = "    ";

pub struct CodeGenerator {
    includes: Vec<String>,
    functions: String,
    out: String,
    indent: usize,
    loop_counter: u32,
}

impl CodeGenerator {
    pub fn new() -> Self {
        CodeGenerator {
            includes: Vec::new(),
            functions: String::new(),
            out: String::new(),
            indent: 1,
            loop_counter: 0,
        }
    }

    pub fn generate(mut self, program: &Program) -> String {
        for statement in &program.body {
            self.emit_statement(statement);
        }

        let mut result = String::new();
        for include in &self.includes {
            result.push_str(&format!("#include {}\n", include));
        }
        if !self.includes.is_empty() {
            result.push('\n');
        }
        result.push_str(&self.functions);
        result.push_str("int main() {\n");
        result.push_str(&self.out);
        result.push_str("    return 0;\n}\n");
        result
    }

    fn add_include(&mut self, include: String) {
        if !self.includes.contains(&include) {
            self.includes.push(include);
        }
    }

    fn push_indent(&mut self) {
        self.out.push_str(&INDENT.repeat(self.indent));
    }

    /// Appends `;` unless the buffer already ends with one, directly or
    /// followed by a single trailing newline. Safe to call repeatedly.
    fn terminate_statement(&mut self) {
        let end = self.out.strip_suffix('\n').unwrap_or(&self.out);
        if end.ends_with(';') {
            return;
        }
        if self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out.push_str(";\n");
    }

    fn emit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Let(stmt) => {
                self.push_indent();
                self.out
                    .push_str(&format!("{} {} = ", stmt.value.ty().code(), stmt.name.value));
                self.emit_expression(&stmt.value);
                self.terminate_statement();
            }
            Statement::Assignment(stmt) => {
                self.push_indent();
                self.out.push_str(&format!("{} = ", stmt.name.value));
                self.emit_expression(&stmt.value);
                self.terminate_statement();
            }
            Statement::Expression(expression) => {
                self.push_indent();
                self.emit_expression(expression);
                self.terminate_statement();
            }
            Statement::Import(_) => {}
            Statement::Return(stmt) => {
                self.push_indent();
                self.out.push_str("return");
                if !matches!(stmt.value, Expression::Void(_)) {
                    self.out.push(' ');
                    self.emit_expression(&stmt.value);
                }
                self.terminate_statement();
            }
            Statement::Check(stmt) => {
                self.push_indent();
                self.emit_check(stmt);
                self.out.push('\n');
            }
            Statement::During(stmt) => self.emit_during(stmt),
            Statement::Function(stmt) => self.emit_function(stmt),
        }
    }

    /// Emits `{ .. }` with the closing brace at the current indent, no
    /// trailing newline so `else` chains can attach.
    fn emit_block(&mut self, block: &BlockStatement) {
        self.out.push_str("{\n");
        self.indent += 1;
        for statement in &block.body {
            self.emit_statement(statement);
        }
        self.indent -= 1;
        self.push_indent();
        self.out.push('}');
    }

    fn emit_check(&mut self, check: &CheckStatement) {
        self.out.push_str("if (");
        self.emit_expression(&check.condition);
        self.out.push_str(") ");
        self.emit_block(&check.body);

        if let Some(fail_check) = &check.fail_check {
            self.out.push_str(" else ");
            self.emit_check(fail_check);
        } else if let Some(fail) = &check.fail {
            self.out.push_str(" else ");
            self.emit_block(fail);
        }
    }

    fn emit_during(&mut self, during: &DuringStatement) {
        match &during.fail {
            Some(fail) => {
                // The fail block runs only if the loop body never did; a
                // hidden flag records the first iteration.
                let flag = format!("__during_ran_{}", self.loop_counter);
                self.loop_counter += 1;

                self.push_indent();
                self.out.push_str(&format!("bool {} = false;\n", flag));
                self.push_indent();
                self.out.push_str("while (");
                self.emit_expression(&during.condition);
                self.out.push_str(") {\n");
                self.indent += 1;
                self.push_indent();
                self.out.push_str(&format!("{} = true;\n", flag));
                for statement in &during.body.body {
                    self.emit_statement(statement);
                }
                self.indent -= 1;
                self.push_indent();
                self.out.push_str("}\n");
                self.push_indent();
                self.out.push_str(&format!("if (!{}) ", flag));
                self.emit_block(fail);
                self.out.push('\n');
            }
            None => {
                self.push_indent();
                self.out.push_str("while (");
                self.emit_expression(&during.condition);
                self.out.push_str(") ");
                self.emit_block(&during.body);
                self.out.push('\n');
            }
        }
    }

    fn emit_function(&mut self, function: &FunctionStatement) {
        let saved_out = std::mem::take(&mut self.out);
        let saved_indent = std::mem::replace(&mut self.indent, 0);

        let params = function
            .params
            .iter()
            .map(|param| format!("{} {}", param.ty.code(), param.value))
            .collect::<Vec<_>>()
            .join(", ");
        self.out.push_str(&format!(
            "{} {}({}) ",
            function.return_type.code(),
            function.name.value,
            params
        ));
        self.emit_block(&function.body);
        self.out.push_str("\n\n");

        let rendered = std::mem::replace(&mut self.out, saved_out);
        self.functions.push_str(&rendered);
        self.indent = saved_indent;
    }

    fn emit_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Integer(literal) => {
                self.out.push_str(&literal.value.to_string());
            }
            Expression::Str(literal) => {
                self.add_include("<string>".to_string());
                self.out
                    .push_str(&format!("std::string(\"{}\")", escape_string(&literal.value)));
            }
            Expression::Boolean(literal) => {
                self.out.push_str(if literal.value { "true" } else { "false" });
            }
            Expression::Void(_) => {}
            Expression::Identifier(identifier) => {
                self.out.push_str(&identifier.value);
            }
            Expression::Prefix(prefix) => {
                if prefix.operand.ty() == StaticType::String {
                    self.out.push('(');
                    self.emit_expression(&prefix.operand);
                    self.out.push_str(").empty()");
                } else {
                    self.out.push_str("(!");
                    self.emit_expression(&prefix.operand);
                    self.out.push(')');
                }
            }
            Expression::Infix(infix) => {
                self.out.push('(');
                self.emit_expression(&infix.left);
                self.out.push_str(&format!(" {} ", infix.operator));
                self.emit_expression(&infix.right);
                self.out.push(')');
            }
            Expression::Call(call) => {
                if call.is_local {
                    self.out.push_str(&format!("{}(", call.name));
                } else {
                    self.add_include(format!("\"ecem2/{}.hpp\"", call.module));
                    self.out.push_str(&format!("ecem2::{}(", call.name));
                }
                self.emit_arguments(&call.args, false);
                self.out.push(')');
            }
            Expression::MethodCall(method) => {
                let runtime = method.object.ty().runtime_name();
                self.add_include(format!(
                    "\"ecem2/{}/methods/{}.hpp\"",
                    runtime, method.method
                ));
                self.out
                    .push_str(&format!("ecem2::{}::{}(", runtime, method.method));
                self.emit_expression(&method.object);
                self.emit_arguments(&method.args, true);
                self.out.push(')');
            }
            Expression::Property(property) => {
                let runtime = property.object.ty().runtime_name();
                self.add_include(format!(
                    "\"ecem2/{}/properties/{}.hpp\"",
                    runtime, property.property
                ));
                self.out
                    .push_str(&format!("ecem2::{}::{}(", runtime, property.property));
                self.emit_expression(&property.object);
                self.out.push(')');
            }
        }
    }

    fn emit_arguments(&mut self, args: &[Expression], leading_comma: bool) {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 || leading_comma {
                self.out.push_str(", ");
            }
            self.emit_expression(arg);
        }
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        CodeGenerator::new()
    }
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\x08' => escaped.push_str("\\b"),
            '\x0c' => escaped.push_str("\\f"),
            '\x0b' => escaped.push_str("\\v"),
            '\0' => escaped.push_str("\\0"),
            other => escaped.push(other),
        }
    }
    escaped
}
