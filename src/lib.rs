#![allow(clippy::module_inception)]

pub mod ast;
pub mod errors;
pub mod generator;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod registry;

use crate::errors::errors::{Error, Warning};
use crate::generator::generator::CodeGenerator;
use crate::parser::parser::Parser;
use crate::registry::registry::Registries;

pub const FILE_EXTENSION: &str = ".ecem";

/// Runs the full pipeline over one source buffer: lex, parse with fused
/// type checking, then lower to C++ text. Warnings are returned alongside
/// the generated code; the first fatal diagnostic aborts the pipeline.
pub fn compile(source: &str, registries: &Registries) -> Result<(String, Vec<Warning>), Error> {
    let mut parser = Parser::new(source, registries)?;
    let program = parser.parse_program()?;
    let warnings = parser.take_warnings();
    let code = CodeGenerator::new().generate(&program);
    Ok((code, warnings))
}
