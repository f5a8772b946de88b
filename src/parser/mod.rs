pub mod expr;
pub mod parser;
pub mod scope;
pub mod stmt;

#[cfg(test)]
mod tests;
