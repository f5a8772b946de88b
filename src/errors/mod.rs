pub mod errors;
pub mod reporter;
