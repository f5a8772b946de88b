pub mod registry;
pub mod stdlib;
pub mod validate;
