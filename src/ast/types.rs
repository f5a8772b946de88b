use std::fmt::Display;

/// The language's primitive type lattice. `Void` only arises from calls to
/// functions without a return value and is rejected almost everywhere.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum StaticType {
    Integer,
    String,
    Boolean,
    Void,
}

impl StaticType {
    /// Resolves a type annotation keyword, e.g. in a parameter list.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "integer" => Some(StaticType::Integer),
            "string" => Some(StaticType::String),
            "boolean" => Some(StaticType::Boolean),
            "void" => Some(StaticType::Void),
            _ => None,
        }
    }

    /// The target-language spelling of the type.
    pub fn code(&self) -> &'static str {
        match self {
            StaticType::Integer => "int",
            StaticType::String => "std::string",
            StaticType::Boolean => "bool",
            StaticType::Void => "void",
        }
    }

    /// The runtime namespace segment used for method and property calls.
    pub fn runtime_name(&self) -> &'static str {
        match self {
            StaticType::Integer => "IntegerLiteral",
            StaticType::String => "StringLiteral",
            StaticType::Boolean => "BooleanLiteral",
            StaticType::Void => "VoidLiteral",
        }
    }
}

impl Display for StaticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StaticType::Integer => "integer",
            StaticType::String => "string",
            StaticType::Boolean => "boolean",
            StaticType::Void => "void",
        };
        write!(f, "{}", name)
    }
}
