//! The standard module surface shipped with the runtime headers.

use crate::ast::types::StaticType;

use super::registry::{FunctionDef, MethodDef, Param, PropertyDef, Registries};

pub(super) fn install(registries: &mut Registries) {
    registries.register_module("io");
    registries.register_module("string");
    registries.register_module("math");
    registries.register_module("random");

    // io
    registries.functions.register(FunctionDef {
        name: "print".into(),
        return_type: StaticType::Void,
        params: vec![Param::variadic(&[
            StaticType::String,
            StaticType::Boolean,
            StaticType::Integer,
        ])],
        module: "io".into(),
    });
    registries.functions.register(FunctionDef {
        name: "input".into(),
        return_type: StaticType::String,
        params: vec![Param::optional(&[StaticType::String])],
        module: "io".into(),
    });

    // string
    registries.functions.register(FunctionDef {
        name: "to_string".into(),
        return_type: StaticType::String,
        params: vec![Param::required(&[StaticType::Integer, StaticType::Boolean])],
        module: "string".into(),
    });
    registries.functions.register(FunctionDef {
        name: "starts_with".into(),
        return_type: StaticType::Boolean,
        params: vec![
            Param::required(&[StaticType::String]),
            Param::required(&[StaticType::String]),
        ],
        module: "string".into(),
    });
    registries.functions.register(FunctionDef {
        name: "ends_with".into(),
        return_type: StaticType::Boolean,
        params: vec![
            Param::required(&[StaticType::String]),
            Param::required(&[StaticType::String]),
        ],
        module: "string".into(),
    });
    registries.functions.register(FunctionDef {
        name: "contains".into(),
        return_type: StaticType::Boolean,
        params: vec![
            Param::required(&[StaticType::String]),
            Param::required(&[StaticType::String]),
        ],
        module: "string".into(),
    });

    // math
    registries.functions.register(FunctionDef {
        name: "sqrt".into(),
        return_type: StaticType::Integer,
        params: vec![Param::required(&[StaticType::Integer])],
        module: "math".into(),
    });
    registries.functions.register(FunctionDef {
        name: "pow".into(),
        return_type: StaticType::Integer,
        params: vec![
            Param::required(&[StaticType::Integer]),
            Param::required(&[StaticType::Integer]),
        ],
        module: "math".into(),
    });
    registries.functions.register(FunctionDef {
        name: "abs".into(),
        return_type: StaticType::Integer,
        params: vec![Param::required(&[StaticType::Integer])],
        module: "math".into(),
    });
    registries.functions.register(FunctionDef {
        name: "max".into(),
        return_type: StaticType::Integer,
        params: vec![Param::variadic(&[StaticType::Integer])],
        module: "math".into(),
    });
    registries.functions.register(FunctionDef {
        name: "min".into(),
        return_type: StaticType::Integer,
        params: vec![Param::variadic(&[StaticType::Integer])],
        module: "math".into(),
    });

    // random
    registries.functions.register(FunctionDef {
        name: "randomInt".into(),
        return_type: StaticType::Integer,
        params: vec![
            Param::required(&[StaticType::Integer]),
            Param::required(&[StaticType::Integer]),
        ],
        module: "random".into(),
    });
    registries.functions.register(FunctionDef {
        name: "randomString".into(),
        return_type: StaticType::String,
        params: vec![Param::required(&[StaticType::Integer])],
        module: "random".into(),
    });

    // string literal members
    registries.methods.register(
        StaticType::String,
        MethodDef {
            name: "upper".into(),
            return_type: StaticType::String,
            params: vec![],
        },
    );
    registries.methods.register(
        StaticType::String,
        MethodDef {
            name: "lower".into(),
            return_type: StaticType::String,
            params: vec![],
        },
    );
    registries.properties.register(
        StaticType::String,
        PropertyDef {
            name: "len".into(),
            return_type: StaticType::Integer,
        },
    );
}
