//! Signature tables for the runtime's built-in functions, literal methods
//! and literal properties.
//!
//! Registries are built once before parsing and only read afterwards. The
//! parser receives them by reference and never mutates them.

use std::collections::{HashMap, HashSet};

use crate::ast::types::StaticType;

/// One declared parameter. `types` is the set of accepted argument types;
/// `variadic` is only legal on the last parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub types: Vec<StaticType>,
    pub optional: bool,
    pub variadic: bool,
    pub name: Option<String>,
}

impl Param {
    pub fn required(types: &[StaticType]) -> Self {
        Param {
            types: types.to_vec(),
            optional: false,
            variadic: false,
            name: None,
        }
    }

    pub fn optional(types: &[StaticType]) -> Self {
        Param {
            types: types.to_vec(),
            optional: true,
            variadic: false,
            name: None,
        }
    }

    pub fn variadic(types: &[StaticType]) -> Self {
        Param {
            types: types.to_vec(),
            optional: false,
            variadic: true,
            name: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub return_type: StaticType,
    pub params: Vec<Param>,
    pub module: String,
}

#[derive(Debug, Clone)]
pub struct MethodDef {
    pub name: String,
    pub return_type: StaticType,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub name: String,
    pub return_type: StaticType,
}

#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

#[derive(Debug, Default)]
pub struct MethodRegistry {
    methods: HashMap<StaticType, HashMap<String, MethodDef>>,
}

impl MethodRegistry {
    pub fn register(&mut self, ty: StaticType, def: MethodDef) {
        self.methods
            .entry(ty)
            .or_default()
            .insert(def.name.clone(), def);
    }

    pub fn get(&self, ty: StaticType, name: &str) -> Option<&MethodDef> {
        self.methods.get(&ty).and_then(|methods| methods.get(name))
    }

    pub fn has(&self, ty: StaticType, name: &str) -> bool {
        self.get(ty, name).is_some()
    }
}

#[derive(Debug, Default)]
pub struct PropertyRegistry {
    properties: HashMap<StaticType, HashMap<String, PropertyDef>>,
}

impl PropertyRegistry {
    pub fn register(&mut self, ty: StaticType, def: PropertyDef) {
        self.properties
            .entry(ty)
            .or_default()
            .insert(def.name.clone(), def);
    }

    pub fn get(&self, ty: StaticType, name: &str) -> Option<&PropertyDef> {
        self.properties
            .get(&ty)
            .and_then(|properties| properties.get(name))
    }

    pub fn has(&self, ty: StaticType, name: &str) -> bool {
        self.get(ty, name).is_some()
    }
}

#[derive(Debug, Default)]
pub struct Registries {
    pub functions: FunctionRegistry,
    pub methods: MethodRegistry,
    pub properties: PropertyRegistry,
    modules: HashSet<String>,
}

impl Registries {
    pub fn new() -> Self {
        Registries::default()
    }

    /// The registries with the runtime's standard modules installed.
    pub fn standard() -> Self {
        let mut registries = Registries::new();
        super::stdlib::install(&mut registries);
        registries
    }

    pub fn register_module(&mut self, name: impl Into<String>) {
        self.modules.insert(name.into());
    }

    pub fn is_module(&self, name: &str) -> bool {
        self.modules.contains(name)
    }
}
