//! Lexically scoped symbol tables.
//!
//! Identifiers and user functions live in separate managers so the two
//! namespaces shadow independently. Exited frames hand their never
//! referenced bindings to an accumulator so end-of-program unused checks
//! see inner scopes too.

use std::collections::HashMap;

use crate::lexer::tokens::Token;

#[derive(Debug, Clone)]
pub struct Binding<T> {
    pub value: T,
    pub referenced: bool,
    pub declared_at: Token,
}

#[derive(Debug)]
pub struct ScopeManager<T> {
    scopes: Vec<HashMap<String, Binding<T>>>,
    unuseds: Vec<(String, Binding<T>)>,
}

impl<T> ScopeManager<T> {
    pub fn new() -> Self {
        ScopeManager {
            scopes: vec![HashMap::new()],
            unuseds: Vec::new(),
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn exit_scope(&mut self) {
        if let Some(frame) = self.scopes.pop() {
            for (name, binding) in frame {
                if !binding.referenced {
                    self.unuseds.push((name, binding));
                }
            }
        }
    }

    pub fn define(&mut self, name: impl Into<String>, binding: Binding<T>) {
        if let Some(frame) = self.scopes.last_mut() {
            frame.insert(name.into(), binding);
        }
    }

    /// Innermost-wins lookup across all live frames.
    pub fn resolve(&self, name: &str) -> Option<&Binding<T>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
    }

    pub fn resolve_mut(&mut self, name: &str) -> Option<&mut Binding<T>> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(name))
    }

    /// Whether `name` is declared in the innermost frame. Redeclaration is
    /// only a collision within one frame, shadowing an outer frame is fine.
    pub fn has_scope(&self, name: &str) -> bool {
        self.scopes
            .last()
            .map(|frame| frame.contains_key(name))
            .unwrap_or(false)
    }

    /// Never-referenced bindings from the live frames plus every exited
    /// frame, in declaration order.
    pub fn unused(&self) -> Vec<(&str, &Binding<T>)> {
        let mut unused: Vec<(&str, &Binding<T>)> = self
            .scopes
            .iter()
            .flat_map(|frame| frame.iter())
            .filter(|(_, binding)| !binding.referenced)
            .map(|(name, binding)| (name.as_str(), binding))
            .chain(
                self.unuseds
                    .iter()
                    .map(|(name, binding)| (name.as_str(), binding)),
            )
            .collect();
        unused.sort_by_key(|(_, binding)| (binding.declared_at.line, binding.declared_at.column));
        unused
    }
}

impl<T> Default for ScopeManager<T> {
    fn default() -> Self {
        ScopeManager::new()
    }
}
