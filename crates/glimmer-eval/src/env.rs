//! The runtime environment (§9 "Static scoping via deep-copied closure
//! environments"): a stack of `Symbol -> Value` frames with an `outer` link,
//! shaped identically to `glimmer_sem::Context` but carrying runtime values
//! instead of types. A function literal captures a full, independent clone
//! of the environment at the point it is evaluated, so later mutations to
//! an enclosing scope never leak into an already-built closure.

use rustc_hash::FxHashMap;

use glimmer_util::Symbol;

use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: FxHashMap<Symbol, Value>,
    outer: Option<Box<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    /// A fresh frame stacked on top of `outer`. Used both for a function
    /// call's argument frame and for any other nested scope (loop bodies,
    /// if-blocks) that should see but not mutate the enclosing bindings in
    /// place.
    pub fn enclosed(outer: &Environment) -> Self {
        Environment { bindings: FxHashMap::default(), outer: Some(Box::new(outer.clone())) }
    }

    pub fn get(&self, name: Symbol) -> Option<Value> {
        if let Some(v) = self.bindings.get(&name) {
            return Some(v.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Binds in the innermost frame. Glimmer has no `let` keyword (§11): the
    /// first assignment to a name is its binding, later ones rebind it.
    pub fn set(&mut self, name: Symbol, value: Value) {
        self.bindings.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimmer_util::Interner;

    #[test]
    fn lookup_walks_outward() {
        let mut interner = Interner::new();
        let n = interner.intern("n");
        let mut outer = Environment::new();
        outer.set(n, Value::Int(5));

        let inner = Environment::enclosed(&outer);
        assert!(matches!(inner.get(n), Some(Value::Int(5))));
    }

    #[test]
    fn captured_snapshot_is_immune_to_later_outer_mutation() {
        let mut interner = Interner::new();
        let n = interner.intern("n");
        let mut outer = Environment::new();
        outer.set(n, Value::Int(1));

        let captured = outer.clone();
        outer.set(n, Value::Int(2));

        assert!(matches!(captured.get(n), Some(Value::Int(1))));
    }
}
