//! Lexically-scoped type context (§3 "Type context"): a stack of
//! `Symbol -> Ty` frames with an `outer` link and an optional enclosing
//! function return type, used to validate `return` statements.
//!
//! Shaped after the teacher's `ScopeTree`/`Rib` outer-chain
//! (`faxc-sem/src/scope.rs`), but frames hold type bindings instead of
//! `DefId`s, and there is no separate `RibId` index table — a context is
//! small enough, and short-lived enough (one per program, one more per
//! function body), that a plain boxed linked list of frames is the right
//! weight.

use rustc_hash::FxHashMap;

use glimmer_util::Symbol;

use crate::types::Ty;

#[derive(Debug, Clone, Default)]
pub struct Context {
    bindings: FxHashMap<Symbol, Ty>,
    outer: Option<Box<Context>>,
    /// Set only on the frame created for a function body (§4.3 "whose
    /// enclosing-function-return-type slot is set to the declared return");
    /// `return`'s type-check walks outward through `outer` to find it.
    return_type: Option<Ty>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    /// Builds the fresh context for a function body: §4.3 says its `outer`
    /// is "a deep copy of the surrounding context" — since `Context` here
    /// owns its bindings (no shared/`Rc` frames), an ordinary `Clone` of the
    /// Rust value already is that deep copy.
    pub fn enclosed(outer: &Context, return_type: Ty) -> Self {
        Context { bindings: FxHashMap::default(), outer: Some(Box::new(outer.clone())), return_type: Some(return_type) }
    }

    /// Walks outward from the innermost frame (§3 "Lookup walks outward").
    pub fn get(&self, name: Symbol) -> Option<Ty> {
        if let Some(ty) = self.bindings.get(&name) {
            return Some(ty.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Writes to the innermost frame (§3 "insertion writes to the innermost
    /// frame").
    pub fn set(&mut self, name: Symbol, ty: Ty) {
        self.bindings.insert(name, ty);
    }

    /// The return type of the nearest enclosing function, if any. Unlike
    /// bindings, this does not recurse through `outer` on its own — each
    /// context created by `enclosed` carries the slot for its own function,
    /// so nested non-function blocks share the same `Context` value (see
    /// `checker::typeof_block`) and see the same slot without a walk.
    pub fn return_type(&self) -> Option<&Ty> {
        self.return_type.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimmer_util::Interner;

    #[test]
    fn lookup_walks_outward_through_enclosing_frames() {
        let mut interner = Interner::new();
        let n = interner.intern("n");
        let mut outer = Context::new();
        outer.set(n, Ty::Int);

        let inner = Context::enclosed(&outer, Ty::Int);
        assert_eq!(inner.get(n), Some(Ty::Int));
    }

    #[test]
    fn insertion_only_ever_touches_the_innermost_frame() {
        let mut interner = Interner::new();
        let n = interner.intern("n");
        let mut outer = Context::new();
        outer.set(n, Ty::Int);

        let mut inner = Context::enclosed(&outer, Ty::Int);
        inner.set(n, Ty::String);

        assert_eq!(inner.get(n), Some(Ty::String));
        assert_eq!(outer.get(n), Some(Ty::Int));
    }

    #[test]
    fn deep_copy_means_later_outer_mutation_does_not_leak_in() {
        let mut interner = Interner::new();
        let n = interner.intern("n");
        let mut outer = Context::new();
        outer.set(n, Ty::Int);

        let inner = Context::enclosed(&outer, Ty::Int);
        outer.set(n, Ty::String);

        assert_eq!(inner.get(n), Some(Ty::Int));
    }
}
