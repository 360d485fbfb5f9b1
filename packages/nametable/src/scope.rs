//! Nested lexical scopes on top of a [`BindingStore`].

use smol_str::SmolStr;

use crate::store::{Binding, BindingStore};
use crate::{DeclareError, Declared, ScopeUnderflow};

/// The identifiers declared directly in a single scope. Used to know which bindings to release
/// when the scope is exited.
#[derive(Debug, Default)]
pub struct ScopeFrame {
    /// Frames are numbered in the order they were entered. The outermost frame is `0`.
    id: usize,
    idents: Vec<SmolStr>,
}

/// Keeps track of the stack of open scopes and all the bindings declared in them.
///
/// The first frame is the outermost scope. It is created with the stack and can never be exited.
#[derive(Debug)]
pub struct Scopes {
    store: BindingStore,
    frames: Vec<ScopeFrame>,
    next_frame_id: usize,
}

impl Scopes {
    pub fn new() -> Self {
        Self::with_store(BindingStore::new())
    }

    pub fn with_store(store: BindingStore) -> Self {
        Self {
            store,
            frames: vec![ScopeFrame::default()],
            next_frame_id: 1,
        }
    }

    /// Depth of the innermost open scope. The outermost scope has depth `0`.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn store(&self) -> &BindingStore {
        &self.store
    }

    /// Id of the innermost open frame. Ids only grow, so every frame entered after a given frame
    /// has a larger id.
    pub fn current_frame(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.id)
    }

    pub fn enter_scope(&mut self) {
        self.frames.push(ScopeFrame {
            id: self.next_frame_id,
            idents: Vec::new(),
        });
        self.next_frame_id += 1;
        log::trace!("entered scope at depth {}", self.depth());
    }

    /// Exit the innermost scope, releasing every binding declared in it.
    pub fn exit_scope(&mut self) -> Result<(), ScopeUnderflow> {
        let depth = self.depth();
        if depth == 0 {
            return Err(ScopeUnderflow);
        }
        let frame = self.frames.pop().expect("non-outermost scope has a frame");
        for ident in &frame.idents {
            let removed = self.store.remove(ident, depth);
            debug_assert!(removed, "binding `{ident}` missing from store at depth {depth}");
        }
        log::trace!(
            "exited scope at depth {depth}, released {} binding(s)",
            frame.idents.len()
        );
        Ok(())
    }

    /// Declare `ident` in the innermost scope.
    ///
    /// Shadowing a binding from an enclosing scope is allowed. Declaring the same identifier twice
    /// in the same scope is not.
    pub fn declare(&mut self, ident: &str, line: u32) -> Result<Declared, DeclareError> {
        if ident.is_empty() {
            return Err(DeclareError::EmptyIdent);
        }
        let depth = self.depth();
        if self.store.lookup_depth(ident) == Some(depth) {
            let line = self
                .store
                .lookup_line(ident)
                .expect("binding with a depth has a line");
            log::trace!("rejected redeclaration of `{ident}`, first declared on line {line}");
            return Err(DeclareError::Redeclared {
                ident: ident.into(),
                line,
            });
        }
        let shadows = self.store.lookup(ident).cloned();

        let ident = SmolStr::new(ident);
        self.frames
            .last_mut()
            .expect("outermost scope is never popped")
            .idents
            .push(ident.clone());
        log::trace!("declared `{ident}` on line {line} at depth {depth}");
        self.store.insert(ident, line, depth);

        Ok(Declared { depth, shadows })
    }

    /// Find the innermost visible binding for `ident`.
    pub fn lookup(&self, ident: &str) -> Option<&Binding> {
        if ident.is_empty() {
            return None;
        }
        self.store.lookup(ident)
    }

    /// Line on which the innermost visible binding for `ident` was declared.
    pub fn find(&self, ident: &str) -> Option<u32> {
        if ident.is_empty() {
            return None;
        }
        self.store.lookup_line(ident)
    }

    /// Depth of the scope holding the innermost visible binding for `ident`.
    pub fn lookup_depth(&self, ident: &str) -> Option<usize> {
        if ident.is_empty() {
            return None;
        }
        self.store.lookup_depth(ident)
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}
