//! A scoped symbol table for semantic analysis.
//!
//! [`NameTable`] records which identifiers are declared in which lexical scope and answers
//! whether an identifier is visible at the current position, and on which line it was declared.

mod scope;
mod store;


use smol_str::SmolStr;
use thiserror::Error;

use self::scope::Scopes;
use self::store::BindingStore;

pub use self::store::Binding;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclareError {
    #[error("Cannot declare an empty identifier.")]
    EmptyIdent,
    #[error("`{ident}` is already declared in this scope on line {line}.")]
    Redeclared {
        ident: SmolStr,
        /// The line of the existing declaration.
        line: u32,
    },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Cannot exit the outermost scope.")]
pub struct ScopeUnderflow;

/// The result of a successful declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declared {
    /// The depth of the scope the identifier was declared in.
    pub depth: usize,
    /// The binding from an enclosing scope that is hidden by this declaration, if any.
    pub shadows: Option<Binding>,
}

/// Symbol table for a single compilation unit.
///
/// A new table starts in the outermost scope (depth `0`), which can never be exited.
///
/// # Example
/// ```
/// use nametable::NameTable;
///
/// let mut table = NameTable::new();
/// table.declare("x", 1).unwrap();
/// table.enter_scope();
/// table.declare("x", 2).unwrap();
/// assert_eq!(table.find("x"), Some(2));
/// table.exit_scope().unwrap();
/// assert_eq!(table.find("x"), Some(1));
/// ```
///
/// The scope stack and binding store behind the table are not reachable from outside the crate:
/// ```compile_fail
/// use nametable::scope::Scopes;
/// ```
#[derive(Debug, Default)]
pub struct NameTable {
    scopes: Scopes,
}

impl NameTable {
    /// Create an empty table positioned in the outermost scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with room for at least `capacity` distinct identifiers before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scopes: Scopes::with_store(BindingStore::with_capacity(capacity)),
        }
    }

    /// Open a new scope nested in the current one.
    pub fn enter_scope(&mut self) {
        self.scopes.enter_scope();
    }

    /// Exit the current scope. All identifiers declared in it stop being visible.
    pub fn exit_scope(&mut self) -> Result<(), ScopeUnderflow> {
        self.scopes.exit_scope()
    }

    /// Declare `ident` on `line` in the current scope.
    ///
    /// Fails if `ident` is empty or already declared in the current scope. Shadowing an identifier
    /// from an enclosing scope succeeds and the shadowed binding is returned in [`Declared`].
    pub fn declare(&mut self, ident: &str, line: u32) -> Result<Declared, DeclareError> {
        self.scopes.declare(ident, line)
    }

    /// Returns the line of the innermost visible declaration of `ident`.
    pub fn find(&self, ident: &str) -> Option<u32> {
        self.scopes.find(ident)
    }

    /// Returns the innermost visible binding of `ident`.
    pub fn lookup(&self, ident: &str) -> Option<&Binding> {
        self.scopes.lookup(ident)
    }

    /// Whether `ident` is declared directly in the current scope, not only in an enclosing one.
    pub fn is_declared_in_current_scope(&self, ident: &str) -> bool {
        self.scopes.lookup_depth(ident) == Some(self.depth())
    }

    /// Depth of the current scope.
    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    /// Number of bindings in all open scopes.
    pub fn len(&self) -> usize {
        self.scopes.store().len()
    }

    /// Whether no open scope has any bindings.
    pub fn is_empty(&self) -> bool {
        self.scopes.store().is_empty()
    }

    /// Run `f` inside a fresh scope. The scope is exited once `f` returns.
    ///
    /// Every scope entered while `f` ran that is still open is exited too, even if `f` closed
    /// enclosing scopes before entering it.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.enter_scope();
        let frame = self.scopes.current_frame();
        let ret = f(self);
        while self.scopes.current_frame() >= frame {
            if self.exit_scope().is_err() {
                break;
            }
        }
        ret
    }
}
