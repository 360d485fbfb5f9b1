//! Hash-indexed storage for bindings.

use std::collections::HashMap;

use smol_str::SmolStr;

/// A recorded declaration: `ident` was declared on `line` in the scope at `depth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub ident: SmolStr,
    pub line: u32,
    pub depth: usize,
}

/// Maps identifier text to every binding of that identifier that is still live.
///
/// The bindings of an identifier are kept in declaration order. The last one is therefore always
/// the innermost binding, so lookups never need to compare scope depths.
#[derive(Debug, Default)]
pub struct BindingStore {
    map: HashMap<SmolStr, Vec<Binding>>,
}

impl BindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with room for at least `capacity` distinct identifiers.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Append a new binding. Uniqueness within a scope is the caller's responsibility.
    pub fn insert(&mut self, ident: SmolStr, line: u32, depth: usize) {
        self.map.entry(ident.clone()).or_default().push(Binding {
            ident,
            line,
            depth,
        });
    }

    /// The most recently inserted binding for `ident`.
    pub fn lookup(&self, ident: &str) -> Option<&Binding> {
        self.map.get(ident).and_then(|bindings| bindings.last())
    }

    pub fn lookup_line(&self, ident: &str) -> Option<u32> {
        self.lookup(ident).map(|binding| binding.line)
    }

    pub fn lookup_depth(&self, ident: &str) -> Option<usize> {
        self.lookup(ident).map(|binding| binding.depth)
    }

    /// Remove the most recent binding of `ident` that was declared at `depth`. Returns `false` if
    /// there is no such binding.
    pub fn remove(&mut self, ident: &str, depth: usize) -> bool {
        let Some(bindings) = self.map.get_mut(ident) else {
            return false;
        };
        let Some(pos) = bindings.iter().rposition(|binding| binding.depth == depth) else {
            return false;
        };
        bindings.remove(pos);
        if bindings.is_empty() {
            self.map.remove(ident);
        }
        true
    }

    /// Total number of live bindings.
    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_most_recent() {
        let mut store = BindingStore::new();
        store.insert("x".into(), 1, 0);
        store.insert("x".into(), 4, 1);
        store.insert("y".into(), 2, 1);
        assert_eq!(store.lookup_line("x"), Some(4));
        assert_eq!(store.lookup_depth("x"), Some(1));
        assert_eq!(store.lookup_line("y"), Some(2));
        assert_eq!(store.lookup_line("z"), None);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn remove_matches_depth() {
        let mut store = BindingStore::new();
        store.insert("x".into(), 1, 0);
        store.insert("x".into(), 4, 2);

        assert!(!store.remove("x", 1));
        assert!(!store.remove("y", 0));
        assert_eq!(store.len(), 2);

        assert!(store.remove("x", 2));
        assert_eq!(store.lookup_line("x"), Some(1));
        assert!(store.remove("x", 0));
        assert_eq!(store.lookup("x"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn remove_only_one_binding() {
        let mut store = BindingStore::with_capacity(16);
        store.insert("x".into(), 1, 3);
        store.insert("x".into(), 2, 3);
        assert!(store.remove("x", 3));
        assert_eq!(store.lookup_line("x"), Some(1));
        assert_eq!(store.len(), 1);
    }
}
