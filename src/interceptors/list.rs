//! The ordered, mutable interceptor list each client/dispatch consults
//! (§4.1). A freshly constructed list always carries the built-in
//! content-type interceptor at index 0; `clear` restores it unless asked
//! not to, and `remove_builtin` is the only way to drop it without
//! restoring it.

use std::sync::Arc;

use super::content_type::ContentTypeInterceptor;
use super::interceptor::Interceptor;

/// An ordered collection of interceptors. Shared (`Arc`-wrapped per entry)
/// so the dispatcher can snapshot it cheaply for the duration of one
/// dispatch; concurrent dispatches never observe a half-mutated list (§5).
#[derive(Clone)]
pub struct InterceptorList {
    entries: Vec<Arc<dyn Interceptor>>,
}

fn is_builtin(entry: &Arc<dyn Interceptor>) -> bool {
    entry.name() == "content-type"
}

impl InterceptorList {
    /// A new list with only the built-in content-type interceptor at
    /// index 0.
    pub fn new() -> Self {
        Self { entries: vec![Arc::new(ContentTypeInterceptor::new())] }
    }

    /// A list with no interceptors at all, not even the built-in.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn push(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.entries.push(interceptor);
    }

    /// Alias for [`push`](Self::push) — the "append" operation from §4.1.
    pub fn append(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.push(interceptor);
    }

    pub fn insert(&mut self, index: usize, interceptor: Arc<dyn Interceptor>) {
        self.entries.insert(index, interceptor);
    }

    /// Read the interceptor at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Arc<dyn Interceptor>> {
        self.entries.get(index)
    }

    /// Replace the interceptor at `index`. Assigning over slot 0 replaces
    /// the built-in — it is not sticky (§4.1).
    pub fn set(&mut self, index: usize, interceptor: Arc<dyn Interceptor>) -> Option<Arc<dyn Interceptor>> {
        if index >= self.entries.len() {
            return None;
        }
        Some(std::mem::replace(&mut self.entries[index], interceptor))
    }

    /// Removes and returns the interceptor at `index`, or `None` if out of
    /// range.
    pub fn remove(&mut self, index: usize) -> Option<Arc<dyn Interceptor>> {
        if index >= self.entries.len() {
            return None;
        }
        Some(self.entries.remove(index))
    }

    /// Removes the first interceptor pointer-equal to `target`, returning
    /// whether one was found. Identity (`Arc::ptr_eq`), not structural
    /// equality — interceptors don't implement `PartialEq`.
    pub fn remove_by_value(&mut self, target: &Arc<dyn Interceptor>) -> bool {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|entry| Arc::ptr_eq(entry, target))
        {
            self.entries.remove(pos);
            true
        } else {
            false
        }
    }

    /// Removes every interceptor for which `predicate` returns `true`.
    /// Returns the number removed.
    pub fn remove_by_predicate<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Arc<dyn Interceptor>) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|entry| !predicate(entry));
        before - self.entries.len()
    }

    /// Drops every interceptor. If `keep_builtin` is true, a fresh built-in
    /// content-type interceptor is re-inserted at index 0 regardless of
    /// whether this list carried one before clearing — `clear(true)` always
    /// resets to the default construction state (§4.1, testable property 4).
    pub fn clear(&mut self, keep_builtin: bool) {
        self.entries.clear();
        if keep_builtin {
            self.entries.push(Arc::new(ContentTypeInterceptor::new()));
        }
    }

    /// Explicitly drops every instance of the built-in content-type
    /// interceptor, without touching anything else in the list.
    pub fn remove_builtin(&mut self) {
        self.entries.retain(|entry| !is_builtin(entry));
    }

    /// Whether this list currently carries a built-in content-type
    /// interceptor anywhere in it.
    pub fn has_builtin(&self) -> bool {
        self.entries.iter().any(is_builtin)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Interceptor>> {
        self.entries.iter()
    }
}

impl Default for InterceptorList {
    fn default() -> Self {
        Self::new()
    }
}
