//! Ordered handler collection
//!
//! Resolvers, tree processors and output processors are kept in a [`HandlerList`].
//! Handlers run highest priority first; handlers with equal priority keep their
//! registration order.

#[derive(Debug, Clone)]
pub struct HandlerList<T> {
    entries: Vec<(i32, T)>,
}

impl<T> HandlerList<T> {
    pub fn new() -> Self {
        HandlerList {
            entries: Vec::new(),
        }
    }

    /// Register `handler` with the given priority
    pub fn add(&mut self, handler: T, priority: i32) {
        let index = self
            .entries
            .iter()
            .position(|(p, _)| *p < priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, (priority, handler));
    }

    /// Remove every handler for which `predicate` returns `true`
    pub fn remove_where(&mut self, predicate: impl Fn(&T) -> bool) {
        self.entries.retain(|(_, h)| !predicate(h));
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, h)| h)
    }

    /// Run handlers in order and return the first non-`None` answer
    pub fn first_match<R>(&self, mut f: impl FnMut(&T) -> Option<R>) -> Option<R> {
        self.iter().find_map(|h| f(h))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for HandlerList<T> {
    fn default() -> Self {
        Self::new()
    }
}
