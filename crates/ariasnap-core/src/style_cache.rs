//! Computed-style cache scoped to one tree walk.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use ariasnap_protocols::{ComputedStyle, DomError, DomView, NodeId};

/// Caches computed style snapshots while at least one [`CacheScope`] is alive.
///
/// The cache belongs to a single capture and is handed down the walk
/// explicitly. Nested callers open their own scope on the same cache and share
/// its entries; the entries are dropped when the outermost scope ends, so
/// nothing survives into a later capture where the DOM may have changed.
#[derive(Debug, Default)]
pub struct StyleCache {
    styles: RefCell<Option<HashMap<NodeId, Option<Rc<ComputedStyle>>>>>,
    depth: Cell<usize>,
}

/// Keeps a [`StyleCache`] populated until dropped.
#[must_use = "the cache is cleared as soon as the scope is dropped"]
pub struct CacheScope<'a> {
    cache: &'a StyleCache,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or join) a caching scope.
    pub fn begin(&self) -> CacheScope<'_> {
        self.depth.set(self.depth.get() + 1);
        self.styles.borrow_mut().get_or_insert_with(HashMap::new);
        CacheScope { cache: self }
    }

    pub fn is_active(&self) -> bool {
        self.depth.get() > 0
    }

    pub fn len(&self) -> usize {
        self.styles.borrow().as_ref().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Computed style of `element`, served from the cache while a scope is open.
    pub fn style(
        &self,
        dom: &dyn DomView,
        element: NodeId,
    ) -> Result<Option<Rc<ComputedStyle>>, DomError> {
        if let Some(cached) = self
            .styles
            .borrow()
            .as_ref()
            .and_then(|styles| styles.get(&element))
        {
            return Ok(cached.clone());
        }

        let style = dom.computed_style(element)?.map(Rc::new);
        if let Some(styles) = self.styles.borrow_mut().as_mut() {
            styles.insert(element, style.clone());
        }
        Ok(style)
    }

    fn end(&self) {
        let depth = self.depth.get().saturating_sub(1);
        self.depth.set(depth);
        if depth == 0 {
            *self.styles.borrow_mut() = None;
        }
    }
}

impl Drop for CacheScope<'_> {
    fn drop(&mut self) {
        self.cache.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariasnap_host_static::StaticDocument;

    #[test]
    fn test_nested_scopes_share_and_clear() {
        let mut doc = StaticDocument::new(800.0, 600.0);
        let div = doc.append_element(doc.body(), "div");
        let cache = StyleCache::new();

        let outer = cache.begin();
        let inner = cache.begin();
        let first = cache.style(&doc, div).unwrap().unwrap();
        assert_eq!(cache.len(), 1);

        drop(inner);
        assert!(cache.is_active());
        assert_eq!(cache.len(), 1);
        let again = cache.style(&doc, div).unwrap().unwrap();
        assert!(Rc::ptr_eq(&first, &again));

        drop(outer);
        assert!(!cache.is_active());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_no_caching_outside_a_scope() {
        let mut doc = StaticDocument::new(800.0, 600.0);
        let div = doc.append_element(doc.body(), "div");
        let cache = StyleCache::new();

        assert!(cache.style(&doc, div).unwrap().is_some());
        assert!(cache.is_empty());
    }
}
