//! Bounded cache of circle marker styles.
//!
//! Point styling runs once per feature per frame, but the set of distinct
//! (radius, colour) pairs on screen is small. The cache is owned by the
//! caller and handed to [`StylePolicy::point_style`](crate::StylePolicy::point_style).

use crate::api::style::CircleStyle;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::trace;

pub struct StyleCache {
    inner: LruCache<String, Arc<CircleStyle>>,
}

impl StyleCache {
    /// Create a cache holding at most `capacity` styles (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: LruCache::new(cap),
        }
    }

    /// Returns the cached style for `key`, building and inserting it on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: &str, build: F) -> Arc<CircleStyle>
    where
        F: FnOnce() -> CircleStyle,
    {
        if let Some(style) = self.inner.get(key) {
            return Arc::clone(style);
        }

        let style = Arc::new(build());
        if let Some((evicted, _)) = self.inner.push(key.to_string(), Arc::clone(&style)) {
            trace!(key = %key, evicted = %evicted, "circle style evicted");
        }
        style
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.cap().get()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl Default for StyleCache {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::style::Stroke;
    use crate::util::color::Rgba;

    fn circle(radius: f64) -> CircleStyle {
        CircleStyle {
            radius,
            fill: Rgba::new(1, 2, 3, 1.0),
            stroke: Stroke::new(Rgba::BLACK, 1.0),
        }
    }

    #[test]
    fn test_hit_returns_same_style() {
        let mut cache = StyleCache::new(4);
        let a = cache.get_or_insert_with("5rgba(1, 2, 3, 1)", || circle(5.0));
        let b = cache.get_or_insert_with("5rgba(1, 2, 3, 1)", || circle(99.0));

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.radius, 5.0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction() {
        let mut cache = StyleCache::new(2);
        cache.get_or_insert_with("a", || circle(1.0));
        cache.get_or_insert_with("b", || circle(2.0));
        // Touch "a" so "b" is least recently used
        cache.get_or_insert_with("a", || circle(1.0));
        cache.get_or_insert_with("c", || circle(3.0));

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_is_one() {
        let mut cache = StyleCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.get_or_insert_with("a", || circle(1.0));
        cache.clear();
        assert!(cache.is_empty());
    }
}
