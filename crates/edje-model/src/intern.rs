//! Append-only interned string pool.
//!
//! Every name in the model (part names, image paths, data keys, ...) is
//! interned so clones are refcount bumps and repeated names share storage.
//! Equality gets a pointer fast path; the slow path is a plain byte compare
//! so a `Name` built by a different interner (or by tests) still compares
//! correctly.

use ahash::AHashSet;
use std::fmt;
use std::sync::Arc;

/// Handle to an interned string.
#[derive(Clone)]
pub struct Name(Arc<str>);

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Name {}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl std::hash::Hash for Name {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl std::ops::Deref for Name {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Name {
    /// Uninterned constructor, handy in tests and decoders that re-intern
    /// later. Pool-produced handles stay preferable in hot paths.
    fn from(s: &str) -> Self {
        Name(Arc::from(s))
    }
}

/// The pool itself. Append-only: nothing is ever evicted during a run.
#[derive(Default)]
pub struct Interner {
    set: AHashSet<Arc<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(existing) = self.set.get(s) {
            return Name(existing.clone());
        }
        let arc: Arc<str> = Arc::from(s);
        self.set.insert(arc.clone());
        Name(arc)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_dedups_storage() {
        let mut pool = Interner::new();
        let a = pool.intern("background");
        let b = pool.intern("background");
        assert!(Arc::ptr_eq(&a.0, &b.0));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn cross_pool_equality_still_holds() {
        let mut pool = Interner::new();
        let a = pool.intern("clip");
        let b = Name::from("clip");
        assert_eq!(a, b);
        assert_ne!(a, Name::from("other"));
    }
}
