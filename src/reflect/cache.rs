//! Process-wide cache of discovered property names.
//!
//! Entries are keyed on the identity of a [`ReflectType`] and hold only a weak reference to it,
//! so caching never keeps an unregistered type alive. An entry whose type has been dropped is
//! dead: it can never be hit again, since the weak reference pins the address of the type, and
//! it is purged on the next insert.
//!
//! Lookup and insert happen under one lock, so two threads asking for the same type compute its
//! property names only once.

use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex, OnceLock, Weak},
};

use tracing::{debug, trace};

use crate::{
    metadata::typesystem::{ReflectType, TypeRc},
    Result,
};

/// An immutable, shared set of property names
pub type PropertyNames = Arc<BTreeSet<String>>;

struct CacheEntry {
    key: Weak<ReflectType>,
    names: PropertyNames,
}

impl CacheEntry {
    fn is_live(&self) -> bool {
        self.key.strong_count() > 0
    }
}

/// Weak-keyed cache mapping types to their property names
#[derive(Default)]
pub struct PropertyCache {
    entries: Mutex<HashMap<usize, CacheEntry>>,
}

impl PropertyCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        PropertyCache::default()
    }

    /// The cache shared by every [`crate::Reflector`] that was not given its own
    pub fn global() -> Arc<PropertyCache> {
        static GLOBAL: OnceLock<Arc<PropertyCache>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(PropertyCache::new()))
            .clone()
    }

    fn key(ty: &TypeRc) -> usize {
        Arc::as_ptr(ty) as usize
    }

    /// The cached property names of `ty`, computing and storing them with `compute` on a miss.
    ///
    /// `compute` runs while the cache is locked and must not call back into this cache. A failed
    /// computation is not cached.
    ///
    /// # Errors
    /// Returns the error of `compute`, or [`crate::Error::LockError`] if the cache lock is
    /// poisoned
    pub fn get_or_compute<F>(&self, ty: &TypeRc, compute: F) -> Result<PropertyNames>
    where
        F: FnOnce(&TypeRc) -> Result<BTreeSet<String>>,
    {
        let mut entries = lock!(self.entries);
        let key = Self::key(ty);

        if let Some(entry) = entries.get(&key) {
            if entry.is_live() {
                trace!(fullname = %ty.fullname(), "property cache hit");
                return Ok(entry.names.clone());
            }
        }

        debug!(fullname = %ty.fullname(), "property cache miss");
        let names = Arc::new(compute(ty)?);

        let before = entries.len();
        entries.retain(|_, entry| entry.is_live());
        let purged = before - entries.len();
        if purged > 0 {
            trace!(purged, "purged property cache entries of dropped types");
        }

        entries.insert(
            key,
            CacheEntry {
                key: Arc::downgrade(ty),
                names: names.clone(),
            },
        );
        Ok(names)
    }

    /// The cached property names of `ty`, without computing them
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the cache lock is poisoned
    pub fn get(&self, ty: &TypeRc) -> Result<Option<PropertyNames>> {
        let entries = lock!(self.entries);
        Ok(entries
            .get(&Self::key(ty))
            .filter(|entry| entry.is_live())
            .map(|entry| entry.names.clone()))
    }

    /// Remove the entry of `ty`. Returns `true` if there was one
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the cache lock is poisoned
    pub fn evict(&self, ty: &TypeRc) -> Result<bool> {
        let mut entries = lock!(self.entries);
        Ok(entries.remove(&Self::key(ty)).is_some())
    }

    /// Remove the entries of all dropped types. Returns the number of removed entries
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the cache lock is poisoned
    pub fn purge(&self) -> Result<usize> {
        let mut entries = lock!(self.entries);
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live());
        Ok(before - entries.len())
    }

    /// Number of stored entries, including entries of dropped types not yet purged
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the cache lock is poisoned
    pub fn len(&self) -> Result<usize> {
        Ok(lock!(self.entries).len())
    }

    /// Returns `true` if no entries are stored
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the cache lock is poisoned
    pub fn is_empty(&self) -> Result<bool> {
        Ok(lock!(self.entries).is_empty())
    }

    /// Remove all entries
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the cache lock is poisoned
    pub fn clear(&self) -> Result<()> {
        lock!(self.entries).clear();
        Ok(())
    }
}
