#![allow(unused_macros)]

/// Helper macro for locking items, propagating a poisoned lock as [`crate::Error::LockError`]
///
/// ```rust, ignore
///  let mut entries = lock!(self.entries);
///  entries.insert(key, value);
/// ```
macro_rules! lock {
    ($lock:expr) => {
        $lock.lock().map_err(|_| crate::Error::LockError)?
    };
}
