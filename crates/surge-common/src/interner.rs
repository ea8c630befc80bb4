//! String interning for identifier deduplication.
//!
//! The interner assigns stable small integer ids to strings so that name
//! comparisons during resolution are integer comparisons. It is the only
//! shared mutable resource in the front end: parser workers and resolver
//! passes may intern concurrently, so all operations take `&self`.
//!
//! Id 0 is reserved: it maps to the empty string and doubles as the "no
//! name" sentinel (`StringId::NONE`).

use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Opaque handle to an interned string.
///
/// Two ids are equal iff the underlying strings are byte-equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StringId(pub u32);

impl StringId {
    /// The reserved "no name" id. Maps to the empty string.
    pub const NONE: StringId = StringId(0);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }
}

#[derive(Default)]
struct InternerInner {
    strings: Vec<Arc<str>>,
    index: FxHashMap<Arc<str>, StringId>,
}

/// Thread-safe append-only string interner.
///
/// Reads take the read lock; `intern` takes the read lock first and only
/// upgrades to the write lock for unseen strings, re-checking under the
/// write lock so concurrent interns of the same string return the same id
/// exactly once. Entries live as long as the interner; ids are never
/// recycled.
pub struct Interner {
    inner: RwLock<InternerInner>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        let empty: Arc<str> = Arc::from("");
        let mut index = FxHashMap::default();
        index.insert(Arc::clone(&empty), StringId::NONE);
        Self {
            inner: RwLock::new(InternerInner {
                strings: vec![empty],
                index,
            }),
        }
    }

    /// Intern a string, returning its stable id.
    ///
    /// The interner stores an owned copy independent of the caller's buffer.
    pub fn intern(&self, s: &str) -> StringId {
        // Fast path: most identifiers repeat.
        {
            let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
            if let Some(&id) = inner.index.get(s) {
                return id;
            }
        }
        // Copy before taking the write lock.
        let owned: Arc<str> = Arc::from(s);
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        // Double check: another thread may have interned it meanwhile.
        if let Some(&id) = inner.index.get(s) {
            return id;
        }
        let id = StringId(
            u32::try_from(inner.strings.len()).unwrap_or_else(|_| panic!("interner id space exhausted")),
        );
        inner.strings.push(Arc::clone(&owned));
        inner.index.insert(owned, id);
        id
    }

    /// Intern a byte string. Non-UTF-8 input is replaced lossily; source
    /// identifiers are always valid UTF-8.
    pub fn intern_bytes(&self, bytes: &[u8]) -> StringId {
        match std::str::from_utf8(bytes) {
            Ok(s) => self.intern(s),
            Err(_) => self.intern(&String::from_utf8_lossy(bytes)),
        }
    }

    /// Look up an interned string by id.
    #[must_use]
    pub fn lookup(&self, id: StringId) -> Option<Arc<str>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.strings.get(id.0 as usize).cloned()
    }

    /// Look up a string that is known to be interned.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this interner.
    #[must_use]
    pub fn must_lookup(&self, id: StringId) -> Arc<str> {
        self.lookup(id)
            .unwrap_or_else(|| panic!("unknown StringId({})", id.0))
    }

    /// Whether `id` is known to this interner.
    #[must_use]
    pub fn has(&self, id: StringId) -> bool {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        (id.0 as usize) < inner.strings.len()
    }

    /// Number of interned strings, including the reserved empty string.
    #[must_use]
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false // id 0 is always present
    }

    /// Copy out all interned strings in id order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.strings.iter().map(|s| s.to_string()).collect()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Interner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc as StdArc;
    use std::thread;

    #[test]
    fn id_zero_is_empty_string() {
        let interner = Interner::new();
        assert_eq!(interner.intern(""), StringId::NONE);
        assert_eq!(&*interner.must_lookup(StringId::NONE), "");
    }

    #[test]
    fn intern_is_idempotent() {
        let interner = Interner::new();
        let a = interner.intern("compute");
        let b = interner.intern("compute");
        let c = interner.intern_bytes(b"compute");
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_ne!(a, interner.intern("Compute"));
    }

    #[test]
    fn round_trip_law() {
        let interner = Interner::new();
        for s in ["", "x", "foo", "\u{1F600}", "a b c"] {
            let id = interner.intern(s);
            assert!(interner.has(id));
            assert_eq!(interner.intern(&interner.must_lookup(id)), id);
        }
        assert!(!interner.has(StringId(999)));
    }

    #[test]
    fn concurrent_intern_returns_one_id() {
        let interner = StdArc::new(Interner::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let interner = StdArc::clone(&interner);
                thread::spawn(move || {
                    (0..200)
                        .map(|i| interner.intern(&format!("sym{}", i % 50)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let results: Vec<Vec<StringId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for per_thread in &results[1..] {
            assert_eq!(per_thread, &results[0]);
        }
        // 50 distinct names + the reserved empty string
        assert_eq!(interner.len(), 51);
    }

    #[test]
    fn snapshot_is_in_id_order() {
        let interner = Interner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let snap = interner.snapshot();
        assert_eq!(snap[0], "");
        assert_eq!(snap[a.0 as usize], "a");
        assert_eq!(snap[b.0 as usize], "b");
    }
}
