//! Interned PDF names.
//!
//! A name is case sensitive and written with a preceding slash
//! (e.g. /Type). Names are used as dictionary keys and as values.
//! A name is the byte sequence left after `#xx` escapes are decoded;
//! it need not be UTF-8. Equality, hashing and ordering depend only on
//! those bytes, so a name built with [`Name::new`] is interchangeable
//! with one taken from a [`NamePool`].

use rustc_hash::FxHashSet;
use std::borrow::{Borrow, Cow};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// A PDF name object.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Arc<[u8]>);

impl Name {
    /// Create a name that is not backed by any pool.
    pub fn new(name: impl AsRef<[u8]>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The decoded bytes (without the leading slash).
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The name as text, if its bytes are valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// The name as text, with invalid UTF-8 replaced by U+FFFD.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Returns true if both names share the same interned allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Name")
            .field(&self.to_string_lossy())
            .finish()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.to_string_lossy())
    }
}

impl Borrow<[u8]> for Name {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Name {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&[u8]> for Name {
    fn from(name: &[u8]) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        *self.0 == *other.as_bytes()
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        *self.0 == *other.as_bytes()
    }
}

/// Session-scoped interning table for names.
///
/// Entries are never evicted; the pool lives as long as the parse
/// session that owns it. Access is internally synchronized so one pool
/// may be shared by tokenizers on different threads.
#[derive(Debug, Default)]
pub struct NamePool {
    names: Mutex<FxHashSet<Arc<[u8]>>>,
}

impl NamePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the pooled name for `name`, inserting it on first use.
    pub fn intern(&self, name: impl AsRef<[u8]>) -> Name {
        let name = name.as_ref();
        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = names.get(name) {
            return Name(Arc::clone(existing));
        }
        let entry: Arc<[u8]> = Arc::from(name);
        names.insert(Arc::clone(&entry));
        Name(entry)
    }

    /// Check whether `name` has been interned.
    pub fn contains(&self, name: impl AsRef<[u8]>) -> bool {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name.as_ref())
    }

    /// Number of distinct names in the pool.
    pub fn len(&self) -> usize {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
