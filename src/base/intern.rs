//! Interning for module names.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;

/// An interned module name such as `com.foo.bar`.
///
/// Comparing two `Name`s is a u32 comparison, which keeps the module index
/// keyed on something cheap to hash.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Name(u32);

impl Name {
    #[inline]
    pub(crate) const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

/// Thread-safe string interner.
#[derive(Default)]
pub struct Interner {
    map: RwLock<FxHashMap<SmolStr, u32>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning the existing `Name` if it was seen before.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(name) = self.get_existing(s) {
            return name;
        }

        let mut map = self.map.write();
        // Another writer may have won the race between the two locks.
        if let Some(&index) = map.get(s) {
            return Name::from_raw(index);
        }

        let index = map.len() as u32;
        map.insert(SmolStr::new(s), index);
        Name::from_raw(index)
    }

    /// Look up a string without interning it.
    ///
    /// Queries use this so that looking up an unknown module name does not
    /// grow the table.
    pub fn get_existing(&self, s: &str) -> Option<Name> {
        self.map.read().get(s).copied().map(Name::from_raw)
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner")
            .field("count", &self.len())
            .finish()
    }
}
