//! Resource sets used as cache keys.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// An immutable, unordered set of resource locations.
///
/// Two sets are equal when they contain the same locations; insertion order
/// and duplicates are irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceSet {
    locations: BTreeSet<PathBuf>,
}

impl ResourceSet {
    /// Creates an empty resource set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of distinct locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns true if the set has no locations.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Checks whether `location` is part of this set.
    pub fn contains(&self, location: impl AsRef<Path>) -> bool {
        self.locations.contains(location.as_ref())
    }

    /// Returns true if every location of `other` is also in `self`.
    pub fn is_superset(&self, other: &ResourceSet) -> bool {
        self.locations.is_superset(&other.locations)
    }

    /// Returns true if every location of `self` is also in `other`.
    pub fn is_subset(&self, other: &ResourceSet) -> bool {
        self.locations.is_subset(&other.locations)
    }

    /// Iterates over the locations in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.locations.iter().map(PathBuf::as_path)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            locations: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResourceSet {
    type Item = &'a PathBuf;
    type IntoIter = std::collections::btree_set::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

impl fmt::Display for ResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, location) in self.locations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", location.display())?;
        }
        Ok(())
    }
}
