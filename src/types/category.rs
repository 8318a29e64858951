//! Package categories
//!
//! The service tags each package with one of a fixed set of categories.
//! Names are looked up in a sorted table; the id sent on the wire is only
//! ever taken from that table or the unspecified sentinel.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A (name, id) pair from the category table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub id: &'static str,
}

/// Known categories, sorted by name
pub const CATEGORIES: &[Category] = &[
    Category { name: "daemons", id: "2" },
    Category { name: "devel", id: "3" },
    Category { name: "editors", id: "4" },
    Category { name: "emulators", id: "5" },
    Category { name: "fonts", id: "20" },
    Category { name: "games", id: "6" },
    Category { name: "gnome", id: "7" },
    Category { name: "i18n", id: "8" },
    Category { name: "kde", id: "9" },
    Category { name: "kernels", id: "19" },
    Category { name: "lib", id: "10" },
    Category { name: "modules", id: "11" },
    Category { name: "multimedia", id: "12" },
    Category { name: "network", id: "13" },
    Category { name: "office", id: "14" },
    Category { name: "science", id: "15" },
    Category { name: "system", id: "16" },
    Category { name: "x11", id: "17" },
    Category { name: "xfce", id: "18" },
];

/// Id the service reads as "keep the current category, or None for new
/// packages"
pub const UNSPECIFIED_ID: &str = "1";

/// Category id that is guaranteed to be valid for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryId(&'static str);

impl CategoryId {
    /// The unspecified sentinel
    pub const fn unspecified() -> Self {
        Self(UNSPECIFIED_ID)
    }

    /// Look up a category by name
    pub fn from_name(name: &str) -> Result<Self> {
        CATEGORIES
            .binary_search_by(|c| c.name.cmp(name))
            .map(|idx| Self(CATEGORIES[idx].id))
            .map_err(|_| Error::InvalidCategory(name.to_string()))
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn is_unspecified(&self) -> bool {
        self.0 == UNSPECIFIED_ID
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::unspecified()
    }
}

impl FromStr for CategoryId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Names of all valid categories, in table order
pub fn category_names() -> impl Iterator<Item = &'static str> {
    CATEGORIES.iter().map(|c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_table_is_sorted() {
        assert!(CATEGORIES.windows(2).all(|w| w[0].name < w[1].name));
    }

    #[test]
    fn test_ids_are_unique_and_not_sentinel() {
        let mut ids: Vec<_> = CATEGORIES.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), CATEGORIES.len());
        assert!(!ids.contains(&UNSPECIFIED_ID));
    }

    #[rstest]
    #[case("daemons", "2")]
    #[case("fonts", "20")]
    #[case("kernels", "19")]
    #[case("network", "13")]
    #[case("xfce", "18")]
    fn test_lookup(#[case] name: &str, #[case] id: &str) {
        assert_eq!(CategoryId::from_name(name).unwrap().as_str(), id);
    }

    #[rstest]
    #[case("")]
    #[case("Network")]
    #[case("none")]
    #[case("help")]
    fn test_lookup_rejects_unknown(#[case] name: &str) {
        let err = CategoryId::from_name(name).unwrap_err();
        assert!(matches!(err, Error::InvalidCategory(ref n) if n == name));
    }

    #[test]
    fn test_default_is_unspecified() {
        let id = CategoryId::default();
        assert!(id.is_unspecified());
        assert_eq!(id.to_string(), "1");
    }

    #[test]
    fn test_from_str() {
        let id: CategoryId = "lib".parse().unwrap();
        assert_eq!(id.as_str(), "10");
    }
}
