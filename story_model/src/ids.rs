//! Identifiers for authored story content.
//!
//! Ids are plain authored strings. The newtypes keep clue, object and cluster
//! keys from being mixed up while still allowing lookups by `&str`.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! story_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an id string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Authored files may leave an id blank.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

story_id!(
    /// Unique key of a clue.
    ClueId
);

story_id!(
    /// Unique key of a world object (a piece of placed scenery or evidence).
    ObjectId
);

story_id!(
    /// Unique key of a clue cluster.
    ClusterId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashSet};

    #[test]
    fn test_lookup_by_str() {
        let mut set = HashSet::new();
        set.insert(ClueId::from("C1"));

        assert!(set.contains("C1"));
        assert!(!set.contains("C2"));

        let ordered: BTreeSet<ObjectId> = ["b", "a", "b"].into_iter().map(ObjectId::from).collect();
        assert_eq!(ordered.len(), 2);
        assert!(ordered.contains("a"));
    }

    #[test]
    fn test_serde_transparent() {
        let id: ClusterId = serde_json::from_str("\"K1\"").unwrap();
        assert_eq!(id, "K1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"K1\"");
    }

    #[test]
    fn test_display_and_empty() {
        assert_eq!(ClueId::new("C7").to_string(), "C7");
        assert!(ClueId::new("").is_empty());
    }
}
