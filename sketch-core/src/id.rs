//! Identifier newtypes for project entities.
//!
//! Fresh identifiers are v4 UUIDs. Identifiers read back from storage or an
//! imported file are kept verbatim, so any non-empty string is a valid id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new unique identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wrap an existing identifier string.
            #[must_use]
            pub fn from_string(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Unique identifier for an element placed on a screen.
    ElementId
);

string_id!(
    /// Unique identifier for a screen.
    ScreenId
);

string_id!(
    /// Unique identifier for a navigation arrow between screens.
    ArrowId
);

string_id!(
    /// Unique identifier for a saved version snapshot.
    VersionId
);

string_id!(
    /// Unique identifier for a project.
    ProjectId
);
