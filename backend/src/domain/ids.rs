//! Integer identifiers assigned by storage.
//!
//! Each entity gets its own newtype so a recipe id can never be passed where a
//! category id is expected.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a storage-assigned identifier.
            #[must_use]
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Raw integer value.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id! {
    /// Identifier of a [`crate::domain::Role`].
    RoleId
}

entity_id! {
    /// Identifier of a [`crate::domain::User`].
    UserId
}

entity_id! {
    /// Identifier of a [`crate::domain::Category`].
    CategoryId
}

entity_id! {
    /// Identifier of a [`crate::domain::Recipe`].
    RecipeId
}
