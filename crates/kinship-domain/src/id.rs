//! Identifier types for members, families and relationships
//!
//! All identifiers are UUIDv7 values stored as `u128`. UUIDv7 gives:
//! - Chronological sortability (older records sort first)
//! - 128-bit uniqueness without coordination
//! - A total numeric order, which path finding relies on for tie-breaking

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Create an identifier from a raw u128 value
            ///
            /// This is primarily for storage layer deserialization and tests.
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an identifier from a hyphenated UUID string
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s)
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid {} string: {}", stringify!($name), e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a family member
    ///
    /// # Examples
    ///
    /// ```
    /// use kinship_domain::MemberId;
    ///
    /// let id = MemberId::new();
    /// let parsed: MemberId = id.to_string().parse().unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    MemberId
);

define_id!(
    /// Unique identifier for a family (the unit a relationship graph is scoped to)
    FamilyId
);

define_id!(
    /// Unique identifier for a persisted relationship row
    RelationshipId
);


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Ordering of ids matches ordering of the underlying values
        #[test]
        fn test_id_ordering_property(a: u128, b: u128) {
            let id_a = MemberId::from_value(a);
            let id_b = MemberId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        #[test]
        fn test_id_string_roundtrip(value: u128) {
            let id = MemberId::from_value(value);

            match MemberId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }
    }
}
