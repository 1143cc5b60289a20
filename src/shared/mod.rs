//! Shared newtypes and utilities used across all domain modules.
//!
//! The id newtypes are serialization-transparent: they serialize as the
//! plain JSON numbers the backend sends, and also accept numeric strings
//! because a few endpoints echo ids back as text.

pub mod money;
pub mod serde_util;
pub mod validation;

pub use money::{format_price, round_cents};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> i64 {
                self.0
            }

            /// Backend ids start at 1; zero and negatives mean "absent".
            pub const fn is_valid(self) -> bool {
                self.0 > 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_i64(self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                serde_util::number_or_string(deserializer).map(Self)
            }
        }
    };
}

// ─── Ids ─────────────────────────────────────────────────────────────────────

id_newtype!(
    /// Catalog product id.
    ProductId
);

id_newtype!(
    /// Customer (user) id.
    CustomerId
);

id_newtype!(
    /// Server-assigned order id.
    OrderId
);
