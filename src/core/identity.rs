//! ULID-backed identifiers for shipments and their child records

use serde::{Deserialize, Serialize};
use ulid::Ulid;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Ulid);

        impl $name {
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ulid::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

id_newtype!(
    /// Identifier of a shipment.
    ShipmentId
);
id_newtype!(
    /// Identifier of an uploaded document.
    DocumentId
);
id_newtype!(
    /// Identifier of an expense line.
    ExpenseId
);
id_newtype!(
    /// Identifier of a user (actor on timeline events).
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse_roundtrip() {
        let id = ShipmentId::new();
        let parsed: ShipmentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(ShipmentId::new(), ShipmentId::new());
    }
}
