use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifiers are opaque strings ("m1", "potion_3f2a", ...).
/// The client never mints them, it only compares and echoes them back.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ItemId);
define_id!(MonsterId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = MonsterId::new("m1");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"m1\"");

        let back: ItemId = serde_json::from_str("\"item123\"").expect("deserialize");
        assert_eq!(back.as_str(), "item123");
        assert_eq!(back.to_string(), "item123");
    }
}
