use core::fmt;

use serde::{de, Deserialize, Deserializer};

use super::types::SimStatus;

impl<'de> Deserialize<'de> for SimStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CodeVisitor;

        impl<'de> de::Visitor<'de> for CodeVisitor {
            type Value = SimStatus;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a SIM status code")
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(core::str::from_utf8(value).map_or(SimStatus::Unknown, SimStatus::from_code))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(SimStatus::from_code(value))
            }
        }

        deserializer.deserialize_bytes(CodeVisitor)
    }
}
