use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

/// Startup configuration read from `app.env`.
///
/// Keys absent from the source leave their field empty. Nothing here checks
/// that a value is well-formed.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    #[serde(rename = "SERVER_ADDRESS", deserialize_with = "string_like")]
    pub server_address: String,
    #[serde(rename = "SECRET_KEY", deserialize_with = "string_like")]
    pub secret_key: String,
    #[serde(rename = "DB_DRIVER", deserialize_with = "string_like")]
    pub db_driver: String,
    #[serde(rename = "DB_SOURCE", deserialize_with = "string_like")]
    pub db_source: String,
}

impl EnvConfig {
    /// Keys recognized in a configuration source, in report order.
    pub const KEYS: [&'static str; 4] =
        ["SERVER_ADDRESS", "SECRET_KEY", "DB_DRIVER", "DB_SOURCE"];

    pub fn is_known_key(key: &str) -> bool {
        Self::KEYS.contains(&key)
    }
}

// Keep the secret out of `{:?}` so the struct can sit in log fields.
impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.secret_key.is_empty() {
            ""
        } else {
            "<redacted>"
        };

        f.debug_struct("EnvConfig")
            .field("server_address", &self.server_address)
            .field("secret_key", &secret)
            .field("db_driver", &self.db_driver)
            .field("db_source", &self.db_source)
            .finish()
    }
}

/// Accept any scalar and keep its textual form. `null` reads as empty.
fn string_like<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringLike;

    impl<'de> Visitor<'de> for StringLike {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(StringLike)
}
