//! Serde helpers for reading lesson documents written by older editors

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Accept ids stored either as strings or as bare numbers
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(StringOrNumber::into_string)
}

/// Optional variant of [`deserialize_id`]; `null` maps to `None`
pub fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(StringOrNumber::into_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
        #[serde(default, deserialize_with = "deserialize_opt_id")]
        parent: Option<String>,
    }

    #[test]
    fn test_numeric_id_becomes_string() {
        let h: Holder = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(h.id, "42");
        assert!(h.parent.is_none());
    }

    #[test]
    fn test_string_id_kept() {
        let h: Holder = serde_json::from_str(r#"{"id": "tile-a", "parent": 7}"#).unwrap();
        assert_eq!(h.id, "tile-a");
        assert_eq!(h.parent.as_deref(), Some("7"));
    }
}
