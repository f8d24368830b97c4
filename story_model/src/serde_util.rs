//! Deserialization helpers for authored case files.
//!
//! Case files exported from the editor write `""` for unset strings and may
//! write `null` for unset arrays. Both are normalized here.

use serde::{Deserialize, Deserializer};

/// `null` or a missing value becomes `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null`, a missing value, or an empty string becomes `None`.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.is_empty()).map(T::from))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        #[serde(default, deserialize_with = "super::null_as_default")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "super::blank_as_none")]
        label: Option<String>,
    }

    #[test]
    fn test_null_array_is_empty() {
        let parsed: Wrapper = serde_json::from_str(r#"{"items":null,"label":"x"}"#).unwrap();
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.label.as_deref(), Some("x"));
    }

    #[test]
    fn test_blank_string_is_none() {
        let parsed: Wrapper = serde_json::from_str(r#"{"label":""}"#).unwrap();
        assert!(parsed.label.is_none());

        let missing: Wrapper = serde_json::from_str("{}").unwrap();
        assert!(missing.label.is_none());
        assert!(missing.items.is_empty());
    }
}
