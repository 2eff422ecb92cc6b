use serde::{Deserialize, Deserializer};

/// Deserializer for optional request fields where an explicit `null`
/// must be told apart from a missing field. Used together with
/// `#[serde(default)]` so a missing field becomes [None] while `null`
/// becomes `Some(None)`
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
