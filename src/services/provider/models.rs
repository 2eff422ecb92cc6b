//! Typed responses from the stats provider. External data is validated
//! here so the rest of the server never inspects raw JSON shapes.

use crate::utils::types::{HeroID, MatchID};
use log::warn;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Hero details from the `heroes` resource
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderHero {
    pub id: HeroID,
    pub name: String,
    pub localized_name: String,
    pub primary_attr: Option<String>,
    pub attack_type: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Matchup statistics from the `heroes/{id}/matchups` resource
///
/// # Structure
///
/// ```json
/// {
///   "hero_id": 3,
///   "games_played": 100,
///   "wins": 60
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeroMatchup {
    /// The opposing hero
    pub hero_id: HeroID,
    pub games_played: u64,
    /// Number of games won against [HeroMatchup::hero_id]
    pub wins: u64,
}

/// Raw match record from the `matches/{id}` resource, only the
/// fields used for analysis are kept
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMatch {
    pub match_id: Option<MatchID>,
    pub radiant_win: Option<bool>,
    /// Duration of the match in seconds
    pub duration: Option<i64>,
    /// Players ordered by position, radiant first
    #[serde(default, deserialize_with = "positional_list")]
    pub players: Vec<RawPlayer>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub objectives: Vec<RawObjective>,
}

/// Player in a match, fields with an unexpected type are treated as
/// missing so a single bad field doesn't lose the player
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayer {
    #[serde(default, deserialize_with = "lenient")]
    pub player_slot: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub hero_id: Option<HeroID>,
    #[serde(default, deserialize_with = "lenient")]
    pub kills: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub deaths: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub assists: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub gold_per_min: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub xp_per_min: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub hero_damage: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub tower_damage: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub hero_healing: Option<i64>,
}

/// Timestamped event such as a tower kill or roshan
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawObjective {
    pub time: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub slot: Option<i64>,
    pub team: Option<i64>,
    pub unit: Option<String>,
    /// The provider uses both numbers and strings for keys
    pub key: Option<Value>,
}

/// Deserializes a list where the list itself or any of its entries may
/// have an unexpected shape. Anything other than a list (or null) becomes
/// an empty list and entries that don't match `T` are skipped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = list_entries(Value::deserialize(deserializer)?)
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("Skipping unreadable entry from stats provider: {}", err);
                None
            }
        })
        .collect();

    Ok(values)
}

/// Deserializes a list where entry positions are meaningful. Like
/// [lenient_list] but entries that don't match `T` are replaced with
/// the default value instead of being skipped
fn positional_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let values = list_entries(Value::deserialize(deserializer)?)
        .into_iter()
        .map(|entry| match serde_json::from_value(entry) {
            Ok(value) => value,
            Err(err) => {
                warn!("Replacing unreadable entry from stats provider: {}", err);
                T::default()
            }
        })
        .collect();

    Ok(values)
}

/// Entries of a list value, anything other than a list is empty
fn list_entries(value: Value) -> Vec<Value> {
    match value {
        Value::Array(entries) => entries,
        Value::Null => Vec::new(),
        other => {
            warn!("Unexpected list type from stats provider: {}", type_name(&other));
            Vec::new()
        }
    }
}

/// Deserializes an optional field which is [None] when the value
/// doesn't match `T`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
