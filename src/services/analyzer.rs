//! Analysis of raw match records into a draft summary, the key
//! moments of the match and per player performance metrics
use super::provider::{RawMatch, RawObjective, RawPlayer};
use crate::utils::types::HeroID;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of players on each team
const TEAM_SIZE: usize = 5;

/// Strategy for scoring a drafted team
pub trait DraftScorer: Send + Sync {
    /// Scores how well the heroes of a team work together
    fn synergy_score(&self, team: &[HeroID]) -> i64;

    /// Scores how well `team` counters the `opponents`
    fn counter_score(&self, team: &[HeroID], opponents: &[HeroID]) -> i64;
}

/// Stand-in scoring until a real draft scoring algorithm exists. Both
/// scores only depend on the size of the team.
pub struct PlaceholderScorer;

impl DraftScorer for PlaceholderScorer {
    fn synergy_score(&self, team: &[HeroID]) -> i64 {
        team.len() as i64 * 10
    }

    fn counter_score(&self, team: &[HeroID], _opponents: &[HeroID]) -> i64 {
        team.len() as i64 * 5
    }
}

/// Analysis blob that is stored alongside a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBlob {
    pub draft_analysis: DraftAnalysis,
    pub key_moments: Vec<KeyMoment>,
    pub performance_metrics: Vec<PlayerMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftAnalysis {
    pub radiant_heroes: Vec<HeroID>,
    pub dire_heroes: Vec<HeroID>,
    pub synergy_score: i64,
    pub counter_score: i64,
}

/// Normalized match objective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMoment {
    /// Game time of the event in seconds
    pub time: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub slot: i64,
    pub team: i64,
    pub unit: String,
    pub key: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMetrics {
    pub player_slot: Option<i64>,
    pub hero_id: Option<HeroID>,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    /// Gold per minute
    pub gpm: i64,
    /// Experience per minute
    pub xpm: i64,
    pub hero_damage: i64,
    pub tower_damage: i64,
    pub hero_healing: i64,
}

/// Produces [AnalysisBlob]s from raw matches using the
/// configured draft scorer
pub struct MatchAnalyzer {
    scorer: Box<dyn DraftScorer>,
}

impl Default for MatchAnalyzer {
    fn default() -> Self {
        Self::new(Box::new(PlaceholderScorer))
    }
}

impl MatchAnalyzer {
    pub fn new(scorer: Box<dyn DraftScorer>) -> Self {
        Self { scorer }
    }

    /// Analyzes the provided raw match
    ///
    /// `raw` The raw match record from the stats provider
    pub fn analyze(&self, raw: &RawMatch) -> AnalysisBlob {
        AnalysisBlob {
            draft_analysis: self.analyze_draft(&raw.players),
            key_moments: identify_key_moments(&raw.objectives),
            performance_metrics: calculate_performance_metrics(&raw.players),
        }
    }

    /// Splits the drafted heroes into teams by player position, the
    /// first five players are radiant and the next five are dire
    fn analyze_draft(&self, players: &[RawPlayer]) -> DraftAnalysis {
        let radiant_heroes: Vec<HeroID> = players
            .iter()
            .take(TEAM_SIZE)
            .filter_map(|player| player.hero_id)
            .collect();
        let dire_heroes: Vec<HeroID> = players
            .iter()
            .skip(TEAM_SIZE)
            .take(TEAM_SIZE)
            .filter_map(|player| player.hero_id)
            .collect();

        DraftAnalysis {
            synergy_score: self.scorer.synergy_score(&radiant_heroes),
            counter_score: self.scorer.counter_score(&radiant_heroes, &dire_heroes),
            radiant_heroes,
            dire_heroes,
        }
    }
}

/// Normalizes the match objectives into key moments ordered by time,
/// missing fields are given defaults
pub fn identify_key_moments(objectives: &[RawObjective]) -> Vec<KeyMoment> {
    const UNKNOWN: &str = "unknown";

    let mut moments: Vec<KeyMoment> = objectives
        .iter()
        .map(|objective| KeyMoment {
            time: objective.time.unwrap_or(0),
            kind: objective.kind.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            slot: objective.slot.unwrap_or(0),
            team: objective.team.unwrap_or(0),
            unit: objective.unit.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            key: objective
                .key
                .clone()
                .unwrap_or_else(|| Value::String(UNKNOWN.to_string())),
        })
        .collect();

    // Stable sort so events at the same time keep their order
    moments.sort_by_key(|moment| moment.time);
    moments
}

/// Collects the performance metrics for every player
pub fn calculate_performance_metrics(players: &[RawPlayer]) -> Vec<PlayerMetrics> {
    players
        .iter()
        .map(|player| PlayerMetrics {
            player_slot: player.player_slot,
            hero_id: player.hero_id,
            kills: player.kills.unwrap_or(0),
            deaths: player.deaths.unwrap_or(0),
            assists: player.assists.unwrap_or(0),
            gpm: player.gold_per_min.unwrap_or(0),
            xpm: player.xp_per_min.unwrap_or(0),
            hero_damage: player.hero_damage.unwrap_or(0),
            tower_damage: player.tower_damage.unwrap_or(0),
            hero_healing: player.hero_healing.unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::{identify_key_moments, DraftScorer, MatchAnalyzer};
    use crate::{services::provider::RawMatch, utils::types::HeroID};
    use serde_json::{json, Value};

    fn raw_match(value: Value) -> RawMatch {
        serde_json::from_value(value).unwrap()
    }

    /// Draft is split by position and scored with the placeholder formulas
    #[test]
    fn test_draft_split() {
        let players: Vec<Value> = (1..=10).map(|id| json!({ "hero_id": id })).collect();
        let raw = raw_match(json!({ "players": players }));

        let draft = MatchAnalyzer::default().analyze(&raw).draft_analysis;
        assert_eq!(draft.radiant_heroes, vec![1, 2, 3, 4, 5]);
        assert_eq!(draft.dire_heroes, vec![6, 7, 8, 9, 10]);
        assert_eq!(draft.synergy_score, 50);
        assert_eq!(draft.counter_score, 25);
    }

    /// A player with a malformed field keeps its side of the draft
    #[test]
    fn test_draft_split_malformed_player() {
        let mut players: Vec<Value> = (1..=10).map(|id| json!({ "hero_id": id })).collect();
        players[0] = json!({ "hero_id": 1, "kills": "n/a" });
        let raw = raw_match(json!({ "players": players }));

        let draft = MatchAnalyzer::default().analyze(&raw).draft_analysis;
        assert_eq!(draft.radiant_heroes, vec![1, 2, 3, 4, 5]);
        assert_eq!(draft.dire_heroes, vec![6, 7, 8, 9, 10]);
    }

    /// A short player list only fills radiant
    #[test]
    fn test_draft_two_players() {
        let raw = raw_match(json!({
            "players": [
                { "hero_id": 1, "kills": 10, "deaths": 2, "assists": 15 },
                { "hero_id": 2, "kills": 5, "deaths": 8, "assists": 20 }
            ]
        }));

        let draft = MatchAnalyzer::default().analyze(&raw).draft_analysis;
        assert_eq!(draft.radiant_heroes, vec![1, 2]);
        assert!(draft.dire_heroes.is_empty());
        assert_eq!(draft.synergy_score, 20);
        assert_eq!(draft.counter_score, 10);
    }

    #[test]
    fn test_custom_scorer() {
        struct OpponentScorer;

        impl DraftScorer for OpponentScorer {
            fn synergy_score(&self, _team: &[HeroID]) -> i64 {
                1
            }

            fn counter_score(&self, _team: &[HeroID], opponents: &[HeroID]) -> i64 {
                opponents.len() as i64
            }
        }

        let players: Vec<Value> = (1..=7).map(|id| json!({ "hero_id": id })).collect();
        let raw = raw_match(json!({ "players": players }));

        let draft = MatchAnalyzer::new(Box::new(OpponentScorer))
            .analyze(&raw)
            .draft_analysis;
        assert_eq!(draft.synergy_score, 1);
        assert_eq!(draft.counter_score, 2);
    }

    #[test]
    fn test_key_moments_defaults_and_order() {
        let raw = raw_match(json!({
            "objectives": [
                { "time": 600, "type": "building_kill", "unit": "npc_dota_hero_axe", "key": "npc_dota_goodguys_tower1_mid" },
                { "type": "CHAT_MESSAGE_FIRSTBLOOD", "slot": 3 },
                { "time": 300, "team": 2, "key": 5 }
            ]
        }));

        let moments = identify_key_moments(&raw.objectives);
        let times: Vec<i64> = moments.iter().map(|moment| moment.time).collect();
        assert_eq!(times, vec![0, 300, 600]);

        assert_eq!(moments[0].kind, "CHAT_MESSAGE_FIRSTBLOOD");
        assert_eq!(moments[0].slot, 3);
        assert_eq!(moments[0].team, 0);
        assert_eq!(moments[0].unit, "unknown");
        assert_eq!(moments[0].key, json!("unknown"));

        assert_eq!(moments[1].kind, "unknown");
        assert_eq!(moments[1].key, json!(5));
    }

    #[test]
    fn test_key_moments_not_a_list() {
        let raw = raw_match(json!({ "objectives": "not a list" }));
        assert!(identify_key_moments(&raw.objectives).is_empty());
    }

    #[test]
    fn test_performance_metrics_defaults() {
        let raw = raw_match(json!({
            "players": [
                {
                    "player_slot": 0,
                    "hero_id": 1,
                    "kills": 10,
                    "deaths": 2,
                    "assists": 15,
                    "gold_per_min": 650,
                    "xp_per_min": 700,
                    "hero_damage": 25000,
                    "tower_damage": 8000,
                    "hero_healing": 0
                },
                { "kills": 1 }
            ]
        }));

        let metrics = MatchAnalyzer::default().analyze(&raw).performance_metrics;
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].gpm, 650);
        assert_eq!(metrics[0].xpm, 700);
        assert_eq!(metrics[0].tower_damage, 8000);

        assert_eq!(metrics[1].player_slot, None);
        assert_eq!(metrics[1].hero_id, None);
        assert_eq!(metrics[1].kills, 1);
        assert_eq!(metrics[1].deaths, 0);
        assert_eq!(metrics[1].hero_damage, 0);
    }

    #[test]
    fn test_blob_shape() {
        let raw = raw_match(json!({ "players": [{ "hero_id": 1 }] }));
        let blob = serde_json::to_value(MatchAnalyzer::default().analyze(&raw)).unwrap();

        assert_eq!(blob["draft_analysis"]["synergy_score"], json!(10));
        assert_eq!(blob["key_moments"], json!([]));
        assert_eq!(blob["performance_metrics"][0]["gpm"], json!(0));
    }
}
