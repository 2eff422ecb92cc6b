//! Population of the store from the stats provider. Heroes are seeded
//! once while counters and match analyses are backfilled on read: the
//! store is checked first and on a miss the records are derived from
//! the stats provider, persisted and then read back from the store.

use super::{
    analyzer::MatchAnalyzer,
    provider::{HeroMatchup, StatsProvider},
};
use crate::{
    database::{
        entities::{hero_counters::CounterEntry, Hero, HeroCounter, HeroRoles, MatchAnalysis},
        DbErr, DbResult,
    },
    utils::types::{HeroID, MatchID},
};
use chrono::Utc;
use log::{debug, error, info};
use sea_orm::ConnectionTrait;
use thiserror::Error;

/// Seeds the hero table with the heroes from the stats provider. Returns
/// the number of stored heroes or [None] when the provider could not
/// supply the heroes
///
/// `db`       The database connection
/// `provider` The stats provider
pub async fn seed_heroes<C: ConnectionTrait>(
    db: &C,
    provider: &dyn StatsProvider,
) -> DbResult<Option<u64>> {
    let Some(heroes) = provider.heroes().await else {
        return Ok(None);
    };

    let now = Utc::now();
    let heroes = heroes
        .into_iter()
        .map(|hero| Hero {
            id: hero.id,
            name: hero.name,
            localized_name: hero.localized_name,
            primary_attr: hero.primary_attr,
            attack_type: hero.attack_type,
            roles: HeroRoles(hero.roles),
            created_at: now,
            updated_at: now,
        })
        .collect();

    let stored = Hero::insert_all(db, heroes).await?;
    info!("Seeded {} heroes from the stats provider", stored);
    Ok(Some(stored))
}

/// Win rate percentage a matchup must exceed to be considered a counter
const COUNTER_WIN_RATE_THRESHOLD: f64 = 53.0;

/// Derives counters from the matchup statistics of a hero. Matchups
/// without games are ignored and only those with a win rate above
/// [COUNTER_WIN_RATE_THRESHOLD] are kept
///
/// `matchups` The matchup statistics from the stats provider
pub fn derive_counters(matchups: &[HeroMatchup]) -> Vec<CounterEntry> {
    matchups
        .iter()
        .filter(|matchup| matchup.games_played > 0)
        .filter_map(|matchup| {
            let win_rate = matchup.wins as f64 / matchup.games_played as f64 * 100.0;
            if win_rate <= COUNTER_WIN_RATE_THRESHOLD {
                return None;
            }

            let win_rate = round_rate(win_rate);
            Some(CounterEntry {
                counter_hero_id: matchup.hero_id,
                win_rate: Some(win_rate),
                reason: Some(format!(
                    "High win rate of {}% in {} matches",
                    format_rate(win_rate),
                    matchup.games_played
                )),
            })
        })
        .collect()
}

/// Rounds a win rate to two decimal places, exact ties round to the
/// even digit (53.125 becomes 53.12)
fn round_rate(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Formats a win rate always keeping at least one decimal place
/// (60.0 rather than 60)
fn format_rate(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Retrieves the counters for the provided hero, backfilling them from
/// the stats provider when none are stored. Provider failures leave the
/// hero without counters. Empty results are not remembered so every
/// lookup for a hero without counters asks the provider again.
///
/// `db`       The database connection
/// `provider` The stats provider
/// `hero_id`  The ID of the hero
pub async fn counters_for_hero<C: ConnectionTrait>(
    db: &C,
    provider: &dyn StatsProvider,
    hero_id: HeroID,
) -> DbResult<Vec<HeroCounter>> {
    let counters = HeroCounter::by_hero(db, hero_id).await?;
    if !counters.is_empty() {
        return Ok(counters);
    }

    let Some(matchups) = provider.hero_matchups(hero_id).await else {
        debug!("No matchup data available for hero {}", hero_id);
        return Ok(counters);
    };

    let mut entries = derive_counters(&matchups);

    // Counters can only reference known heroes
    let known = Hero::existing_ids(
        db,
        entries.iter().map(|entry| entry.counter_hero_id).collect(),
    )
    .await?;
    entries.retain(|entry| known.contains(&entry.counter_hero_id));

    let inserted = HeroCounter::insert_missing(db, hero_id, entries).await?;
    debug!("Backfilled {} counters for hero {}", inserted, hero_id);

    HeroCounter::by_hero(db, hero_id).await
}

/// Errors that can occur while backfilling a match analysis
#[derive(Debug, Error)]
pub enum BackfillError {
    #[error(transparent)]
    Database(#[from] DbErr),
    /// The stats provider could not supply the match
    #[error("Match not available from the stats provider")]
    MatchUnavailable,
}

/// Retrieves the analysis for the provided match, analyzing the raw
/// match from the stats provider and storing it when not already stored
///
/// `db`       The database connection
/// `provider` The stats provider
/// `analyzer` The analyzer producing the analysis blob
/// `match_id` The ID of the match
pub async fn analysis_for_match<C: ConnectionTrait>(
    db: &C,
    provider: &dyn StatsProvider,
    analyzer: &MatchAnalyzer,
    match_id: MatchID,
) -> Result<MatchAnalysis, BackfillError> {
    if let Some(analysis) = MatchAnalysis::by_match_id(db, match_id).await? {
        return Ok(analysis);
    }

    let raw = provider
        .match_details(match_id)
        .await
        .ok_or(BackfillError::MatchUnavailable)?;

    // Records without a match ID are empty responses
    if raw.match_id.is_none() {
        debug!("Stats provider returned an empty record for match {}", match_id);
        return Err(BackfillError::MatchUnavailable);
    }

    let blob = analyzer.analyze(&raw);
    let blob = match serde_json::to_value(&blob) {
        Ok(value) => value,
        Err(err) => {
            error!("Failed to encode analysis for match {}: {}", match_id, err);
            return Err(DbErr::Json(err.to_string()).into());
        }
    };

    let analysis =
        MatchAnalysis::insert_if_absent(db, match_id, raw.radiant_win, raw.duration, blob).await?;
    Ok(analysis)
}
