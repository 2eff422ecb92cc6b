//! Client for the external stats provider (OpenDota) which is used to
//! seed heroes and backfill counters and match analyses
use crate::utils::types::{BoxFuture, HeroID, MatchID};
use log::{debug, error};
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub use models::{HeroMatchup, ProviderHero, RawMatch, RawObjective, RawPlayer};

mod models;

/// Source of hero and match statistics. Every operation is a single
/// best effort attempt, failures are logged by the implementation and
/// reported as [None].
pub trait StatsProvider: Send + Sync {
    /// Retrieves the full list of heroes
    fn heroes(&self) -> BoxFuture<'_, Option<Vec<ProviderHero>>>;

    /// Retrieves the matchup statistics of the provided hero against
    /// every other hero
    fn hero_matchups(&self, hero_id: HeroID) -> BoxFuture<'_, Option<Vec<HeroMatchup>>>;

    /// Retrieves the raw match record for the provided match
    fn match_details(&self, match_id: MatchID) -> BoxFuture<'_, Option<RawMatch>>;
}

/// Stats provider shared between the request handlers
pub type SharedProvider = Arc<dyn StatsProvider>;

/// HTTP client for the OpenDota API
pub struct OpenDotaClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Base URL that resource paths are appended to
    base_url: String,
}

impl OpenDotaClient {
    /// Creates a new client for the provided base URL
    ///
    /// `base_url` The API base URL (e.g. https://api.opendota.com/api)
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Requests the provided resource path and decodes the JSON response.
    /// Connection failures, non success statuses and undecodable bodies
    /// are logged and result in [None]
    ///
    /// `path` The resource path relative to the base URL
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("Fetching stats provider resource: {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(value) => value,
            Err(err) => {
                error!("Error fetching data from stats provider ({}): {}", path, err);
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(value) => value,
            Err(err) => {
                error!("Error fetching data from stats provider ({}): {}", path, err);
                return None;
            }
        };

        match response.json::<T>().await {
            Ok(value) => Some(value),
            Err(err) => {
                error!("Failed to decode stats provider response ({}): {}", path, err);
                None
            }
        }
    }
}

impl StatsProvider for OpenDotaClient {
    fn heroes(&self) -> BoxFuture<'_, Option<Vec<ProviderHero>>> {
        Box::pin(self.fetch::<Vec<ProviderHero>>("heroes"))
    }

    fn hero_matchups(&self, hero_id: HeroID) -> BoxFuture<'_, Option<Vec<HeroMatchup>>> {
        Box::pin(async move {
            self.fetch::<Vec<HeroMatchup>>(&format!("heroes/{hero_id}/matchups"))
                .await
        })
    }

    fn match_details(&self, match_id: MatchID) -> BoxFuture<'_, Option<RawMatch>> {
        Box::pin(async move { self.fetch::<RawMatch>(&format!("matches/{match_id}")).await })
    }
}
