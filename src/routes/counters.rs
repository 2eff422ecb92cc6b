use super::{error_response, MessageResponse};
use crate::{
    database::{
        entities::{hero_counters::CounterEntry, Hero, HeroCounter},
        DatabaseConnection, DbErr,
    },
    middleware::id_path::IdPath,
    services::{backfill, provider::SharedProvider},
    utils::{
        nullable::nullable,
        types::{CounterID, HeroID},
    },
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Extension, Json, Router,
};
use log::error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Router function creates a new router with all the underlying
/// routes for this file.
///
/// Prefix: /api
pub fn router() -> Router {
    Router::new()
        .route("/heroes/:id/counters", get(get_counters).post(create_counter))
        .route(
            "/heroes/:id/counters/:counter_id",
            patch(update_counter).delete(delete_counter),
        )
}

/// Errors that could occur while accessing the counter routes
#[derive(Debug, Error)]
enum CountersError {
    #[error("Hero not found")]
    HeroNotFound,
    /// The hero referenced as the counter doesn't exist
    #[error("Counter hero not found")]
    CounterHeroNotFound,
    #[error("Counter not found")]
    CounterNotFound,
    #[error("counter_hero_id is required")]
    MissingCounterHero,
    #[error("Internal server error")]
    Database(#[from] DbErr),
}

/// Ensures the hero with the provided ID exists
async fn ensure_hero(db: &DatabaseConnection, hero_id: HeroID) -> Result<(), CountersError> {
    Hero::by_id(db, hero_id)
        .await?
        .ok_or(CountersError::HeroNotFound)?;
    Ok(())
}

/// Counter listing entry which includes the name of the
/// counter hero
#[derive(Serialize)]
struct CounterResponse {
    id: CounterID,
    counter_hero_id: HeroID,
    counter_hero_name: Option<String>,
    win_rate: Option<f64>,
    reason: Option<String>,
}

/// GET /api/heroes/:id/counters
///
/// Responds with the counters for the hero, when no counters are
/// stored they are backfilled from the stats provider first
///
/// `hero_id` The ID of the hero
async fn get_counters(
    IdPath(hero_id): IdPath<HeroID>,
    Extension(db): Extension<DatabaseConnection>,
    Extension(provider): Extension<SharedProvider>,
) -> Result<Json<Vec<CounterResponse>>, CountersError> {
    ensure_hero(&db, hero_id).await?;

    let counters = backfill::counters_for_hero(&db, provider.as_ref(), hero_id).await?;

    let names: HashMap<HeroID, String> = Hero::by_ids(
        &db,
        counters.iter().map(|counter| counter.counter_hero_id).collect(),
    )
    .await?
    .into_iter()
    .map(|hero| (hero.id, hero.localized_name))
    .collect();

    let counters = counters
        .into_iter()
        .map(|counter| CounterResponse {
            id: counter.id,
            counter_hero_name: names.get(&counter.counter_hero_id).cloned(),
            counter_hero_id: counter.counter_hero_id,
            win_rate: counter.win_rate,
            reason: counter.reason,
        })
        .collect();

    Ok(Json(counters))
}

#[derive(Deserialize)]
struct CreateCounterRequest {
    counter_hero_id: Option<HeroID>,
    win_rate: Option<f64>,
    /// Defaults to an empty reason when missing
    #[serde(default, deserialize_with = "nullable")]
    reason: Option<Option<String>>,
}

/// POST /api/heroes/:id/counters
///
/// Stores a counter for the hero, an existing counter for the same
/// counter hero is replaced
///
/// `hero_id` The ID of the hero being countered
/// `req`     The counter details
async fn create_counter(
    IdPath(hero_id): IdPath<HeroID>,
    Extension(db): Extension<DatabaseConnection>,
    req: Option<Json<CreateCounterRequest>>,
) -> Result<(StatusCode, Json<HeroCounter>), CountersError> {
    ensure_hero(&db, hero_id).await?;

    let Json(req) = req.ok_or(CountersError::MissingCounterHero)?;
    let counter_hero_id = req
        .counter_hero_id
        .ok_or(CountersError::MissingCounterHero)?;

    Hero::by_id(&db, counter_hero_id)
        .await?
        .ok_or(CountersError::CounterHeroNotFound)?;

    let counter = HeroCounter::upsert(
        &db,
        hero_id,
        CounterEntry {
            counter_hero_id,
            win_rate: req.win_rate,
            reason: req.reason.unwrap_or_else(|| Some(String::new())),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(counter)))
}

#[derive(Deserialize)]
struct UpdateCounterRequest {
    #[serde(default, deserialize_with = "nullable")]
    win_rate: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    reason: Option<Option<String>>,
}

/// PATCH /api/heroes/:id/counters/:counter_id
///
/// Updates the win rate and reason of a counter
///
/// `hero_id`    The ID of the hero the counter belongs to
/// `counter_id` The ID of the counter
/// `req`        The fields to update
async fn update_counter(
    IdPath((hero_id, counter_id)): IdPath<(HeroID, CounterID)>,
    Extension(db): Extension<DatabaseConnection>,
    Json(req): Json<UpdateCounterRequest>,
) -> Result<Json<HeroCounter>, CountersError> {
    let counter = HeroCounter::by_hero_and_id(&db, hero_id, counter_id)
        .await?
        .ok_or(CountersError::CounterNotFound)?;

    let counter = counter.update(&db, req.win_rate, req.reason).await?;
    Ok(Json(counter))
}

/// DELETE /api/heroes/:id/counters/:counter_id
///
/// `hero_id`    The ID of the hero the counter belongs to
/// `counter_id` The ID of the counter
async fn delete_counter(
    IdPath((hero_id, counter_id)): IdPath<(HeroID, CounterID)>,
    Extension(db): Extension<DatabaseConnection>,
) -> Result<Json<MessageResponse>, CountersError> {
    let counter = HeroCounter::by_hero_and_id(&db, hero_id, counter_id)
        .await?
        .ok_or(CountersError::CounterNotFound)?;

    counter.delete(&db).await?;

    Ok(Json(MessageResponse {
        message: "Counter deleted successfully",
    }))
}

impl IntoResponse for CountersError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::HeroNotFound | Self::CounterHeroNotFound | Self::CounterNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::MissingCounterHero => StatusCode::BAD_REQUEST,
            Self::Database(err) => {
                error!("Database error: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        error_response(status, self)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        routes::test::{send, test_app, FakeProvider},
        services::provider::HeroMatchup,
    };
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    fn matchups() -> Vec<HeroMatchup> {
        vec![
            HeroMatchup {
                hero_id: 2,
                games_played: 100,
                wins: 60,
            },
            HeroMatchup {
                hero_id: 3,
                games_played: 80,
                wins: 50,
            },
            HeroMatchup {
                hero_id: 999,
                games_played: 10,
                wins: 9,
            },
        ]
    }

    #[tokio::test]
    async fn test_counters_backfilled() {
        let (app, _db) = test_app(FakeProvider {
            matchups: Some(matchups()),
            ..Default::default()
        })
        .await;

        let (status, body) = send(&app, Method::GET, "/api/heroes/1/counters", None).await;
        assert_eq!(status, StatusCode::OK);

        let counters = body.as_array().unwrap();
        assert_eq!(counters.len(), 2);
        assert_eq!(counters[0]["counter_hero_id"], json!(2));
        assert_eq!(counters[0]["counter_hero_name"], json!("Axe"));
        assert_eq!(counters[0]["win_rate"], json!(60.0));
        assert_eq!(
            counters[0]["reason"],
            json!("High win rate of 60.0% in 100 matches")
        );
        assert_eq!(counters[1]["counter_hero_name"], json!("Bane"));
        assert_eq!(counters[1]["win_rate"], json!(62.5));
    }

    #[tokio::test]
    async fn test_counters_provider_failure() {
        let (app, _db) = test_app(FakeProvider::default()).await;

        let (status, body) = send(&app, Method::GET, "/api/heroes/1/counters", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_counters_missing_hero() {
        let (app, _db) = test_app(FakeProvider::default()).await;

        let (status, _) = send(&app, Method::GET, "/api/heroes/999/counters", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_counter() {
        let (app, _db) = test_app(FakeProvider::default()).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/heroes/1/counters",
            Some(json!({
                "counter_hero_id": 2,
                "win_rate": 65.5,
                "reason": "Strong early game"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["hero_id"], json!(1));
        assert_eq!(body["counter_hero_id"], json!(2));
        assert_eq!(body["win_rate"], json!(65.5));
        assert_eq!(body["reason"], json!("Strong early game"));

        // Listing uses the stored counter rather than the provider
        let (_, body) = send(&app, Method::GET, "/api/heroes/1/counters", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_counter_replaces_pair() {
        let (app, _db) = test_app(FakeProvider::default()).await;

        let (_, first) = send(
            &app,
            Method::POST,
            "/api/heroes/1/counters",
            Some(json!({ "counter_hero_id": 2, "win_rate": 55.0 })),
        )
        .await;
        assert_eq!(first["reason"], json!(""));

        let (status, second) = send(
            &app,
            Method::POST,
            "/api/heroes/1/counters",
            Some(json!({ "counter_hero_id": 2, "win_rate": 70.0, "reason": "Updated" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["id"], second["id"]);
        assert_eq!(second["win_rate"], json!(70.0));
    }

    #[tokio::test]
    async fn test_create_counter_validation() {
        let (app, _db) = test_app(FakeProvider::default()).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/heroes/1/counters",
            Some(json!({ "win_rate": 65.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "counter_hero_id is required" }));

        let (status, _) = send(&app, Method::POST, "/api/heroes/1/counters", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/heroes/1/counters",
            Some(json!({ "counter_hero_id": 999 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/heroes/999/counters",
            Some(json!({ "counter_hero_id": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_and_delete_counter() {
        let (app, _db) = test_app(FakeProvider::default()).await;

        let (_, created) = send(
            &app,
            Method::POST,
            "/api/heroes/1/counters",
            Some(json!({ "counter_hero_id": 2, "win_rate": 65.5, "reason": "Reason" })),
        )
        .await;
        let id = created["id"].as_i64().unwrap();
        let uri = format!("/api/heroes/1/counters/{id}");

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "win_rate": 70.0, "reason": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["win_rate"], json!(70.0));
        assert_eq!(body["reason"], Value::Null);

        // Counter must be accessed through its own hero
        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/heroes/2/counters/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Counter deleted successfully" }));

        let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
