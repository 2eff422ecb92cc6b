use super::{error_response, MessageResponse};
use crate::{
    database::{entities::MatchAnalysis, DatabaseConnection, DbErr},
    middleware::id_path::IdPath,
    services::{
        analyzer::MatchAnalyzer,
        backfill::{self, BackfillError},
        provider::SharedProvider,
    },
    utils::{nullable::nullable, types::MatchID},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use log::error;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Router function creates a new router with all the underlying
/// routes for this file.
///
/// Prefix: /api
pub fn router() -> Router {
    Router::new().route(
        "/matches/:match_id",
        get(get_match).patch(update_match).delete(delete_match),
    )
}

#[derive(Debug, Error)]
enum MatchesError {
    #[error("Match not found")]
    MatchNotFound,
    #[error("Internal server error")]
    Database(#[from] DbErr),
}

impl From<BackfillError> for MatchesError {
    fn from(value: BackfillError) -> Self {
        match value {
            BackfillError::Database(err) => Self::Database(err),
            BackfillError::MatchUnavailable => Self::MatchNotFound,
        }
    }
}

type MatchesResult<T> = Result<Json<T>, MatchesError>;

async fn find_analysis(
    db: &DatabaseConnection,
    match_id: MatchID,
) -> Result<MatchAnalysis, MatchesError> {
    MatchAnalysis::by_match_id(db, match_id)
        .await?
        .ok_or(MatchesError::MatchNotFound)
}

/// GET /api/matches/:match_id
///
/// Responds with the analysis of the match, matches that haven't been
/// analyzed yet are retrieved from the stats provider and analyzed
///
/// `match_id` The stats provider ID of the match
async fn get_match(
    IdPath(match_id): IdPath<MatchID>,
    Extension(db): Extension<DatabaseConnection>,
    Extension(provider): Extension<SharedProvider>,
    Extension(analyzer): Extension<Arc<MatchAnalyzer>>,
) -> MatchesResult<MatchAnalysis> {
    let analysis =
        backfill::analysis_for_match(&db, provider.as_ref(), &analyzer, match_id).await?;
    Ok(Json(analysis))
}

#[derive(Deserialize)]
struct UpdateMatchRequest {
    /// Replacement analysis, any JSON value is accepted
    #[serde(default, deserialize_with = "nullable")]
    analysis: Option<Option<Value>>,
}

/// PATCH /api/matches/:match_id
///
/// Replaces the stored analysis blob of the match
///
/// `match_id` The stats provider ID of the match
/// `req`      The replacement analysis
async fn update_match(
    IdPath(match_id): IdPath<MatchID>,
    Extension(db): Extension<DatabaseConnection>,
    Json(req): Json<UpdateMatchRequest>,
) -> MatchesResult<MatchAnalysis> {
    let analysis = find_analysis(&db, match_id).await?;

    let analysis = match req.analysis {
        Some(value) => analysis.set_analysis(&db, value).await?,
        None => analysis,
    };

    Ok(Json(analysis))
}

/// DELETE /api/matches/:match_id
///
/// `match_id` The stats provider ID of the match
async fn delete_match(
    IdPath(match_id): IdPath<MatchID>,
    Extension(db): Extension<DatabaseConnection>,
) -> MatchesResult<MessageResponse> {
    let analysis = find_analysis(&db, match_id).await?;
    analysis.delete(&db).await?;

    Ok(Json(MessageResponse {
        message: "Match analysis deleted successfully",
    }))
}

impl IntoResponse for MatchesError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MatchNotFound => StatusCode::NOT_FOUND,
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
        database::entities::MatchAnalysis,
        routes::test::{send, test_app, FakeProvider},
    };
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    fn raw_match() -> Value {
        json!({
            "match_id": 123456789,
            "radiant_win": true,
            "duration": 2400,
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
                {
                    "player_slot": 128,
                    "hero_id": 2,
                    "kills": 5,
                    "deaths": 8,
                    "assists": 20,
                    "gold_per_min": 400,
                    "xp_per_min": 450,
                    "hero_damage": 15000,
                    "tower_damage": 1000,
                    "hero_healing": 5000
                }
            ],
            "objectives": [
                { "time": 900, "type": "building_kill", "key": "npc_dota_badguys_tower1_mid" },
                { "time": 120, "type": "CHAT_MESSAGE_FIRSTBLOOD", "slot": 0 }
            ]
        })
    }

    #[tokio::test]
    async fn test_get_match_analyzes() {
        let (app, db) = test_app(FakeProvider {
            raw_match: Some(raw_match()),
            ..Default::default()
        })
        .await;

        let (status, body) = send(&app, Method::GET, "/api/matches/123456789", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["match_id"], json!(123456789));
        assert_eq!(body["radiant_win"], json!(true));
        assert_eq!(body["duration"], json!(2400));
        assert!(body["created_at"].is_string());

        let analysis = &body["analysis"];
        assert_eq!(analysis["draft_analysis"]["radiant_heroes"], json!([1, 2]));
        assert_eq!(analysis["draft_analysis"]["dire_heroes"], json!([]));
        assert_eq!(analysis["draft_analysis"]["synergy_score"], json!(20));
        assert_eq!(analysis["draft_analysis"]["counter_score"], json!(10));
        assert_eq!(analysis["key_moments"][0]["time"], json!(120));
        assert_eq!(analysis["key_moments"][1]["unit"], json!("unknown"));
        assert_eq!(analysis["performance_metrics"][1]["hero_healing"], json!(5000));

        assert!(MatchAnalysis::by_match_id(&db, 123456789)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_get_match_provider_failure() {
        let (app, db) = test_app(FakeProvider::default()).await;

        let (status, body) = send(&app, Method::GET, "/api/matches/999999999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Match not found" }));

        assert!(MatchAnalysis::by_match_id(&db, 999999999)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_match() {
        let (app, _db) = test_app(FakeProvider {
            raw_match: Some(raw_match()),
            ..Default::default()
        })
        .await;
        let uri = "/api/matches/123456789";

        // Missing analyses can't be updated
        let (status, _) = send(
            &app,
            Method::PATCH,
            uri,
            Some(json!({ "analysis": { "custom": true } })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        send(&app, Method::GET, uri, None).await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            uri,
            Some(json!({ "analysis": { "custom": true } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"], json!({ "custom": true }));
        assert_eq!(body["radiant_win"], json!(true));

        let (status, body) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "message": "Match analysis deleted successfully" })
        );

        let (status, _) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_match_id() {
        let (app, _db) = test_app(FakeProvider::default()).await;

        let (status, body) = send(&app, Method::GET, "/api/matches/not-a-match", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not found" }));
    }

    /// Empty records from the provider are treated as missing matches
    #[tokio::test]
    async fn test_get_match_empty_record() {
        let (app, db) = test_app(FakeProvider {
            raw_match: Some(json!({})),
            ..Default::default()
        })
        .await;

        let (status, body) = send(&app, Method::GET, "/api/matches/123", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Match not found" }));
        assert!(MatchAnalysis::by_match_id(&db, 123).await.unwrap().is_none());
    }
}
