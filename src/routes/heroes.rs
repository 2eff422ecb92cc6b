use super::error_response;
use crate::{
    database::{entities::Hero, DatabaseConnection, DbErr},
    middleware::id_path::IdPath,
    utils::types::HeroID,
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use log::error;
use thiserror::Error;

/// Router function creates a new router with all the underlying
/// routes for this file.
///
/// Prefix: /api
pub fn router() -> Router {
    Router::new()
        .route("/heroes", get(get_heroes))
        .route("/heroes/:id", get(get_hero))
}

/// Errors that could occur while accessing the hero routes
#[derive(Debug, Error)]
enum HeroesError {
    #[error("Hero not found")]
    HeroNotFound,
    #[error("Internal server error")]
    Database(#[from] DbErr),
}

type HeroesResult<T> = Result<Json<T>, HeroesError>;

/// GET /api/heroes
///
/// Responds with every stored hero
async fn get_heroes(Extension(db): Extension<DatabaseConnection>) -> HeroesResult<Vec<Hero>> {
    let heroes = Hero::all(&db).await?;
    Ok(Json(heroes))
}

/// GET /api/heroes/:id
///
/// Responds with the hero with the provided ID
///
/// `hero_id` The ID of the hero
async fn get_hero(
    IdPath(hero_id): IdPath<HeroID>,
    Extension(db): Extension<DatabaseConnection>,
) -> HeroesResult<Hero> {
    let hero = Hero::by_id(&db, hero_id)
        .await?
        .ok_or(HeroesError::HeroNotFound)?;
    Ok(Json(hero))
}

impl IntoResponse for HeroesError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::HeroNotFound => StatusCode::NOT_FOUND,
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
    use crate::routes::test::{send, test_app, FakeProvider};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_get_heroes() {
        let (app, _db) = test_app(FakeProvider::default()).await;

        let (status, body) = send(&app, Method::GET, "/api/heroes", None).await;
        assert_eq!(status, StatusCode::OK);

        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|hero| hero["localized_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Anti-Mage", "Axe", "Bane"]);
    }

    #[tokio::test]
    async fn test_get_hero() {
        let (app, _db) = test_app(FakeProvider::default()).await;

        let (status, body) = send(&app, Method::GET, "/api/heroes/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "id": 1,
                "name": "npc_dota_hero_antimage",
                "localized_name": "Anti-Mage",
                "primary_attr": "agi",
                "attack_type": "Melee",
                "roles": ["Carry"]
            })
        );
    }

    #[tokio::test]
    async fn test_get_missing_hero() {
        let (app, _db) = test_app(FakeProvider::default()).await;

        let (status, body) = send(&app, Method::GET, "/api/heroes/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Hero not found" }));
    }

    #[tokio::test]
    async fn test_get_hero_invalid_id() {
        let (app, _db) = test_app(FakeProvider::default()).await;

        let (status, body) = send(&app, Method::GET, "/api/heroes/abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not found" }));
    }
}
