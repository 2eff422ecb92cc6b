use super::{error_response, MessageResponse};
use crate::{
    database::{
        entities::{
            hero_builds::{BuildChanges, NewBuild},
            Hero, HeroBuild, IdList,
        },
        DatabaseConnection, DbErr,
    },
    middleware::id_path::IdPath,
    utils::{
        nullable::nullable,
        types::{BuildID, HeroID},
    },
};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Router function creates a new router with all the underlying
/// routes for this file.
///
/// Prefix: /api
pub fn router() -> Router {
    Router::new()
        .route("/heroes/:id/builds", get(get_hero_builds).post(create_build))
        .route(
            "/builds/:id",
            get(get_build).patch(update_build).delete(delete_build),
        )
        .route("/builds/:id/vote", post(vote_build))
}

/// Errors that could occur while accessing the build routes
#[derive(Debug, Error)]
enum BuildsError {
    #[error("Hero not found")]
    HeroNotFound,
    #[error("Build not found")]
    BuildNotFound,
    #[error("name, items, and skills are required")]
    MissingFields,
    #[error("Invalid request body: {0}")]
    InvalidBody(JsonRejection),
    #[error("Internal server error")]
    Database(#[from] DbErr),
}

type BuildsResult<T> = Result<Json<T>, BuildsError>;

/// Attempts to find a build with the provided ID returning
/// the BuildNotFound error if the build didn't exist
async fn find_build(db: &DatabaseConnection, build_id: BuildID) -> Result<HeroBuild, BuildsError> {
    HeroBuild::by_id(db, build_id)
        .await?
        .ok_or(BuildsError::BuildNotFound)
}

/// GET /api/heroes/:id/builds
///
/// Responds with the builds for the hero
///
/// `hero_id` The ID of the hero
async fn get_hero_builds(
    IdPath(hero_id): IdPath<HeroID>,
    Extension(db): Extension<DatabaseConnection>,
) -> BuildsResult<Vec<HeroBuild>> {
    Hero::by_id(&db, hero_id)
        .await?
        .ok_or(BuildsError::HeroNotFound)?;

    let builds = HeroBuild::by_hero(&db, hero_id).await?;
    Ok(Json(builds))
}

/// Request to create a build, the name, items and skills are
/// required while the remaining fields fall back to defaults
#[derive(Deserialize)]
struct CreateBuildRequest {
    name: Option<String>,
    items: Option<IdList>,
    skills: Option<IdList>,
    #[serde(default, deserialize_with = "nullable")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    talents: Option<Option<IdList>>,
    #[serde(default, deserialize_with = "nullable")]
    playstyle: Option<Option<String>>,
    votes: Option<i64>,
}

/// POST /api/heroes/:id/builds
///
/// Creates a new build for the hero
///
/// `hero_id` The ID of the hero
/// `req`     The build details
async fn create_build(
    IdPath(hero_id): IdPath<HeroID>,
    Extension(db): Extension<DatabaseConnection>,
    req: Option<Json<CreateBuildRequest>>,
) -> Result<(StatusCode, Json<HeroBuild>), BuildsError> {
    Hero::by_id(&db, hero_id)
        .await?
        .ok_or(BuildsError::HeroNotFound)?;

    let Some(Json(req)) = req else {
        return Err(BuildsError::MissingFields);
    };

    let (Some(name), Some(items), Some(skills)) = (req.name, req.items, req.skills) else {
        return Err(BuildsError::MissingFields);
    };

    let build = NewBuild {
        name,
        items,
        skills,
        description: req.description.unwrap_or_else(|| Some(String::new())),
        talents: req.talents.unwrap_or_else(|| Some(IdList::default())),
        playstyle: req
            .playstyle
            .unwrap_or_else(|| Some("balanced".to_string())),
        votes: req.votes.unwrap_or(0),
    };

    let build = HeroBuild::create(&db, hero_id, build).await?;
    debug!("Created build {} for hero {}", build.id, hero_id);

    Ok((StatusCode::CREATED, Json(build)))
}

/// GET /api/builds/:id
///
/// `build_id` The ID of the build
async fn get_build(
    IdPath(build_id): IdPath<BuildID>,
    Extension(db): Extension<DatabaseConnection>,
) -> BuildsResult<HeroBuild> {
    let build = find_build(&db, build_id).await?;
    Ok(Json(build))
}

/// Partial build update, only the fields present are changed
#[derive(Deserialize)]
struct UpdateBuildRequest {
    name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    description: Option<Option<String>>,
    items: Option<IdList>,
    skills: Option<IdList>,
    #[serde(default, deserialize_with = "nullable")]
    talents: Option<Option<IdList>>,
    #[serde(default, deserialize_with = "nullable")]
    playstyle: Option<Option<String>>,
    votes: Option<i64>,
}

/// PATCH /api/builds/:id
///
/// `build_id` The ID of the build
/// `req`      The fields to update
async fn update_build(
    IdPath(build_id): IdPath<BuildID>,
    Extension(db): Extension<DatabaseConnection>,
    Json(req): Json<UpdateBuildRequest>,
) -> BuildsResult<HeroBuild> {
    let build = find_build(&db, build_id).await?;

    let build = build
        .update(
            &db,
            BuildChanges {
                name: req.name,
                description: req.description,
                items: req.items,
                skills: req.skills,
                talents: req.talents,
                playstyle: req.playstyle,
                votes: req.votes,
            },
        )
        .await?;

    Ok(Json(build))
}

/// DELETE /api/builds/:id
///
/// Deletes the build along with its comments
///
/// `build_id` The ID of the build
async fn delete_build(
    IdPath(build_id): IdPath<BuildID>,
    Extension(db): Extension<DatabaseConnection>,
) -> BuildsResult<MessageResponse> {
    let build = find_build(&db, build_id).await?;
    build.delete_with_comments(&db).await?;

    Ok(Json(MessageResponse {
        message: "Build deleted successfully",
    }))
}

#[derive(Deserialize)]
struct VoteRequest {
    /// Signed amount to add to the votes
    #[serde(default = "default_vote")]
    vote: i64,
}

fn default_vote() -> i64 {
    1
}

#[derive(Serialize)]
struct VoteResponse {
    id: BuildID,
    votes: i64,
}

/// POST /api/builds/:id/vote
///
/// Adds a vote to the build, votes are an unbounded running total.
/// A request without a JSON body or without a vote counts as +1
///
/// `build_id` The ID of the build
/// `req`      The vote to apply
async fn vote_build(
    IdPath(build_id): IdPath<BuildID>,
    Extension(db): Extension<DatabaseConnection>,
    req: Result<Json<VoteRequest>, JsonRejection>,
) -> BuildsResult<VoteResponse> {
    let vote = match req {
        Ok(Json(req)) => req.vote,
        Err(JsonRejection::MissingJsonContentType(_)) => default_vote(),
        Err(err) => return Err(BuildsError::InvalidBody(err)),
    };

    let build = HeroBuild::add_votes(&db, build_id, vote)
        .await?
        .ok_or(BuildsError::BuildNotFound)?;

    Ok(Json(VoteResponse {
        id: build.id,
        votes: build.votes,
    }))
}

impl IntoResponse for BuildsError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::HeroNotFound | Self::BuildNotFound => StatusCode::NOT_FOUND,
            Self::MissingFields | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Database(err) => {
                error!("Database error: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        error_response(status, self)
    }
}
