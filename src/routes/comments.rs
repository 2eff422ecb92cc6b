use super::{error_response, MessageResponse};
use crate::{
    database::{
        entities::{BuildComment, HeroBuild},
        DatabaseConnection, DbErr,
    },
    middleware::id_path::IdPath,
    utils::{
        nullable::nullable,
        types::{BuildID, CommentID},
    },
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Extension, Json, Router,
};
use log::error;
use serde::Deserialize;
use thiserror::Error;

/// Router function creates a new router with all the underlying
/// routes for this file.
///
/// Prefix: /api
pub fn router() -> Router {
    Router::new()
        .route(
            "/builds/:id/comments",
            get(get_comments).post(create_comment),
        )
        .route("/comments/:id", patch(update_comment).delete(delete_comment))
}

#[derive(Debug, Error)]
enum CommentsError {
    #[error("Build not found")]
    BuildNotFound,
    #[error("Comment not found")]
    CommentNotFound,
    #[error("author and content are required")]
    MissingFields,
    #[error("Internal server error")]
    Database(#[from] DbErr),
}

type CommentsResult<T> = Result<Json<T>, CommentsError>;

async fn ensure_build(db: &DatabaseConnection, build_id: BuildID) -> Result<(), CommentsError> {
    HeroBuild::by_id(db, build_id)
        .await?
        .ok_or(CommentsError::BuildNotFound)?;
    Ok(())
}

async fn find_comment(
    db: &DatabaseConnection,
    comment_id: CommentID,
) -> Result<BuildComment, CommentsError> {
    BuildComment::by_id(db, comment_id)
        .await?
        .ok_or(CommentsError::CommentNotFound)
}

/// GET /api/builds/:id/comments
///
/// Responds with the comments on the build, newest first
///
/// `build_id` The ID of the build
async fn get_comments(
    IdPath(build_id): IdPath<BuildID>,
    Extension(db): Extension<DatabaseConnection>,
) -> CommentsResult<Vec<BuildComment>> {
    ensure_build(&db, build_id).await?;

    let comments = BuildComment::by_build(&db, build_id).await?;
    Ok(Json(comments))
}

#[derive(Deserialize)]
struct CreateCommentRequest {
    author: Option<String>,
    content: Option<String>,
    rating: Option<i32>,
}

/// POST /api/builds/:id/comments
///
/// `build_id` The ID of the build being commented on
/// `req`      The comment details
async fn create_comment(
    IdPath(build_id): IdPath<BuildID>,
    Extension(db): Extension<DatabaseConnection>,
    req: Option<Json<CreateCommentRequest>>,
) -> Result<(StatusCode, Json<BuildComment>), CommentsError> {
    ensure_build(&db, build_id).await?;

    let Some(Json(req)) = req else {
        return Err(CommentsError::MissingFields);
    };

    let (Some(author), Some(content)) = (req.author, req.content) else {
        return Err(CommentsError::MissingFields);
    };

    let comment = BuildComment::create(&db, build_id, author, content, req.rating).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[derive(Deserialize)]
struct UpdateCommentRequest {
    content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    rating: Option<Option<i32>>,
}

/// PATCH /api/comments/:id
///
/// Updates the content and rating of a comment
///
/// `comment_id` The ID of the comment
/// `req`        The fields to update
async fn update_comment(
    IdPath(comment_id): IdPath<CommentID>,
    Extension(db): Extension<DatabaseConnection>,
    Json(req): Json<UpdateCommentRequest>,
) -> CommentsResult<BuildComment> {
    let comment = find_comment(&db, comment_id).await?;
    let comment = comment.update(&db, req.content, req.rating).await?;
    Ok(Json(comment))
}

/// DELETE /api/comments/:id
///
/// `comment_id` The ID of the comment
async fn delete_comment(
    IdPath(comment_id): IdPath<CommentID>,
    Extension(db): Extension<DatabaseConnection>,
) -> CommentsResult<MessageResponse> {
    let comment = find_comment(&db, comment_id).await?;
    comment.delete(&db).await?;

    Ok(Json(MessageResponse {
        message: "Comment deleted successfully",
    }))
}

impl IntoResponse for CommentsError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BuildNotFound | Self::CommentNotFound => StatusCode::NOT_FOUND,
            Self::MissingFields => StatusCode::BAD_REQUEST,
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
    use axum::{
        http::{Method, StatusCode},
        Router,
    };
    use serde_json::{json, Value};

    async fn create_build(app: &Router) -> i64 {
        let (_, body) = send(
            app,
            Method::POST,
            "/api/heroes/1/builds",
            Some(json!({ "name": "Test", "items": [1], "skills": [1] })),
        )
        .await;
        body["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_comments_newest_first() {
        let (app, _db) = test_app(FakeProvider::default()).await;
        let build_id = create_build(&app).await;
        let uri = format!("/api/builds/{build_id}/comments");

        let (status, first) = send(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "author": "Player1", "content": "Great build!", "rating": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["build_id"], json!(build_id));
        assert_eq!(first["rating"], json!(5));

        let (_, second) = send(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "author": "Player2", "content": "Works for me" })),
        )
        .await;
        assert_eq!(second["rating"], Value::Null);

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&Value> = body.as_array().unwrap().iter().map(|c| &c["id"]).collect();
        assert_eq!(ids, vec![&second["id"], &first["id"]]);
    }

    #[tokio::test]
    async fn test_create_comment_validation() {
        let (app, _db) = test_app(FakeProvider::default()).await;
        let build_id = create_build(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/builds/{build_id}/comments"),
            Some(json!({ "author": "Player1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "author and content are required" }));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/builds/999/comments",
            Some(json!({ "author": "A", "content": "B" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_and_delete_comment() {
        let (app, _db) = test_app(FakeProvider::default()).await;
        let build_id = create_build(&app).await;

        let (_, comment) = send(
            &app,
            Method::POST,
            &format!("/api/builds/{build_id}/comments"),
            Some(json!({ "author": "Player1", "content": "Great build!", "rating": 5 })),
        )
        .await;
        let uri = format!("/api/comments/{}", comment["id"]);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "content": "Updated comment", "rating": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], json!("Updated comment"));
        assert_eq!(body["rating"], Value::Null);
        assert_eq!(body["author"], json!("Player1"));

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Comment deleted successfully" }));

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
