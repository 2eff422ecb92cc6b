use crate::{
    database::DbResult,
    utils::types::{BuildID, CommentID},
};
use chrono::Utc;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{NotSet, Set},
    ConnectionTrait, IntoActiveModel, QueryOrder,
};
use serde::Serialize;

/// Structure for a comment left on a build
#[derive(Serialize, Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "build_comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: CommentID,
    /// The build the comment was left on
    pub build_id: BuildID,
    /// Name of the comment author
    pub author: String,
    /// Text of the comment
    pub content: String,
    /// Optional rating of the build (1-5)
    pub rating: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hero_builds::Entity",
        from = "Column::BuildId",
        to = "super::hero_builds::Column::Id"
    )]
    Build,
}

impl Related<super::hero_builds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Build.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates a new comment on the provided build
    ///
    /// `db`       The database connection
    /// `build_id` The ID of the build
    /// `author`   The comment author
    /// `content`  The comment text
    /// `rating`   Optional build rating
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        build_id: BuildID,
        author: String,
        content: String,
        rating: Option<i32>,
    ) -> DbResult<Self> {
        ActiveModel {
            id: NotSet,
            build_id: Set(build_id),
            author: Set(author),
            content: Set(content),
            rating: Set(rating),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
    }

    pub async fn by_id<C: ConnectionTrait>(db: &C, id: CommentID) -> DbResult<Option<Self>> {
        Entity::find_by_id(id).one(db).await
    }

    /// Retrieves the comments for the provided build, newest first
    ///
    /// `db`       The database connection
    /// `build_id` The ID of the build
    pub async fn by_build<C: ConnectionTrait>(db: &C, build_id: BuildID) -> DbResult<Vec<Self>> {
        Entity::find()
            .filter(Column::BuildId.eq(build_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// Updates the comment content and rating. `Some(None)` for the
    /// rating clears it.
    pub async fn update<C: ConnectionTrait>(
        self,
        db: &C,
        content: Option<String>,
        rating: Option<Option<i32>>,
    ) -> DbResult<Self> {
        let mut active = self.clone().into_active_model();

        if let Some(content) = content {
            active.content = Set(content);
        }

        if let Some(rating) = rating {
            active.rating = Set(rating);
        }

        if !active.is_changed() {
            return Ok(self);
        }

        active.update(db).await
    }

    pub async fn delete<C: ConnectionTrait>(self, db: &C) -> DbResult<()> {
        self.into_active_model().delete(db).await?;
        Ok(())
    }
}
