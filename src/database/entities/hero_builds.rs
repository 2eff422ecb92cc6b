use crate::{
    database::DbResult,
    utils::types::{BuildID, HeroID},
};
use chrono::Utc;
use sea_orm::{
    entity::prelude::*,
    sea_query::Expr,
    ActiveValue::{NotSet, Set},
    ConnectionTrait, FromJsonQueryResult, IntoActiveModel, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};

/// Structure for a recommended item / skill build for a hero
#[derive(Serialize, Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "hero_builds")]
pub struct Model {
    /// Unique identifier for the build
    #[sea_orm(primary_key)]
    pub id: BuildID,
    /// The hero this build is for
    pub hero_id: HeroID,
    /// Name of the build
    pub name: String,
    pub description: Option<String>,
    /// Item IDs in purchase order
    pub items: IdList,
    /// Skill IDs in level up order
    pub skills: IdList,
    /// Talent choices
    pub talents: Option<IdList>,
    /// Playstyle of the build e.g. "aggressive", "farming"
    pub playstyle: Option<String>,
    /// Running total of the votes applied to the build
    pub votes: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// Ordered list of item, skill or talent IDs stored as a JSON column
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct IdList(pub Vec<i64>);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::heroes::Entity",
        from = "Column::HeroId",
        to = "super::heroes::Column::Id"
    )]
    Hero,
    #[sea_orm(has_many = "super::build_comments::Entity")]
    Comments,
}

impl Related<super::heroes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hero.def()
    }
}

impl Related<super::build_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Details for creating a new build
#[derive(Debug, Clone)]
pub struct NewBuild {
    pub name: String,
    pub description: Option<String>,
    pub items: IdList,
    pub skills: IdList,
    pub talents: Option<IdList>,
    pub playstyle: Option<String>,
    pub votes: i64,
}

/// Partial changes to a build, fields that are `None` are left as is
/// and nested `Some(None)` values clear nullable fields
#[derive(Debug, Clone, Default)]
pub struct BuildChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub items: Option<IdList>,
    pub skills: Option<IdList>,
    pub talents: Option<Option<IdList>>,
    pub playstyle: Option<Option<String>>,
    pub votes: Option<i64>,
}

impl Model {
    /// Creates a new build for the provided hero
    ///
    /// `db`      The database connection
    /// `hero_id` The ID of the hero the build is for
    /// `build`   The build details
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        hero_id: HeroID,
        build: NewBuild,
    ) -> DbResult<Self> {
        let now = Utc::now();
        ActiveModel {
            id: NotSet,
            hero_id: Set(hero_id),
            name: Set(build.name),
            description: Set(build.description),
            items: Set(build.items),
            skills: Set(build.skills),
            talents: Set(build.talents),
            playstyle: Set(build.playstyle),
            votes: Set(build.votes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    pub async fn by_id<C: ConnectionTrait>(db: &C, id: BuildID) -> DbResult<Option<Self>> {
        Entity::find_by_id(id).one(db).await
    }

    /// Retrieves all the builds for the provided hero
    ///
    /// `db`      The database connection
    /// `hero_id` The ID of the hero
    pub async fn by_hero<C: ConnectionTrait>(db: &C, hero_id: HeroID) -> DbResult<Vec<Self>> {
        Entity::find()
            .filter(Column::HeroId.eq(hero_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Applies the provided changes to the build, the updated
    /// timestamp is only moved when something changed
    ///
    /// `db`      The database connection
    /// `changes` The changes to apply
    pub async fn update<C: ConnectionTrait>(self, db: &C, changes: BuildChanges) -> DbResult<Self> {
        let mut active = self.clone().into_active_model();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }

        if let Some(description) = changes.description {
            active.description = Set(description);
        }

        if let Some(items) = changes.items {
            active.items = Set(items);
        }

        if let Some(skills) = changes.skills {
            active.skills = Set(skills);
        }

        if let Some(talents) = changes.talents {
            active.talents = Set(talents);
        }

        if let Some(playstyle) = changes.playstyle {
            active.playstyle = Set(playstyle);
        }

        if let Some(votes) = changes.votes {
            active.votes = Set(votes);
        }

        if !active.is_changed() {
            return Ok(self);
        }

        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Adds the provided signed amount to the build votes. The addition
    /// is done by the database so concurrent votes are not lost. The
    /// updated build is returned or [None] if the build doesn't exist.
    ///
    /// `db`    The database connection
    /// `id`    The ID of the build
    /// `delta` The amount to add (may be negative)
    pub async fn add_votes<C: ConnectionTrait>(
        db: &C,
        id: BuildID,
        delta: i64,
    ) -> DbResult<Option<Self>> {
        let result = Entity::update_many()
            .col_expr(Column::Votes, Expr::col(Column::Votes).add(delta))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        Self::by_id(db, id).await
    }

    /// Deletes the build along with all of its comments, both deletions
    /// happen within a single transaction
    ///
    /// `db` The database connection
    pub async fn delete_with_comments<C>(self, db: &C) -> DbResult<()>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;

        super::build_comments::Entity::delete_many()
            .filter(super::build_comments::Column::BuildId.eq(self.id))
            .exec(&txn)
            .await?;

        self.into_active_model().delete(&txn).await?;

        txn.commit().await
    }
}
