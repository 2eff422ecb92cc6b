use crate::{
    database::DbResult,
    utils::types::{AnalysisID, MatchID},
};
use chrono::Utc;
use sea_orm::{
    entity::prelude::*,
    sea_query::OnConflict,
    ActiveValue::{NotSet, Set},
    ConnectionTrait, IntoActiveModel,
};
use serde::Serialize;

/// Structure for a stored analysis of a single match
#[derive(Serialize, Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "match_analyses")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip)]
    pub id: AnalysisID,
    /// Stats provider ID of the match, only one analysis is
    /// stored per match
    #[sea_orm(unique)]
    pub match_id: MatchID,
    pub radiant_win: Option<bool>,
    /// Match duration in seconds
    pub duration: Option<i64>,
    /// The analysis blob, clients are allowed to replace this with
    /// any JSON value so its stored untyped
    pub analysis: Option<Json>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Finds the analysis for the provided match
    ///
    /// `db`       The database connection
    /// `match_id` The ID of the match
    pub async fn by_match_id<C: ConnectionTrait>(
        db: &C,
        match_id: MatchID,
    ) -> DbResult<Option<Self>> {
        Entity::find()
            .filter(Column::MatchId.eq(match_id))
            .one(db)
            .await
    }

    /// Stores an analysis for the match unless one already exists, the
    /// stored analysis is returned. When two requests race to store the
    /// same match the unique match ID makes the later insert a no-op and
    /// both callers get back the row that won.
    ///
    /// `db`          The database connection
    /// `match_id`    The ID of the match
    /// `radiant_win` Whether radiant won the match
    /// `duration`    The match duration in seconds
    /// `analysis`    The analysis blob
    pub async fn insert_if_absent<C: ConnectionTrait>(
        db: &C,
        match_id: MatchID,
        radiant_win: Option<bool>,
        duration: Option<i64>,
        analysis: Json,
    ) -> DbResult<Self> {
        Entity::insert(ActiveModel {
            id: NotSet,
            match_id: Set(match_id),
            radiant_win: Set(radiant_win),
            duration: Set(duration),
            analysis: Set(Some(analysis)),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(Column::MatchId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

        Self::by_match_id(db, match_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Stored match analysis missing".to_string()))
    }

    /// Replaces the analysis blob
    pub async fn set_analysis<C: ConnectionTrait>(
        self,
        db: &C,
        analysis: Option<Json>,
    ) -> DbResult<Self> {
        let mut active = self.into_active_model();
        active.analysis = Set(analysis);
        active.update(db).await
    }

    pub async fn delete<C: ConnectionTrait>(self, db: &C) -> DbResult<()> {
        self.into_active_model().delete(db).await?;
        Ok(())
    }
}
