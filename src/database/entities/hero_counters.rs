use crate::{
    database::DbResult,
    utils::types::{CounterID, HeroID},
};
use chrono::Utc;
use sea_orm::{
    entity::prelude::*,
    sea_query::OnConflict,
    ActiveValue::{NotSet, Set},
    ConnectionTrait, IntoActiveModel, QueryOrder,
};
use serde::Serialize;

/// Structure for a hero that counters another hero
#[derive(Serialize, Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hero_counters")]
pub struct Model {
    /// Unique identifier for the counter
    #[sea_orm(primary_key)]
    pub id: CounterID,
    /// The hero being countered
    pub hero_id: HeroID,
    /// The hero that counters [Model::hero_id]
    pub counter_hero_id: HeroID,
    /// Win rate percentage (0-100) of the counter hero in the matchup
    pub win_rate: Option<f64>,
    /// Explanation of why this is a counter
    pub reason: Option<String>,
    #[serde(skip)]
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::heroes::Entity",
        from = "Column::HeroId",
        to = "super::heroes::Column::Id"
    )]
    Hero,
    #[sea_orm(
        belongs_to = "super::heroes::Entity",
        from = "Column::CounterHeroId",
        to = "super::heroes::Column::Id"
    )]
    CounterHero,
}

impl ActiveModelBehavior for ActiveModel {}

/// Details for a counter that is about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct CounterEntry {
    pub counter_hero_id: HeroID,
    pub win_rate: Option<f64>,
    pub reason: Option<String>,
}

impl CounterEntry {
    fn into_active_model(self, hero_id: HeroID) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            hero_id: Set(hero_id),
            counter_hero_id: Set(self.counter_hero_id),
            win_rate: Set(self.win_rate),
            reason: Set(self.reason),
            created_at: Set(Utc::now()),
        }
    }
}

impl Model {
    /// Retrieves all the counters stored for the provided hero
    ///
    /// `db`      The database connection
    /// `hero_id` The ID of the hero to find counters for
    pub async fn by_hero<C: ConnectionTrait>(db: &C, hero_id: HeroID) -> DbResult<Vec<Self>> {
        Entity::find()
            .filter(Column::HeroId.eq(hero_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Finds a specific counter which must belong to the provided hero
    ///
    /// `db`      The database connection
    /// `hero_id` The ID of the hero the counter belongs to
    /// `id`      The ID of the counter
    pub async fn by_hero_and_id<C: ConnectionTrait>(
        db: &C,
        hero_id: HeroID,
        id: CounterID,
    ) -> DbResult<Option<Self>> {
        Entity::find_by_id(id)
            .filter(Column::HeroId.eq(hero_id))
            .one(db)
            .await
    }

    /// Stores a counter for the provided hero. A hero can only be listed
    /// once as a counter for the same hero so an existing pair has its win
    /// rate and reason replaced instead. The stored counter is returned.
    ///
    /// `db`      The database connection
    /// `hero_id` The ID of the hero being countered
    /// `entry`   The counter details
    pub async fn upsert<C: ConnectionTrait>(
        db: &C,
        hero_id: HeroID,
        entry: CounterEntry,
    ) -> DbResult<Self> {
        let counter_hero_id = entry.counter_hero_id;

        Entity::insert(entry.into_active_model(hero_id))
            .on_conflict(
                OnConflict::columns([Column::HeroId, Column::CounterHeroId])
                    .update_columns([Column::WinRate, Column::Reason])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Entity::find()
            .filter(
                Column::HeroId
                    .eq(hero_id)
                    .and(Column::CounterHeroId.eq(counter_hero_id)),
            )
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Stored hero counter missing".to_string()))
    }

    /// Bulk inserts derived counters for the provided hero. Pairs that
    /// already exist are left untouched so concurrent inserts for the same
    /// hero cannot duplicate rows. Returns the number of inserted rows.
    ///
    /// `db`      The database connection
    /// `hero_id` The ID of the hero being countered
    /// `entries` The counters to insert
    pub async fn insert_missing<C: ConnectionTrait>(
        db: &C,
        hero_id: HeroID,
        entries: Vec<CounterEntry>,
    ) -> DbResult<u64> {
        if entries.is_empty() {
            return Ok(0);
        }

        Entity::insert_many(
            entries
                .into_iter()
                .map(|entry| entry.into_active_model(hero_id)),
        )
        .on_conflict(
            OnConflict::columns([Column::HeroId, Column::CounterHeroId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
    }

    /// Updates the provided fields of the counter, `None` leaves the
    /// field untouched while `Some(None)` clears it
    pub async fn update<C: ConnectionTrait>(
        self,
        db: &C,
        win_rate: Option<Option<f64>>,
        reason: Option<Option<String>>,
    ) -> DbResult<Self> {
        let mut active = self.clone().into_active_model();

        if let Some(win_rate) = win_rate {
            active.win_rate = Set(win_rate);
        }

        if let Some(reason) = reason {
            active.reason = Set(reason);
        }

        if !active.is_changed() {
            return Ok(self);
        }

        active.update(db).await
    }

    /// Deletes the counter
    pub async fn delete<C: ConnectionTrait>(self, db: &C) -> DbResult<()> {
        self.into_active_model().delete(db).await?;
        Ok(())
    }
}
