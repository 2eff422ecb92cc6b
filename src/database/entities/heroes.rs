use crate::{database::DbResult, utils::types::HeroID};
use sea_orm::{entity::prelude::*, ConnectionTrait, FromJsonQueryResult, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Structure for a playable hero, seeded from the stats provider
#[derive(Serialize, Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "heroes")]
pub struct Model {
    /// Identifier of the hero, this is the stats provider ID rather
    /// than an auto incremented one
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: HeroID,
    /// Internal name of the hero (e.g. npc_dota_hero_axe)
    pub name: String,
    /// Display name of the hero
    pub localized_name: String,
    /// Primary attribute (str, agi, int, all)
    pub primary_attr: Option<String>,
    /// Melee or Ranged
    pub attack_type: Option<String>,
    /// Roles the hero is suited for
    pub roles: HeroRoles,
    #[serde(skip)]
    pub created_at: DateTimeUtc,
    #[serde(skip)]
    pub updated_at: DateTimeUtc,
}

/// List of hero role names stored as a JSON column
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct HeroRoles(pub Vec<String>);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::hero_builds::Entity")]
    Builds,
}

impl Related<super::hero_builds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Builds.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Retrieves every stored hero ordered by ID
    pub async fn all<C: ConnectionTrait>(db: &C) -> DbResult<Vec<Self>> {
        Entity::find().order_by_asc(Column::Id).all(db).await
    }

    /// Finds the hero with the provided ID
    ///
    /// `db` The database connection
    /// `id` The ID of the hero
    pub async fn by_id<C: ConnectionTrait>(db: &C, id: HeroID) -> DbResult<Option<Self>> {
        Entity::find_by_id(id).one(db).await
    }

    /// Finds the heroes with the provided IDs
    pub async fn by_ids<C: ConnectionTrait>(db: &C, ids: Vec<HeroID>) -> DbResult<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Entity::find().filter(Column::Id.is_in(ids)).all(db).await
    }

    /// Filters the provided IDs down to the ones which belong to
    /// a stored hero
    ///
    /// `db`  The database connection
    /// `ids` The hero IDs to check
    pub async fn existing_ids<C: ConnectionTrait>(
        db: &C,
        ids: Vec<HeroID>,
    ) -> DbResult<HashSet<HeroID>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<HeroID> = Entity::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::Id.is_in(ids))
            .into_tuple()
            .all(db)
            .await?;

        Ok(ids.into_iter().collect())
    }

    /// Bulk inserts the provided heroes, used when seeding the
    /// freshly created database
    ///
    /// `db`     The database connection
    /// `heroes` The heroes to insert
    pub async fn insert_all<C: ConnectionTrait>(db: &C, heroes: Vec<Self>) -> DbResult<u64> {
        if heroes.is_empty() {
            return Ok(0);
        }

        Entity::insert_many(heroes.into_iter().map(ActiveModel::from))
            .exec_without_returning(db)
            .await
    }
}
