use crate::{
    database::DbResult,
    utils::types::{HeroID, SynergyID},
};
use chrono::Utc;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{NotSet, Set},
    ConnectionTrait,
};
use serde::Serialize;

/// Structure for a hero that pairs well with another hero. Synergies
/// are not derived from the stats provider and no route exposes them.
#[derive(Serialize, Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hero_synergies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: SynergyID,
    pub hero_id: HeroID,
    pub synergy_hero_id: HeroID,
    pub win_rate: Option<f64>,
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
        from = "Column::SynergyHeroId",
        to = "super::heroes::Column::Id"
    )]
    SynergyHero,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        hero_id: HeroID,
        synergy_hero_id: HeroID,
        win_rate: Option<f64>,
        reason: Option<String>,
    ) -> DbResult<Self> {
        ActiveModel {
            id: NotSet,
            hero_id: Set(hero_id),
            synergy_hero_id: Set(synergy_hero_id),
            win_rate: Set(win_rate),
            reason: Set(reason),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
    }

    pub async fn by_hero<C: ConnectionTrait>(db: &C, hero_id: HeroID) -> DbResult<Vec<Self>> {
        Entity::find()
            .filter(Column::HeroId.eq(hero_id))
            .all(db)
            .await
    }
}
