pub use sea_orm_migration::prelude::*;

mod m20241016_100000_heroes_table;
mod m20241016_100500_hero_counters_table;
mod m20241016_101000_hero_synergies_table;
mod m20241016_101500_hero_builds_table;
mod m20241016_102000_build_comments_table;
mod m20241016_102500_match_analyses_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241016_100000_heroes_table::Migration),
            Box::new(m20241016_100500_hero_counters_table::Migration),
            Box::new(m20241016_101000_hero_synergies_table::Migration),
            Box::new(m20241016_101500_hero_builds_table::Migration),
            Box::new(m20241016_102000_build_comments_table::Migration),
            Box::new(m20241016_102500_match_analyses_table::Migration),
        ]
    }
}
