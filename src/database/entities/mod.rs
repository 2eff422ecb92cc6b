pub mod build_comments;
pub mod hero_builds;
pub mod hero_counters;
pub mod hero_synergies;
pub mod heroes;
pub mod match_analyses;

pub type Hero = heroes::Model;
pub type HeroCounter = hero_counters::Model;
pub type HeroSynergy = hero_synergies::Model;
pub type HeroBuild = hero_builds::Model;
pub type BuildComment = build_comments::Model;
pub type MatchAnalysis = match_analyses::Model;

pub use hero_builds::IdList;
pub use heroes::HeroRoles;
