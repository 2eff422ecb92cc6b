pub mod analyzer;
pub mod backfill;
pub mod provider;
