pub mod nullable;
pub mod types;
