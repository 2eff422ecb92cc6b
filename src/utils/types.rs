use std::{future::Future, pin::Pin};

/// Types for differentiating between identifiers
pub type HeroID = i32;
pub type CounterID = i32;
pub type SynergyID = i32;
pub type BuildID = i32;
pub type CommentID = i32;
pub type AnalysisID = i32;
/// Match identifiers from the stats provider exceed 32 bits
pub type MatchID = i64;

/// Type for boxed futures
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
