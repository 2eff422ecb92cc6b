/// CORS headers for browser clients
pub mod cors;
/// Path extractor for route IDs
pub mod id_path;
