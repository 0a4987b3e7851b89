pub mod ingest;
pub mod resolver;
