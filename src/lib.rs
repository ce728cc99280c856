pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod delta;
pub mod error;
pub mod ingest;
pub mod model;
pub mod report;
pub mod table;
