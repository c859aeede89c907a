//! Data types shared across the ingestion and query pipelines.

pub mod chunk;
pub mod config;
pub mod element;
pub mod response;
pub mod retrieval;
pub mod table;
