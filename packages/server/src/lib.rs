// Document QA Server - API Core
//
// HTTP front door for the doc-rag pipeline: PDF upload and ingestion,
// chat queries against the active document.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
