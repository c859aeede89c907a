//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod pdf;
pub mod traits;

pub use deps::{AppSupervisor, ServerDeps};
pub use pdf::{elements_from_pages, PdfElementExtractor};
pub use traits::*;
