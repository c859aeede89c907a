// HTTP routes
pub mod chat;
pub mod health;
pub mod upload;

pub use chat::*;
pub use health::*;
pub use upload::*;
