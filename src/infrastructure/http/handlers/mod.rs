//! HTTP Handlers

mod generate;
mod models;
mod ping;

pub use generate::*;
pub use models::*;
pub use ping::*;
