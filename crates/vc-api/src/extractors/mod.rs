//! Axum extractors for request handling
//!
//! Custom extractors for path IDs, query strings, and JSON bodies that
//! reject with [`ApiError`](crate::response::ApiError).

mod path;
mod validated;

pub use path::{GuildIdPath, GuildUserChannelPath, GuildUserPath, UserIdPath};
pub use validated::{JsonBody, ValidatedJson, ValidatedQuery};
