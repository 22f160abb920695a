//! Model to entity mappers
//!
//! `From<Model> for Entity` conversions for rows read back from PostgreSQL.

mod guild;
mod member;
mod session;
mod summary;
mod user;
