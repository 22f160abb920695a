//! Store implementations
//!
//! PostgreSQL and in-memory implementations of the storage ports defined in
//! vc-core. Writes go through a unit of work wrapping one transaction; the
//! write-side traits are implemented in one file per concern.

mod error;
mod identity;
mod memory;
mod session;
mod store;
mod summary;
mod unit_of_work;

pub use memory::{MemoryUnitOfWork, MemoryVoiceStore};
pub use store::PgVoiceStore;
pub use unit_of_work::PgUnitOfWork;
