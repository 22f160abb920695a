//! # vc-db
//!
//! Storage layer implementing the vc-core ports.
//!
//! ## Overview
//!
//! - Connection pool management and runtime migrations
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - [`PgVoiceStore`] / [`PgUnitOfWork`]: PostgreSQL, one transaction per unit of work
//! - [`MemoryVoiceStore`]: in-process store with the same commit/rollback semantics
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vc_db::{create_pool, DatabaseConfig, PgVoiceStore};
//! use vc_core::traits::VoiceStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     let store = PgVoiceStore::new(pool);
//!     let mut uow = store.begin().await?;
//!     // ... accounting writes ...
//!     uow.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, default_migrations_dir, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{MemoryUnitOfWork, MemoryVoiceStore, PgUnitOfWork, PgVoiceStore};
