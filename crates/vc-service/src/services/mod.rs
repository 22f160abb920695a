//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] and opens its own
//! units of work; nothing here holds state between calls.

pub mod accounting;
pub mod context;
pub mod error;
pub mod identity;
pub mod query;

// Re-export all services for convenience
pub use accounting::AccountingService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use identity::IdentityService;
pub use query::{QueryScope, QueryService};
