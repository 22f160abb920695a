//! # vc-service
//!
//! Application layer: the session accounting engine, the ranking and
//! summary queries, guild settings, and the DTOs the API serializes.

pub mod dto;
pub mod services;

pub use services::{
    AccountingService, IdentityService, QueryService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
