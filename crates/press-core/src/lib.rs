//! # Press Core
//!
//! The domain layer of the Press blog service.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, validation rules, ports and the post service that ties them together.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod validation;

pub use error::DomainError;
pub use service::PostService;
