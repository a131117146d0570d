//! # Press Shared
//!
//! Wire types shared by the HTTP surfaces: request/response DTOs, the public
//! post resource and the error bodies.

pub mod dto;
pub mod resource;
pub mod response;

pub use resource::PostResource;
pub use response::{ErrorResponse, MessageResponse, ValidationErrorResponse};
