//! Middleware, extractors and error responses.

pub mod auth;
pub mod error;
pub mod form;
mod request_id;

pub use request_id::RequestIdMiddleware;
