//! HTTP-level tests over in-memory adapters.

#[macro_use]
mod support;

mod api_posts;
