//! Request extractors shared by the route handlers.

pub mod auth;
pub mod extract;
