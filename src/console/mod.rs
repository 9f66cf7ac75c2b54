//! Operator-side client for the admin API.
//!
//! Holds the session token, talks to the REST surface, and derives the
//! filtered lists and summary figures shown on each console view.

pub mod client;
pub mod filter;
pub mod messages;
pub mod session;
pub mod views;

pub use client::{ApiClient, ConsoleError};
pub use session::Session;
