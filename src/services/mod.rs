//! Business logic services.

pub mod auth;
pub mod bet;
pub mod blog;
pub mod dashboard;
pub mod flight;
pub mod flight_plan;
pub mod import;
pub mod media;
pub mod payout;
pub mod player;
pub mod product;
pub mod setting;
pub mod sparepart;
