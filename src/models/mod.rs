//! Database models and DTOs for all domain entities.

pub mod admin;
pub mod bet;
pub mod blog;
pub mod date_range;
pub mod flight;
pub mod flight_plan;
pub mod pagination;
pub mod payout;
pub mod player;
pub mod product;
pub mod setting;
pub mod sparepart;
