pub mod auction;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod money;
pub mod query;
pub mod router;
pub mod scheduler;
pub mod store;

pub use router::build_router;
