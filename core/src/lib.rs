pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod units;

pub use error::HydrationError;
pub use units::Unit;
