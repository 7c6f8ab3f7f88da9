//! Data models for the catch log.
//!
//! Field names match the `catches` table columns and the frontend form.

mod catch;

pub use catch::*;
