//! Shared types and models for the Laundry Advisor platform
//!
//! This crate contains types shared between the decision engine, the
//! weather-provider boundary, and any presentation layer built on top.

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
