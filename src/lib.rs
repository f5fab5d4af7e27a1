//! Thames Tides Library
//!
//! Fetches PLA tide predictions, caches them by site and calendar quarter,
//! and linearly interpolates tidal heights at arbitrary times.

pub mod cache;
pub mod cli;
pub mod client;
pub mod data;
pub mod error;
pub mod output;
pub mod query;

pub use client::TideClient;
pub use error::TideError;
