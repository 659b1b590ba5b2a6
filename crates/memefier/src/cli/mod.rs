//! Command handlers.

pub mod caption;
pub mod config;
pub mod stats;
pub mod vote;
