//! Scoring engine and contest plumbing for prop-bet pools.

pub mod config;
pub mod contest;
pub mod error;
pub mod telemetry;
