//! Matchmaking backend: proximity-ranked recommendations, swipes, and
//! mutual-interest tracking.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
