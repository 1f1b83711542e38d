//! Weighted performance scoring for dealership sales teams.
//!
//! The [`scoreboard`] module carries the scoring engine and the roster it
//! evaluates; [`tenancy`] maps store keys to display labels and persisted
//! slots so different stores never share data.

pub mod config;
pub mod error;
pub mod scoreboard;
pub mod telemetry;
pub mod tenancy;
