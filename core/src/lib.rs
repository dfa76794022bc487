//! Core simulation and control-state library for the Nexus device console.
//!
//! The modules mirror the panels of the operator dashboard while staying
//! headless: the signal generators, sweep engine, detection tracker and the
//! sonar activation machine are plain state driven by whichever front end
//! ticks them.

pub mod activation;
pub mod audio;
pub mod auth;
pub mod controls;
pub mod notify;
pub mod prelude;
pub mod signal;
pub mod sweep;
pub mod telemetry;
pub mod tracker;

pub use prelude::{SonarPhase, SonarStatus};
