//! Comfort, empathy, and humor review of pharmaceutical influencer scripts.
//!
//! The [`review`] module holds the scoring pipeline. Everything else is the
//! ambient plumbing shared with the command-line front end.

pub mod config;
pub mod error;
pub mod review;
pub mod telemetry;
