//! dao-console: session core of a DAO management console
//!
//! Two panels share one runtime:
//!
//! - [`assets::AssetLibrary`] merges the caller's assets with the public
//!   listing, reports storage utilization and drives uploads with a
//!   simulated progress indicator.
//! - [`overview::OverviewPanel`] aggregates governance, staking and
//!   treasury statistics into dashboard figures with fallbacks for sources
//!   that have not reported yet.
//!
//! Backends are reached through the traits in [`sources`]; the bundled
//! [`sources::fixture::FixtureBackend`] serves a JSON document from memory.

pub mod assets;
pub mod config;
pub mod error;
pub mod format;
pub mod loading;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod model;
pub mod notify;
pub mod orchestrator;
pub mod overview;
pub mod sources;
pub mod telemetry;

pub use error::{Error, Result};
