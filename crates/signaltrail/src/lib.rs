//! `signaltrail` - Log where your Wi-Fi takes you
//!
//! This library provides the core functionality for watching Wi-Fi
//! association changes and appending IP-based geolocations to a
//! persistent route log that can be parsed and summarized.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod geo;
pub mod logging;
pub mod monitor;
pub mod motivator;
pub mod route;
pub mod signal;
pub mod store;

pub use config::Config;
pub use detector::{TransitionDetector, Trigger, TriggerKind};
pub use error::{Error, Result};
pub use geo::{GeoFix, GeoResolver};
pub use logging::init_logging;
pub use route::{RoutePoint, RouteSummary};
pub use signal::{SignalSample, SignalSource};
pub use store::RouteStore;
