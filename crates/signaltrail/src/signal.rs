//! Wi-Fi signal sampling for signaltrail.
//!
//! This module defines the sample type produced by each poll, the
//! [`SignalSource`] trait that platform implementations fulfill, and the
//! fixed source used when a quality override is configured.
//!
//! A sample's network identity distinguishes three situations: a real
//! association (the SSID), a sentinel string ("Not Connected" or "Error")
//! when the OS query found no association or failed, and an absent identity
//! when the sample is simulated via an override.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;

/// Sentinel identity reported when no network association exists.
pub const NOT_CONNECTED: &str = "Not Connected";

/// Sentinel identity reported when the OS signal query failed.
pub const QUERY_ERROR: &str = "Error";

/// Identity reported for an association whose SSID is hidden.
pub const HIDDEN_NETWORK: &str = "Connected (Hidden)";

/// One Wi-Fi signal poll result.
///
/// Produced fresh each poll cycle and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSample {
    /// Signal quality percentage, 0-100.
    pub quality: u8,

    /// The network identity, or `None` for a simulated sample.
    pub ssid: Option<String>,
}

impl SignalSample {
    /// Create a sample for a real association.
    #[must_use]
    pub fn connected(quality: u8, ssid: impl Into<String>) -> Self {
        Self {
            quality,
            ssid: Some(ssid.into()),
        }
    }

    /// Create a sample reporting no association.
    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            quality: 0,
            ssid: Some(NOT_CONNECTED.to_string()),
        }
    }

    /// Create a sample reporting a failed OS query.
    #[must_use]
    pub fn query_error() -> Self {
        Self {
            quality: 0,
            ssid: Some(QUERY_ERROR.to_string()),
        }
    }

    /// Create a simulated sample carrying no network identity.
    #[must_use]
    pub fn simulated(quality: u8) -> Self {
        Self {
            quality,
            ssid: None,
        }
    }

    /// The network identity, if this sample represents a real association.
    ///
    /// Returns `None` for simulated samples and for the sentinel
    /// "Not Connected" / "Error" identities.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        match self.ssid.as_deref() {
            Some(ssid) if ssid != NOT_CONNECTED && ssid != QUERY_ERROR => Some(ssid),
            _ => None,
        }
    }

    /// Whether this sample represents a real association.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.identity().is_some()
    }
}

/// A source of Wi-Fi signal samples.
///
/// Implementations query the operating system, or return a fixed value
/// injected from configuration for testing and simulation.
pub trait SignalSource: Send + Sync {
    /// The name of this source (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Take one signal sample.
    ///
    /// # Errors
    ///
    /// Returns an error only when the source itself is unusable; an OS
    /// query that runs but finds no association reports a sentinel sample
    /// instead.
    fn sample(&self) -> Result<SignalSample>;
}

/// A source that always reports a fixed, simulated quality.
#[derive(Debug, Clone, Copy)]
pub struct FixedSignal {
    quality: u8,
}

impl FixedSignal {
    /// Create a fixed source reporting the given quality percentage.
    #[must_use]
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }
}

impl SignalSource for FixedSignal {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn sample(&self) -> Result<SignalSample> {
        Ok(SignalSample::simulated(self.quality))
    }
}

/// The operating system's Wi-Fi signal source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSignal;

impl OsSignal {
    /// Create an OS-backed signal source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "linux")]
impl SignalSource for OsSignal {
    fn name(&self) -> &'static str {
        "nmcli"
    }

    fn sample(&self) -> Result<SignalSample> {
        match signaltrail_linux::query_wifi() {
            Ok(status) => Ok(match status.ssid {
                Some(ssid) => SignalSample::connected(status.quality, ssid),
                None => SignalSample::disconnected(),
            }),
            Err(err) => {
                tracing::warn!("wifi query failed: {err}");
                Ok(SignalSample::query_error())
            }
        }
    }
}

#[cfg(target_os = "windows")]
impl SignalSource for OsSignal {
    fn name(&self) -> &'static str {
        "netsh"
    }

    fn sample(&self) -> Result<SignalSample> {
        match signaltrail_windows::query_wifi() {
            Ok(status) => Ok(match status.ssid {
                Some(ssid) => SignalSample::connected(status.quality, ssid),
                None => SignalSample::disconnected(),
            }),
            Err(err) => {
                tracing::warn!("wifi query failed: {err}");
                Ok(SignalSample::query_error())
            }
        }
    }
}

/// Build the signal source described by the configuration.
///
/// A configured quality override yields a [`FixedSignal`]; otherwise the
/// platform's OS query is used.
///
/// # Errors
///
/// Returns an error if no override is set and this platform has no OS
/// signal source.
pub fn source_from_config(config: &Config) -> Result<Box<dyn SignalSource>> {
    if let Some(quality) = config.signal.quality_override {
        tracing::info!("using fixed signal override ({quality}%)");
        return Ok(Box::new(FixedSignal::new(quality)));
    }

    #[cfg(any(target_os = "linux", target_os = "windows"))]
    {
        Ok(Box::new(OsSignal::new()))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Err(crate::error::Error::SignalSourceUnavailable(format!(
            "no Wi-Fi query implemented for {}; set signal.quality_override",
            std::env::consts::OS
        )))
    }
}
