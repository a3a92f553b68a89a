//! Windows-specific Wi-Fi queries for signaltrail
//!
//! Queries the active Wi-Fi association through `netsh wlan show
//! interfaces` and parses the result into a platform-neutral status.

#![cfg(target_os = "windows")]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::Command;

use thiserror::Error;

/// Stand-in SSID for an association whose SSID is not broadcast.
pub const HIDDEN_SSID: &str = "Connected (Hidden)";

/// Errors from querying the Wi-Fi state.
#[derive(Debug, Error)]
pub enum WifiQueryError {
    /// `netsh` could not be executed.
    #[error("failed to run netsh: {0}")]
    Exec(#[from] std::io::Error),

    /// `netsh` ran but exited with a failure status.
    #[error("netsh exited with status {0}")]
    Failed(std::process::ExitStatus),
}

/// Current Wi-Fi association as reported by the OS.
///
/// `ssid` is `None` when no network is associated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiStatus {
    /// SSID of the active network, or [`HIDDEN_SSID`] when hidden.
    pub ssid: Option<String>,
    /// Signal quality, 0-100.
    pub quality: u8,
}

impl WifiStatus {
    /// Status representing no active association.
    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            ssid: None,
            quality: 0,
        }
    }
}

/// Query the current Wi-Fi association.
///
/// # Errors
///
/// Returns an error if `netsh` cannot be run or exits unsuccessfully.
pub fn query_wifi() -> Result<WifiStatus, WifiQueryError> {
    let output = Command::new("netsh")
        .args(["wlan", "show", "interfaces"])
        .output()?;

    if !output.status.success() {
        return Err(WifiQueryError::Failed(output.status));
    }

    let status = parse_netsh_output(&String::from_utf8_lossy(&output.stdout));
    tracing::trace!(ssid = status.ssid.as_deref().unwrap_or("-"), quality = status.quality, "netsh query complete");
    Ok(status)
}

/// Value of the first `Name : value` line whose name matches exactly.
///
/// Matching on the full name keeps `SSID` from also matching `BSSID`.
fn field_value<'a>(stdout: &'a str, name: &str) -> Option<&'a str> {
    stdout.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == name).then(|| value.trim())
    })
}

/// Parse `netsh wlan show interfaces` output.
///
/// A missing SSID line means no association; an SSID line with an empty
/// value means a hidden network. Signal is reported as a percentage.
fn parse_netsh_output(stdout: &str) -> WifiStatus {
    let Some(ssid) = field_value(stdout, "SSID") else {
        return WifiStatus::disconnected();
    };

    let quality = field_value(stdout, "Signal")
        .and_then(|signal| signal.trim_end_matches('%').trim().parse::<u8>().ok())
        .unwrap_or(0)
        .min(100);

    WifiStatus {
        ssid: Some(if ssid.is_empty() {
            HIDDEN_SSID.to_string()
        } else {
            ssid.to_string()
        }),
        quality,
    }
}
