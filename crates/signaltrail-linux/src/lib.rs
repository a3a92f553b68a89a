//! Linux-specific Wi-Fi queries for signaltrail
//!
//! Queries the active Wi-Fi association through NetworkManager's `nmcli`
//! in terse mode and parses the result into a platform-neutral status.

#![cfg(target_os = "linux")]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::Command;

use thiserror::Error;

/// Stand-in SSID for an association whose SSID is not broadcast.
pub const HIDDEN_SSID: &str = "Connected (Hidden)";

/// Errors from querying the Wi-Fi state.
#[derive(Debug, Error)]
pub enum WifiQueryError {
    /// `nmcli` could not be executed.
    #[error("failed to run nmcli: {0}")]
    Exec(#[from] std::io::Error),

    /// `nmcli` ran but exited with a failure status.
    #[error("nmcli exited with status {0}")]
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
/// Returns an error if `nmcli` cannot be run or exits unsuccessfully.
pub fn query_wifi() -> Result<WifiStatus, WifiQueryError> {
    let output = Command::new("nmcli")
        .args(["-t", "-f", "ACTIVE,SSID,SIGNAL", "dev", "wifi"])
        .output()?;

    if !output.status.success() {
        return Err(WifiQueryError::Failed(output.status));
    }

    let status = parse_nmcli_output(&String::from_utf8_lossy(&output.stdout));
    tracing::trace!(ssid = status.ssid.as_deref().unwrap_or("-"), quality = status.quality, "nmcli query complete");
    Ok(status)
}

/// Parse `nmcli -t -f ACTIVE,SSID,SIGNAL dev wifi` output.
///
/// Terse-mode rows are colon-separated, `yes:MyNet:82`, with colons in
/// SSIDs escaped as `\:`. Only the active row matters; no active row
/// means no association.
fn parse_nmcli_output(stdout: &str) -> WifiStatus {
    for line in stdout.lines() {
        let Some(rest) = line.strip_prefix("yes:") else {
            continue;
        };

        // SIGNAL is the last field and never contains a colon.
        let (ssid_raw, signal_raw) = match rest.rsplit_once(':') {
            Some(parts) => parts,
            None => (rest, ""),
        };

        let ssid = ssid_raw.replace("\\:", ":");
        let quality = signal_raw.trim().parse::<u8>().unwrap_or(0).min(100);

        return WifiStatus {
            ssid: Some(if ssid.is_empty() {
                HIDDEN_SSID.to_string()
            } else {
                ssid
            }),
            quality,
        };
    }

    WifiStatus::disconnected()
}
