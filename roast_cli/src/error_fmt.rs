//! Human-readable error descriptions and structured JSON error formatting.

use roast_core::error::{BuildError, SessionError};

/// Map an eyre::Report to a human-readable explanation with likely causes
/// and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(se) = err.downcast_ref::<SessionError>() {
        return match se {
            SessionError::ProtocolViolation(detail) => format!(
                "What happened: The device sent a malformed report line ({detail}).\nLikely causes: Firmware mismatch, line noise, or a wrong baud rate.\nHow to fix: Check [port].baud and the firmware version. The partial profile was still finalized."
            ),
            SessionError::Transport(detail) => format!(
                "What happened: The serial link failed ({detail}).\nLikely causes: Cable unplugged, port taken by another process, or device power loss.\nHow to fix: Re-check the connection and the [port].path setting. The partial profile was still finalized."
            ),
            SessionError::Timeout => "What happened: The device went silent past the read timeout.\nLikely causes: Device hung, wrong port, or timeout configured too low.\nHow to fix: Verify the port path and consider raising acquisition.read_timeout_ms.".to_string(),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("profile csv must have headers") {
        return "Invalid headers in profile CSV. Expected 'time,cold,hot,cracks'.".to_string();
    }

    if lower.contains("open serial port") {
        return "What happened: Failed to open the serial device.\nLikely causes: Wrong [port].path, missing permissions, or the device is not plugged in.\nHow to fix: Run the `ports` command to list devices, fix the config, and check group membership (e.g. dialout).".to_string();
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.chain().nth(1) {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes for scripting: protocol violations and transport
/// failures are distinguishable; everything else returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<SessionError>() {
        Some(SessionError::ProtocolViolation(_)) => 3,
        Some(SessionError::Transport(_) | SessionError::Timeout) => 4,
        None => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = match err.downcast_ref::<SessionError>() {
        Some(SessionError::ProtocolViolation(_)) => "ProtocolViolation",
        Some(SessionError::Transport(_)) => "TransportFailure",
        Some(SessionError::Timeout) => "TransportTimeout",
        None => "Error",
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
