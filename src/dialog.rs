//! AppleScript dialogs shown from menu actions
//!
//! Menu actions run without a terminal, so input and confirmation go
//! through `osascript display dialog`. Cancelling a dialog makes osascript
//! exit non-zero, which is reported as "no answer" rather than an error.

use crate::TrackerError;
use std::process::Stdio;
use tokio::process::Command;

const OSASCRIPT: &str = "/usr/bin/osascript";

const PROMPT_SCRIPT: &str = r#"display dialog "Enter tracking number:" default answer "" buttons {"Cancel","Add"} default button "Add""#;

const CONFIRM_CLEAR_SCRIPT: &str =
    r#"display dialog "Clear all tracking numbers?" buttons {"Cancel","Clear"} default button "Clear""#;

/// Asks the user for a tracking number
///
/// # Returns
///
/// * `Ok(Some(number))` - The user entered a non-empty value
/// * `Ok(None)` - The dialog was cancelled or left empty
/// * `Err(TrackerError::Dialog)` - osascript could not be run
pub async fn prompt_tracking_number() -> Result<Option<String>, TrackerError> {
    Ok(run_dialog(PROMPT_SCRIPT)
        .await?
        .and_then(|stdout| parse_dialog_text(&stdout)))
}

/// Asks the user to confirm clearing every tracked package
pub async fn confirm_clear() -> Result<bool, TrackerError> {
    Ok(run_dialog(CONFIRM_CLEAR_SCRIPT)
        .await?
        .and_then(|stdout| parse_dialog_button(&stdout))
        .is_some_and(|button| button == "Clear"))
}

/// Runs one dialog script and returns its stdout, or `None` if cancelled
async fn run_dialog(script: &str) -> Result<Option<String>, TrackerError> {
    let output = Command::new(OSASCRIPT)
        .args(["-e", script])
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| TrackerError::Dialog(format!("failed to run {}: {}", OSASCRIPT, e)))?;

    if !output.status.success() {
        tracing::debug!("Dialog dismissed ({})", output.status);
        return Ok(None);
    }

    Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
}

/// Extracts the entered text from `display dialog` output
///
/// osascript prints `button returned:Add, text returned:<value>`.
pub fn parse_dialog_text(stdout: &str) -> Option<String> {
    let (_, value) = stdout.split_once("text returned:")?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Extracts the pressed button from `display dialog` output
pub fn parse_dialog_button(stdout: &str) -> Option<String> {
    let (_, rest) = stdout.split_once("button returned:")?;
    let button = rest.split(',').next()?.trim();
    if button.is_empty() {
        None
    } else {
        Some(button.to_string())
    }
}
