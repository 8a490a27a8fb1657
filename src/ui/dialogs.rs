//! Modal dialogs through `osascript`

use anyhow::{bail, Context, Result};
use log::debug;
use std::process::Command;

/// Escape text for use inside an AppleScript string literal
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// AppleScript for a `display dialog` with the given buttons
///
/// The first button is the default.
pub fn dialog_script(title: &str, message: &str, buttons: &[&str]) -> String {
    let button_list = buttons
        .iter()
        .map(|button| format!("\"{}\"", escape(button)))
        .collect::<Vec<_>>()
        .join(", ");

    let mut script = format!(
        r#"display dialog "{}" with title "{}" buttons {{{}}}"#,
        escape(message),
        escape(title),
        button_list
    );
    if let Some(default) = buttons.first() {
        script.push_str(&format!(r#" default button "{}""#, escape(default)));
    }
    script
}

/// Index of the clicked button from `display dialog` output
///
/// osascript prints `button returned:<label>`.
pub fn parse_button_returned(output: &str, buttons: &[&str]) -> Option<usize> {
    let label = output
        .lines()
        .find_map(|line| line.trim().strip_prefix("button returned:"))?
        .split(", gave up:")
        .next()?
        .trim();

    buttons.iter().position(|button| *button == label)
}

/// Show a blocking dialog and report which button was clicked
///
/// Returns `Ok(None)` when the dialog is cancelled or closed.
pub fn show_dialog(title: &str, message: &str, buttons: &[&str]) -> Result<Option<usize>> {
    let script = dialog_script(title, message, buttons);

    let output = Command::new("osascript")
        .arg("-e")
        .arg(&script)
        .output()
        .context("Failed to run osascript")?;

    if !output.status.success() {
        // User cancelled (error -128) or no GUI session
        debug!(
            "Dialog dismissed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return Ok(None);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_button_returned(&stdout, buttons))
}

/// Open a URL with the system handler
pub fn open_url(url: &str) -> Result<()> {
    let status = Command::new("open")
        .arg(url)
        .status()
        .with_context(|| format!("Failed to run open for {}", url))?;

    if !status.success() {
        bail!("open {} exited with {}", url, status);
    }
    Ok(())
}
