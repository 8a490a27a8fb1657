use super::dialogs::{open_url, show_dialog};
use crate::constants::{ACCESSIBILITY_SETTINGS_URL, NOTIFICATION_TIMEOUT_MS};
use log::{debug, warn};
use std::thread;

/// User notification boundary
pub trait Notifier {
    /// Modal alert; must not block the caller
    fn alert(&self, title: &str, body: &str, buttons: &[&str]);
    /// Transient banner
    fn banner(&self, title: &str, body: &str);
}

/// Dialogs via osascript, banners via the notification center
///
/// Clicking the first alert button opens the Accessibility privacy pane.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn alert(&self, title: &str, body: &str, buttons: &[&str]) {
        let title = title.to_string();
        let body = body.to_string();
        let buttons: Vec<String> = buttons.iter().map(|b| b.to_string()).collect();

        // The dialog is modal; keep it off the run loop thread
        let spawned = thread::Builder::new()
            .name("permission-alert".to_string())
            .spawn(move || {
                let labels: Vec<&str> = buttons.iter().map(String::as_str).collect();
                match show_dialog(&title, &body, &labels) {
                    Ok(Some(0)) => {
                        if let Err(e) = open_url(ACCESSIBILITY_SETTINGS_URL) {
                            warn!("Failed to open System Settings: {:#}", e);
                        }
                    }
                    Ok(choice) => debug!("Alert closed with {:?}", choice),
                    Err(e) => warn!("Failed to show alert: {:#}", e),
                }
            });

        if let Err(e) = spawned {
            warn!("Failed to spawn alert thread: {}", e);
        }
    }

    fn banner(&self, title: &str, body: &str) {
        let result = notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .timeout(notify_rust::Timeout::Milliseconds(NOTIFICATION_TIMEOUT_MS))
            .show();

        if let Err(e) = result {
            warn!("Failed to show notification: {}", e);
        }
    }
}
