pub mod dialogs;
pub mod notifications;

pub use notifications::{DesktopNotifier, Notifier};
