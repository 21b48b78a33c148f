//! Notifier trait and the trivial implementations.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Whether the user allows system notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not asked yet
    #[default]
    Default,
    /// Notifications may be shown
    Granted,
    /// Notifications must not be shown
    Denied,
}

impl Permission {
    /// Whether notifications may be shown.
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Notification and audio capabilities.
///
/// Implementations must never block on delivery and must swallow their
/// own failures.
pub trait Notifier: Send + Sync {
    /// Ask for notification permission and remember the answer.
    fn request_permission(&self) -> Permission;

    /// Current permission without asking.
    fn permission(&self) -> Permission;

    /// Show a system notification.
    fn notify(&self, title: &str, body: &str);

    /// Start playing a sound file.
    fn play_sound(&self, path: &Path);
}

/// Notifier that writes everything to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn notify(&self, title: &str, body: &str) {
        info!("{}: {}", title, body);
    }

    fn play_sound(&self, path: &Path) {
        info!("Playing {}", path.display());
    }
}

/// Notifier that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn request_permission(&self) -> Permission {
        Permission::Denied
    }

    fn permission(&self) -> Permission {
        Permission::Denied
    }

    fn notify(&self, _title: &str, _body: &str) {}

    fn play_sound(&self, _path: &Path) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_default_is_not_granted() {
        assert_eq!(Permission::default(), Permission::Default);
        assert!(!Permission::default().is_granted());
        assert!(Permission::Granted.is_granted());
        assert!(!Permission::Denied.is_granted());
    }

    #[test]
    fn test_null_notifier_denies() {
        let notifier = NullNotifier;
        assert_eq!(notifier.request_permission(), Permission::Denied);
        notifier.notify("title", "body");
        notifier.play_sound(Path::new("missing.mp3"));
    }

    #[test]
    fn test_log_notifier_grants() {
        assert!(LogNotifier.request_permission().is_granted());
        assert!(LogNotifier.permission().is_granted());
    }
}
