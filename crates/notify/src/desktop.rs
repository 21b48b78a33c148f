//! Desktop notifier - `notify-send` for notifications, `rodio` for sounds.
//!
//! Notification processes are reaped and sounds are played on background
//! threads; nothing here waits for them to finish.

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;

use tracing::warn;

use crate::notifier::{Notifier, Permission};
use crate::sound::play_detached;

/// Notifier backed by the desktop session.
pub struct DesktopNotifier {
    app_name: String,
    permission: OnceLock<Permission>,
}

impl DesktopNotifier {
    /// Create a notifier that labels notifications with `app_name`.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            permission: OnceLock::new(),
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new("levelup")
    }
}

impl Notifier for DesktopNotifier {
    fn request_permission(&self) -> Permission {
        *self.permission.get_or_init(|| {
            if command_exists("notify-send") {
                Permission::Granted
            } else {
                Permission::Denied
            }
        })
    }

    fn permission(&self) -> Permission {
        self.permission.get().copied().unwrap_or_default()
    }

    fn notify(&self, title: &str, body: &str) {
        let result = Command::new("notify-send")
            .args(["--app-name", self.app_name.as_str(), "--icon", "dialog-information", title, body])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match result {
            Ok(child) => reap(child),
            Err(e) => warn!("Error sending desktop notification: {}", e),
        }
    }

    fn play_sound(&self, path: &Path) {
        play_detached(path);
    }
}

/// Wait for `child` on a detached thread so it does not linger as a zombie.
fn reap(mut child: Child) {
    std::thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => warn!("notify-send exited with {}", status),
        Ok(_) => {}
        Err(e) => warn!("Failed to reap child process: {}", e),
    });
}

fn command_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_is_default_until_requested() {
        let notifier = DesktopNotifier::new("levelup-test");
        assert_eq!(notifier.permission(), Permission::Default);

        let granted = notifier.request_permission();
        assert_ne!(granted, Permission::Default);
        assert_eq!(notifier.permission(), granted);
    }

    #[test]
    fn test_bad_sound_files_are_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = dir.path().join("garbage.mp3");
        std::fs::write(&garbage, b"not audio").unwrap();

        let notifier = DesktopNotifier::new("levelup-test");
        notifier.play_sound(Path::new("/definitely/not/here.mp3"));
        notifier.play_sound(&garbage);

        // Playback runs detached; the calls return and leave the notifier usable.
        assert_eq!(notifier.permission(), Permission::Default);
    }
}
