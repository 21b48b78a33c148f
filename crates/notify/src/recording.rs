//! Recording notifier for tests and dry runs.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::notifier::{Notifier, Permission};

/// A call made against a [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    /// `request_permission`
    RequestPermission,
    /// `notify`
    Notify {
        /// Notification title
        title: String,
        /// Notification body
        body: String,
    },
    /// `play_sound`
    PlaySound(PathBuf),
}

/// Notifier that records every call instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    permission: Mutex<Permission>,
    granted_on_request: Permission,
    calls: Mutex<Vec<NotifierCall>>,
}

impl RecordingNotifier {
    /// Recorder that grants permission when asked.
    pub fn granting() -> Self {
        Self::answering(Permission::Granted)
    }

    /// Recorder that denies permission when asked.
    pub fn denying() -> Self {
        Self::answering(Permission::Denied)
    }

    fn answering(answer: Permission) -> Self {
        Self {
            granted_on_request: answer,
            ..Self::default()
        }
    }

    /// Snapshot of all calls so far.
    pub fn calls(&self) -> Vec<NotifierCall> {
        lock(&self.calls).clone()
    }

    /// Notifications shown so far as `(title, body)`.
    pub fn notifications(&self) -> Vec<(String, String)> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                NotifierCall::Notify { title, body } => Some((title.clone(), body.clone())),
                _ => None,
            })
            .collect()
    }

    /// Sounds played so far.
    pub fn sounds(&self) -> Vec<PathBuf> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                NotifierCall::PlaySound(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn request_permission(&self) -> Permission {
        lock(&self.calls).push(NotifierCall::RequestPermission);
        let mut permission = lock(&self.permission);
        if *permission == Permission::Default {
            *permission = self.granted_on_request;
        }
        *permission
    }

    fn permission(&self) -> Permission {
        *lock(&self.permission)
    }

    fn notify(&self, title: &str, body: &str) {
        lock(&self.calls).push(NotifierCall::Notify {
            title: title.to_string(),
            body: body.to_string(),
        });
    }

    fn play_sound(&self, path: &Path) {
        lock(&self.calls).push(NotifierCall::PlaySound(path.to_path_buf()));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() {
        let notifier = RecordingNotifier::granting();
        assert_eq!(notifier.permission(), Permission::Default);
        assert_eq!(notifier.request_permission(), Permission::Granted);
        notifier.play_sound(Path::new("ding.mp3"));
        notifier.notify("Hello", "World");

        assert_eq!(
            notifier.calls(),
            vec![
                NotifierCall::RequestPermission,
                NotifierCall::PlaySound(PathBuf::from("ding.mp3")),
                NotifierCall::Notify {
                    title: "Hello".to_string(),
                    body: "World".to_string(),
                },
            ]
        );
        assert_eq!(notifier.sounds(), vec![PathBuf::from("ding.mp3")]);
        assert_eq!(notifier.notifications().len(), 1);
    }

    #[test]
    fn test_denying_recorder() {
        let notifier = RecordingNotifier::denying();
        assert_eq!(notifier.request_permission(), Permission::Denied);
        assert!(!notifier.permission().is_granted());
    }
}
