//! Desktop notification and sound collaborators.
//!
//! Everything here is best-effort: delivery failures are logged and never
//! reach the caller.

#![warn(missing_docs)]

pub mod notifier;
pub mod desktop;
pub mod sound;
pub mod recording;

pub use notifier::{LogNotifier, Notifier, NullNotifier, Permission};
pub use desktop::DesktopNotifier;
pub use sound::{open_sound, play_detached, SoundError};
pub use recording::{NotifierCall, RecordingNotifier};
