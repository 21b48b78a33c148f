//! Sound playback through `rodio`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};
use tracing::{debug, warn};

/// Errors raised while preparing or playing a sound.
#[derive(Debug, thiserror::Error)]
pub enum SoundError {
    /// Sound file could not be opened
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a supported audio format
    #[error("decode error: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    /// No usable output device
    #[error("output stream error: {0}")]
    Stream(#[from] rodio::StreamError),

    /// Output device rejected playback
    #[error("playback error: {0}")]
    Play(#[from] rodio::PlayError),
}

/// Open and decode a sound file without playing it.
pub fn open_sound(path: &Path) -> Result<Decoder<BufReader<File>>, SoundError> {
    let file = File::open(path)?;
    Ok(Decoder::new(BufReader::new(file))?)
}

/// Play `path` on a detached thread. Failures are logged, never returned.
pub fn play_detached(path: &Path) {
    let path = path.to_path_buf();
    std::thread::spawn(move || {
        if let Err(e) = play_blocking(&path) {
            warn!("Failed to play {}: {}", path.display(), e);
        }
    });
}

fn play_blocking(path: &Path) -> Result<(), SoundError> {
    let source = open_sound(path)?;
    let (_stream, stream_handle) = OutputStream::try_default()?;
    let sink = Sink::try_new(&stream_handle)?;

    sink.append(source);
    sink.sleep_until_end();
    debug!("Finished playing {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let result = open_sound(Path::new("/definitely/not/here.mp3"));
        assert!(matches!(result, Err(SoundError::Io(_))));
    }

    #[test]
    fn test_undecodable_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, b"this is not audio at all").unwrap();

        let result = open_sound(&path);
        assert!(matches!(result, Err(SoundError::Decode(_))));
    }

    #[test]
    fn test_play_blocking_reports_missing_file() {
        let result = play_blocking(Path::new("/definitely/not/here.wav"));
        assert!(matches!(result, Err(SoundError::Io(_))));
    }
}
