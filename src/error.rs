use std::fmt;
use std::path::PathBuf;

/// Everything that can go wrong outside of pure game logic.
///
/// Resource and draw failures are soft: callers log them and keep running.
#[derive(Debug)]
pub enum Error {
    /// A texture, music file or device could not be loaded/opened.
    ResourceLoad { path: PathBuf, reason: String },
    /// A draw call could not be completed.
    Draw(String),
    /// A key or mouse-button index outside the tracked range.
    OutOfRange {
        what: &'static str,
        index: usize,
        max: usize,
    },
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceLoad { path, reason } => {
                write!(f, "cannot load {}: {}", path.display(), reason)
            }
            Self::Draw(msg) => write!(f, "draw failed: {msg}"),
            Self::OutOfRange { what, index, max } => {
                write!(f, "{what} index {index} out of range (max {max})")
            }
            Self::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
