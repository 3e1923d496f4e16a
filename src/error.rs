//! Engine error types
//!
//! Startup loading is the only fallible stage. Every asset, level and settings
//! problem surfaces here so `main` can abort with a clear diagnostic instead of
//! running with half-loaded resources.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum EngineError {
    /// A required file does not exist
    MissingAsset(PathBuf),
    /// Filesystem error while reading or writing
    Io { path: PathBuf, source: std::io::Error },
    /// Image could not be decoded
    Image { path: PathBuf, message: String },
    /// Level bitmap is not 32 bits per pixel
    UnsupportedFormat { path: PathBuf, found: String },
    /// Level bitmap decoded but is unusable (no START tile, zero size)
    InvalidLevel { path: PathBuf, reason: String },
    /// No level files found in the levels directory
    NoLevels(PathBuf),
    /// The engine was handed an empty level list
    EmptyLevelList,
    /// Settings or replay JSON could not be parsed
    Parse { path: PathBuf, message: String },
}

impl EngineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            EngineError::MissingAsset(path)
        } else {
            EngineError::Io { path, source }
        }
    }

    pub fn image(path: impl Into<PathBuf>, err: image::ImageError) -> Self {
        let path = path.into();
        match err {
            image::ImageError::IoError(source) => EngineError::io(path, source),
            other => EngineError::Image {
                path,
                message: other.to_string(),
            },
        }
    }

    pub fn parse(path: impl Into<PathBuf>, err: serde_json::Error) -> Self {
        EngineError::Parse {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::MissingAsset(path) => write!(f, "missing file: {}", path.display()),
            EngineError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            EngineError::Image { path, message } => {
                write!(f, "could not decode {}: {}", path.display(), message)
            }
            EngineError::UnsupportedFormat { path, found } => write!(
                f,
                "{}: only 32-bit RGBA bitmaps are supported (found {})",
                path.display(),
                found
            ),
            EngineError::InvalidLevel { path, reason } => {
                write!(f, "invalid level {}: {}", path.display(), reason)
            }
            EngineError::NoLevels(dir) => write!(f, "no levels found in {}", dir.display()),
            EngineError::EmptyLevelList => write!(f, "no levels to play"),
            EngineError::Parse { path, message } => {
                write!(f, "could not parse {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::io(PathBuf::new(), e)
    }
}
