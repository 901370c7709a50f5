use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BrowseError {
    #[error("requested path resolves outside the base directory")]
    OutOfBounds,

    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BrowseError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BrowseError::Read {
            path: path.into(),
            source,
        }
    }

    /// Message safe to hand back to a client: no paths, no OS error text.
    pub fn public_message(&self) -> &'static str {
        match self {
            BrowseError::OutOfBounds => "Requested path is outside the allowed directory",
            BrowseError::Read { .. } => "Unable to read the requested directory",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("base directory '{}' is not usable: {source}", .path.display())]
    BaseDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("base directory '{}' is not a directory", .0.display())]
    BaseNotDirectory(PathBuf),

    #[error("invalid PORT value '{0}'")]
    Port(String),
}

impl From<ConfigError> for io::Error {
    fn from(e: ConfigError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, e)
    }
}
