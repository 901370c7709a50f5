use crate::error::ConfigError;
use log::{debug, warn};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Settings {
    /// Canonical root every request is confined to.
    pub base_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsFiles>,
}

#[derive(Debug, Clone)]
pub struct TlsFiles {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl Settings {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Settings, ConfigError> {
        dotenv::dotenv().ok();

        let base_dir = match env::var("BASE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => env::current_dir().map_err(|source| ConfigError::BaseDir {
                path: PathBuf::from("."),
                source,
            })?,
        };
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port.parse::<u16>().map_err(|_| ConfigError::Port(port))?;

        let tls = match (env::var("CERT_PATH"), env::var("KEY_PATH")) {
            (Ok(cert), Ok(key)) => {
                let files = TlsFiles {
                    cert_path: PathBuf::from(cert),
                    key_path: PathBuf::from(key),
                };
                if files.cert_path.exists() && files.key_path.exists() {
                    Some(files)
                } else {
                    warn!("CERT_PATH or KEY_PATH points to a non-existent file. Starting without HTTPS.");
                    None
                }
            }
            _ => None,
        };

        Settings::new(base_dir, host, port, tls)
    }

    pub fn new(
        base_dir: impl AsRef<Path>,
        host: String,
        port: u16,
        tls: Option<TlsFiles>,
    ) -> Result<Settings, ConfigError> {
        let base_dir = canonical_base(base_dir.as_ref())?;
        debug!("Base directory resolved to {}", base_dir.display());
        Ok(Settings {
            base_dir,
            host,
            port,
            tls,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn canonical_base(path: &Path) -> Result<PathBuf, ConfigError> {
    let resolved = path.canonicalize().map_err(|source| ConfigError::BaseDir {
        path: path.to_path_buf(),
        source,
    })?;
    if !resolved.is_dir() {
        return Err(ConfigError::BaseNotDirectory(resolved));
    }
    Ok(resolved)
}
