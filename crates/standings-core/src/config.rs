// Configuration loading and parsing (config/standings.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "standings.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where exported images are written.
    pub export_dir: PathBuf,
    /// Directory the logo picker lists.
    pub image_dir: PathBuf,
    /// Render interval of the terminal UI, in milliseconds.
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            export_dir: resolve_export_dir(""),
            image_dir: PathBuf::from("."),
            tick_ms: 33,
        }
    }
}

// ---------------------------------------------------------------------------
// standings.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for standings.toml. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    export: ExportSection,
    images: ImagesSection,
    ui: UiSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ExportSection {
    /// Empty means the user's download directory.
    dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ImagesSection {
    dir: String,
}

impl Default for ImagesSection {
    fn default() -> Self {
        ImagesSection { dir: ".".into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct UiSection {
    tick_ms: u64,
}

impl Default for UiSection {
    fn default() -> Self {
        UiSection { tick_ms: 33 }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/standings.toml` relative to `base_dir`.
///
/// A missing file yields the built-in defaults; a present but broken file is
/// an error.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let file = if path.exists() {
        let text = read_file(&path)?;
        toml::from_str::<ConfigFile>(&text).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?
    } else {
        ConfigFile::default()
    };

    let config = Config {
        export_dir: resolve_export_dir(&file.export.dir),
        image_dir: if file.images.dir.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&file.images.dir)
        },
        tick_ms: file.ui.tick_ms,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure the config file exists by copying it from `defaults/` when missing.
/// Returns the list of files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);

    if !source.is_file() || target.exists() {
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read {}: {e}", source.display()),
            })?;
            std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(vec![target])
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(vec![]),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures the default config file is copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Empty means the platform download directory, or the working directory
/// when the platform has none.
fn resolve_export_dir(raw: &str) -> PathBuf {
    if !raw.is_empty() {
        return PathBuf::from(raw);
    }
    directories::UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.tick_ms == 0 {
        return Err(ConfigError::ValidationError {
            field: "ui.tick_ms".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.tick_ms > 1000 {
        return Err(ConfigError::ValidationError {
            field: "ui.tick_ms".into(),
            message: format!("must be at most 1000, got {}", config.tick_ms),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
