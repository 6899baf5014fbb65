// Export of the standings sheet to a PNG or JPEG file.
//
// The sheet is a fixed 1080x1080 logical canvas rendered at twice that
// resolution. Only one export may be in flight; `ExportGate` tracks it.

pub mod canvas;
pub mod sheet;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::league::LeagueData;

pub use sheet::SheetRasterizer;

/// Logical width and height of the sheet.
pub const CANVAS_SIZE: u32 = 1080;

/// Output pixels per logical unit.
pub const EXPORT_SCALE: u32 = 2;

/// Prefix of every exported file name.
pub const FILE_PREFIX: &str = "league-standings";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("could not load image for {owner}: {reason}")]
    EmbeddedImage { owner: String, reason: String },

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("export worker failed: {0}")]
    Worker(String),
}

// ---------------------------------------------------------------------------
// ExportFormat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Png => f.write_str("PNG"),
            ExportFormat::Jpeg => f.write_str("JPG"),
        }
    }
}

/// `league-standings-<epoch-ms>.<ext>`
pub fn export_file_name(format: ExportFormat, epoch_ms: i64) -> String {
    format!("{FILE_PREFIX}-{epoch_ms}.{}", format.extension())
}

/// Milliseconds since the Unix epoch, used to keep export names unique.
pub fn timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Write encoded bytes into `dir` under a timestamped name.
pub async fn save(
    dir: &Path,
    format: ExportFormat,
    bytes: &[u8],
    epoch_ms: i64,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(format, epoch_ms));
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ExportError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
    info!("Exported {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

// ---------------------------------------------------------------------------
// Rasterizer
// ---------------------------------------------------------------------------

/// Turns a league snapshot into encoded image bytes.
///
/// Implementations are synchronous and CPU bound; callers run them on a
/// blocking worker.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, league: &LeagueData, format: ExportFormat) -> Result<Vec<u8>, ExportError>;
}

// ---------------------------------------------------------------------------
// ExportGate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportState {
    #[default]
    Idle,
    Exporting,
}

/// Two-state flag that lets a single export run at a time.
#[derive(Debug, Default)]
pub struct ExportGate {
    state: ExportState,
}

impl ExportGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    pub fn is_exporting(&self) -> bool {
        self.state == ExportState::Exporting
    }

    /// Claim the gate. Returns `false` when an export is already running.
    pub fn try_begin(&mut self) -> bool {
        if self.is_exporting() {
            return false;
        }
        self.state = ExportState::Exporting;
        true
    }

    /// Release the gate after success or failure.
    pub fn finish(&mut self) {
        self.state = ExportState::Idle;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(
            export_file_name(ExportFormat::Png, 1_755_300_000_123),
            "league-standings-1755300000123.png"
        );
        assert_eq!(
            export_file_name(ExportFormat::Jpeg, 42),
            "league-standings-42.jpeg"
        );
    }

    #[test]
    fn timestamp_is_recent() {
        // 2020-01-01 in epoch ms.
        assert!(timestamp_ms() > 1_577_836_800_000);
    }

    #[test]
    fn gate_allows_one_export_at_a_time() {
        let mut gate = ExportGate::new();
        assert_eq!(gate.state(), ExportState::Idle);
        assert!(gate.try_begin());
        assert!(gate.is_exporting());
        assert!(!gate.try_begin());
        assert!(gate.is_exporting());
        gate.finish();
        assert!(!gate.is_exporting());
        assert!(gate.try_begin());
    }

    #[test]
    fn format_labels() {
        assert_eq!(ExportFormat::Png.to_string(), "PNG");
        assert_eq!(ExportFormat::Jpeg.to_string(), "JPG");
        assert_eq!(ExportFormat::Jpeg.extension(), "jpeg");
    }

    #[tokio::test]
    async fn save_writes_timestamped_file() {
        let dir = std::env::temp_dir().join("standings_export_save/nested");
        let _ = std::fs::remove_dir_all(dir.parent().unwrap());

        let path = save(&dir, ExportFormat::Png, b"bytes", 7).await.unwrap();
        assert_eq!(path, dir.join("league-standings-7.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"bytes");

        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }
}
