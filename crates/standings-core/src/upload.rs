// Image intake: picking a PNG/JPEG file and turning it into a self-contained
// `data:` URI that the sheet can embed.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read image {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not a PNG or JPEG image")]
    UnsupportedType { path: PathBuf },

    #[error("malformed image data URI: {reason}")]
    MalformedDataUri { reason: String },
}

// ---------------------------------------------------------------------------
// ImageMime / ImageRef
// ---------------------------------------------------------------------------

/// The image types the uploader accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMime {
    Png,
    Jpeg,
}

/// Mime types offered by the file picker.
pub const ACCEPTED_MIME_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xFF\xD8\xFF";

impl ImageMime {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageMime::Png),
            "image/jpeg" | "image/jpg" => Some(ImageMime::Jpeg),
            _ => None,
        }
    }

    /// Identify image content by its leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_MAGIC) {
            Some(ImageMime::Png)
        } else if bytes.starts_with(JPEG_MAGIC) {
            Some(ImageMime::Jpeg)
        } else {
            None
        }
    }

    /// Mime type implied by a file extension (`.png`, `.jpg`, `.jpeg`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ImageMime::Png),
            "jpg" | "jpeg" => Some(ImageMime::Jpeg),
            _ => None,
        }
    }
}

/// An embeddable image: a `data:<mime>;base64,<payload>` URI.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn from_bytes(mime: ImageMime, bytes: &[u8]) -> Self {
        ImageRef(format!(
            "data:{};base64,{}",
            mime.as_str(),
            STANDARD.encode(bytes)
        ))
    }

    /// Wrap an existing data URI after checking its header.
    pub fn parse(uri: impl Into<String>) -> Result<Self, UploadError> {
        let image = ImageRef(uri.into());
        image.header()?;
        Ok(image)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn mime(&self) -> Result<ImageMime, UploadError> {
        self.header().map(|(mime, _)| mime)
    }

    /// Mime type and raw bytes of the embedded image.
    pub fn decode(&self) -> Result<(ImageMime, Vec<u8>), UploadError> {
        let (mime, payload) = self.header()?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| UploadError::MalformedDataUri {
                reason: format!("bad base64 payload: {e}"),
            })?;
        Ok((mime, bytes))
    }

    fn header(&self) -> Result<(ImageMime, &str), UploadError> {
        let rest = self
            .0
            .strip_prefix("data:")
            .ok_or_else(|| malformed("missing `data:` scheme"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| malformed("missing `,` separator"))?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or_else(|| malformed("payload is not base64"))?;
        let mime = ImageMime::from_mime(mime)
            .ok_or_else(|| malformed(&format!("unsupported mime type `{mime}`")))?;
        Ok((mime, payload))
    }
}

fn malformed(reason: &str) -> UploadError {
    UploadError::MalformedDataUri {
        reason: reason.to_string(),
    }
}

impl fmt::Debug for ImageRef {
    // Payloads run to hundreds of kilobytes; keep logs readable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(32).collect();
        write!(f, "ImageRef({}… {} bytes)", head, self.0.len())
    }
}

// ---------------------------------------------------------------------------
// Reading files
// ---------------------------------------------------------------------------

/// Read a whole image file into an embeddable `ImageRef`.
///
/// The content is sniffed rather than trusted from the extension; anything
/// that is not PNG or JPEG is rejected.
pub async fn read_image_file(path: &Path) -> Result<ImageRef, UploadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let mime = ImageMime::sniff(&bytes).ok_or_else(|| UploadError::UnsupportedType {
        path: path.to_path_buf(),
    })?;
    debug!("Read {} ({} bytes, {})", path.display(), bytes.len(), mime.as_str());
    Ok(ImageRef::from_bytes(mime, &bytes))
}

/// Source of uploaded images. The filesystem in production, fakes in tests.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn load(&self, path: &Path) -> Result<ImageRef, UploadError>;
}

/// Reads images from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

#[async_trait]
impl ImageSource for FsImageSource {
    async fn load(&self, path: &Path) -> Result<ImageRef, UploadError> {
        read_image_file(path).await
    }
}

// ---------------------------------------------------------------------------
// ImageShape
// ---------------------------------------------------------------------------

/// Frame an uploaded image is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageShape {
    Circle,
    Rectangle,
}

// ---------------------------------------------------------------------------
// FilePicker
// ---------------------------------------------------------------------------

/// A one-shot file selection surface over a directory, showing only PNG and
/// JPEG files.
///
/// A picker is opened for a single attempt and dropped afterwards, whether a
/// file was chosen or not, so the next attempt always lists afresh and can
/// choose the same file again.
#[derive(Debug, Clone)]
pub struct FilePicker {
    dir: PathBuf,
    entries: Vec<PathBuf>,
    filter: String,
    selected: usize,
}

impl FilePicker {
    /// List `dir` for acceptable images, sorted by file name.
    pub fn open(dir: &Path) -> std::io::Result<Self> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && ImageMime::from_path(&path).is_some() {
                entries.push(path);
            }
        }
        Ok(Self::with_entries(dir, entries))
    }

    /// Build a picker over an explicit listing. Non-image paths are dropped.
    pub fn with_entries(dir: &Path, entries: Vec<PathBuf>) -> Self {
        let mut entries: Vec<PathBuf> = entries
            .into_iter()
            .filter(|p| ImageMime::from_path(p).is_some())
            .collect();
        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        FilePicker {
            dir: dir.to_path_buf(),
            entries,
            filter: String::new(),
            selected: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Entries whose file name contains the filter text (case-insensitive).
    pub fn visible(&self) -> Vec<&PathBuf> {
        let needle = self.filter.to_lowercase();
        self.entries
            .iter()
            .filter(|p| name_matches(p, &needle))
            .collect()
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.selected = 0;
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.selected = 0;
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.visible().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Consume the picker, returning the highlighted file if there is one.
    pub fn choose(mut self) -> Option<PathBuf> {
        let needle = self.filter.to_lowercase();
        self.entries.retain(|p| name_matches(p, &needle));
        self.entries.into_iter().nth(self.selected)
    }
}

fn name_matches(path: &Path, needle: &str) -> bool {
    needle.is_empty()
        || path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.to_lowercase().contains(needle))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
