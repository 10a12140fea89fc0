use std::path::Path;

use base64::Engine;
use tokio::fs;

use crate::error::EncodingError;

/// Upper bound for inline uploads.
pub const MAX_VIDEO_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct VideoPayload {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl VideoPayload {
    /// Read a video file, checking its media type and size first.
    pub async fn load(path: &Path) -> Result<Self, EncodingError> {
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !mime_type.starts_with("video/") {
            return Err(EncodingError::NotVideo {
                path: path.to_path_buf(),
                mime_type,
            });
        }

        let unreadable = |source: std::io::Error| EncodingError::Unreadable {
            path: path.to_path_buf(),
            source,
        };
        let size = fs::metadata(path).await.map_err(unreadable)?.len();
        if size > MAX_VIDEO_BYTES {
            return Err(EncodingError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: MAX_VIDEO_BYTES,
            });
        }

        let bytes = fs::read(path).await.map_err(unreadable)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        tracing::debug!(%name, %mime_type, size, "loaded video");
        Ok(Self {
            name,
            mime_type,
            bytes,
        })
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}
