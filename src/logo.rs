//! Logo loading
//!
//! The header logo is thumbnailed to at most 150x150 and carried as a
//! base64 PNG payload; the PDF painter decodes it again.

use crate::error::{ReportError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use std::io::Cursor;
use std::path::Path;

const LOGO_MAX_SIZE: u32 = 150;

/// Pre-encoded logo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoImage {
    pub base64_png: String,
}

impl LogoImage {
    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self {
            base64_png: STANDARD.encode(bytes),
        }
    }

    pub fn png_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.base64_png)
            .map_err(|e| ReportError::LogoLoad(format!("invalid base64 payload: {}", e)))
    }
}

/// Load, thumbnail and encode the logo at `path`
pub fn load_logo(path: &Path) -> Result<LogoImage> {
    if !path.exists() {
        return Err(ReportError::FileNotFound(path.display().to_string()));
    }
    let img = image::open(path)
        .map_err(|e| ReportError::LogoLoad(format!("{}: {}", path.display(), e)))?;
    let thumb = img.thumbnail(LOGO_MAX_SIZE, LOGO_MAX_SIZE);

    let mut buf = Vec::new();
    thumb
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| ReportError::LogoLoad(format!("PNG encode failed: {}", e)))?;

    Ok(LogoImage::from_png_bytes(&buf))
}

/// Missing logos are normal (title text is used instead); other failures are logged.
pub fn load_optional_logo(path: &Path) -> Option<LogoImage> {
    match load_logo(path) {
        Ok(logo) => Some(logo),
        Err(ReportError::FileNotFound(_)) => None,
        Err(e) => {
            tracing::warn!(error = %e, "logo skipped");
            None
        }
    }
}
