//! Filesystem store for uploaded student photographs.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no photo was uploaded")]
    Missing,
    #[error("no photo was selected")]
    EmptyFilename,
    #[error("file extension is not allowed: {0}")]
    BadExtension(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// True when the name carries an extension from the fixed allow-list,
/// case-insensitively. A name without a dot is rejected.
pub fn allowed_file(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Reduce an uploaded filename to a safe final path component: directory
/// parts are dropped, whitespace becomes `_`, anything outside ASCII
/// alphanumerics / `.` / `-` / `_` is removed, and leading dots are stripped
/// so the result can never walk out of the upload directory.
pub fn sanitize_filename(name: &str) -> String {
    let last = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name);

    let mut out = String::with_capacity(last.len());
    for c in last.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
            out.push(c);
        } else if c.is_whitespace() {
            out.push('_');
        }
    }
    out.trim_start_matches('.').to_string()
}

pub fn content_type(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if absent. Called once at startup.
    pub fn ensure_root(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }

    /// Store an uploaded photo and return the path it was written to.
    /// A file with the same (sanitized) name is silently overwritten; there
    /// is no collision avoidance.
    pub fn save(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf, MediaError> {
        if original_name.is_empty() {
            return Err(MediaError::EmptyFilename);
        }
        if !allowed_file(original_name) {
            return Err(MediaError::BadExtension(original_name.to_string()));
        }
        let name = sanitize_filename(original_name);
        if name.is_empty() {
            return Err(MediaError::EmptyFilename);
        }
        let path = self.root.join(name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Read a stored photo back for serving. The requested name is sanitized
    /// the same way `save` sanitizes, so a crafted path cannot escape the
    /// upload directory.
    pub fn open(&self, name: &str) -> Result<Vec<u8>, MediaError> {
        let name = sanitize_filename(name);
        if name.is_empty() {
            return Err(MediaError::EmptyFilename);
        }
        Ok(std::fs::read(self.root.join(name))?)
    }
}
