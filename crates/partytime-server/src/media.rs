//! Decoration image storage under the upload root.
//!
//! Every image on disk belongs to at most one decoration record. Writes use
//! create-new semantics and names are prefixed with the upload time, so a
//! concurrent upload can never overwrite another record's file. Record and
//! file are paired through [`MediaStore::replace`]: the new file is written
//! first, the record swapped second, and the old file removed last.

use std::future::Future;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use partytime_shared::constants::{ALLOWED_IMAGE_EXTENSIONS, UPLOAD_URL_PREFIX};

use crate::error::ServerError;

const MAX_COLLISION_ATTEMPTS: u32 = 32;

/// An image received from a multipart form, not yet on disk.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied original file name. Untrusted.
    pub file_name: String,
    pub data: Bytes,
}

/// Verify that a path stays within the upload root.
fn ensure_within(base: &Path, target: &Path) -> Result<PathBuf, ServerError> {
    let mut resolved = base.to_path_buf();
    for component in target.strip_prefix(base).unwrap_or(target).components() {
        match component {
            Component::Normal(c) => resolved.push(c),
            Component::CurDir => {}
            _ => {
                return Err(ServerError::BadRequest("Invalid file name.".to_string()));
            }
        }
    }
    if resolved == base || !resolved.starts_with(base) {
        return Err(ServerError::BadRequest("Invalid file name.".to_string()));
    }
    Ok(resolved)
}

/// Reduce an untrusted file name to a safe single path component.
///
/// Only the final component is kept (both `/` and `\` count as separators),
/// characters outside `[A-Za-z0-9._-]` are replaced by `_` and leading dots
/// are dropped. The extension must be an accepted image type.
pub fn sanitize_file_name(name: &str) -> Result<String, ServerError> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();

    let (stem, ext) = cleaned
        .rsplit_once('.')
        .ok_or_else(|| ServerError::BadRequest("Unsupported image type.".to_string()))?;
    if stem.is_empty() || !is_allowed_extension(ext) {
        return Err(ServerError::BadRequest("Unsupported image type.".to_string()));
    }

    Ok(cleaned)
}

fn is_allowed_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// `Content-Type` for a stored image, derived from its extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

fn url_for(file_name: &str) -> String {
    format!("{UPLOAD_URL_PREFIX}/{file_name}")
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    max_size: usize,
}

impl MediaStore {
    /// Open (creating if needed) the upload root.
    pub async fn new(root: PathBuf, max_size: usize) -> Result<Self, ServerError> {
        fs::create_dir_all(&root).await.map_err(|e| {
            ServerError::Media(format!(
                "Failed to create upload directory '{}': {}",
                root.display(),
                e
            ))
        })?;
        let root = root.canonicalize().map_err(|e| {
            ServerError::Media(format!("Failed to resolve '{}': {}", root.display(), e))
        })?;

        info!(path = %root.display(), "Media store initialized");

        Ok(Self { root, max_size })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an upload to disk and return its public url.
    pub async fn store(&self, upload: &Upload) -> Result<String, ServerError> {
        if upload.data.len() > self.max_size {
            return Err(ServerError::ImageTooLarge {
                size: upload.data.len(),
                max: self.max_size,
            });
        }
        let clean = sanitize_file_name(&upload.file_name)?;
        let millis = chrono::Utc::now().timestamp_millis();

        for attempt in 0..MAX_COLLISION_ATTEMPTS {
            let name = stored_name(millis, &clean, attempt);
            let path = ensure_within(&self.root, &self.root.join(&name))?;

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(ServerError::Media(format!("Failed to create {name}: {e}")));
                }
            };

            if let Err(e) = write_all(&mut file, &upload.data).await {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(ServerError::Media(format!("Failed to write {name}: {e}")));
            }

            debug!(file = %name, size = upload.data.len(), "Stored image");
            return Ok(url_for(&name));
        }

        Err(ServerError::Media(format!(
            "No free file name for {clean} after {MAX_COLLISION_ATTEMPTS} attempts"
        )))
    }

    /// First phase of a record mutation: the url the record should point to.
    ///
    /// Stores `incoming` when present, otherwise keeps `existing`.
    pub async fn attach(
        &self,
        existing: Option<&str>,
        incoming: Option<&Upload>,
    ) -> Result<Option<String>, ServerError> {
        match incoming {
            Some(upload) => self.store(upload).await.map(Some),
            None => Ok(existing.map(str::to_string)),
        }
    }

    /// Pair a record mutation with its image.
    ///
    /// `swap` receives the url the record must point to and performs the
    /// record write. When a new file was stored and `swap` succeeds, `old` is
    /// released; when `swap` fails, the new file is released and the error
    /// is returned. Without an incoming file nothing on disk changes.
    pub async fn replace<T, F, Fut>(
        &self,
        old: Option<&str>,
        incoming: Option<&Upload>,
        swap: F,
    ) -> Result<T, ServerError>
    where
        F: FnOnce(Option<String>) -> Fut,
        Fut: Future<Output = Result<T, ServerError>>,
    {
        let url = self.attach(old, incoming).await?;
        let fresh = incoming.is_some();

        match swap(url.clone()).await {
            Ok(value) => {
                if fresh {
                    if let Some(old) = old {
                        if Some(old) != url.as_deref() {
                            self.release(old).await;
                        }
                    }
                }
                Ok(value)
            }
            Err(e) => {
                if fresh {
                    if let Some(new) = url.as_deref() {
                        self.release(new).await;
                    }
                }
                Err(e)
            }
        }
    }

    /// Best-effort removal of the file behind `url`. Never fails.
    pub async fn release(&self, url: &str) {
        let Some(path) = self.resolve(url) else {
            warn!(url = %url, "Not removing image outside the upload root");
            return;
        };

        match fs::remove_file(&path).await {
            Ok(()) => debug!(url = %url, "Removed image"),
            Err(e) => warn!(url = %url, error = %e, "Failed to remove image"),
        }
    }

    /// Map a public url to its file. Only `/uploads/<single component>`
    /// resolves.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let name = url
            .strip_prefix(UPLOAD_URL_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))?;
        self.file_path(name)
    }

    /// Path of a stored file by bare name.
    pub fn file_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
        {
            return None;
        }
        ensure_within(&self.root, &self.root.join(name)).ok()
    }

    /// Read a stored file by bare name for serving.
    pub async fn read(&self, name: &str) -> Result<Bytes, ServerError> {
        let not_found = || ServerError::NotFound("Image not found.".to_string());
        let path = self.file_path(name).ok_or_else(not_found)?;

        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(ServerError::Media(format!("Failed to read {name}: {e}"))),
        }
    }
}

fn stored_name(millis: i64, clean: &str, attempt: u32) -> String {
    if attempt == 0 {
        return format!("{millis}-{clean}");
    }
    match clean.rsplit_once('.') {
        Some((stem, ext)) => format!("{millis}-{stem}-{attempt}.{ext}"),
        None => format!("{millis}-{clean}-{attempt}"),
    }
}

async fn write_all(file: &mut fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}
