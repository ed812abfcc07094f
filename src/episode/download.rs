use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::DownloadError;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::sync::RunContext;

/// Reserved suffix for in-progress downloads. No final name ever carries it,
/// so a partial file can never be mistaken for a complete one.
pub const PART_SUFFIX: &str = ".part";

/// Temp path for a destination: the destination with the part suffix appended
pub fn temp_path(dest: &Path) -> PathBuf {
    let mut os = dest.as_os_str().to_os_string();
    os.push(PART_SUFFIX);
    PathBuf::from(os)
}

/// Removes an in-progress temp file unless disarmed.
///
/// Disarm only after the rename to the final destination; that rename is the
/// sole commit point, and completed files are never touched by cleanup.
pub struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    pub fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Stream `url` to `temp` in chunks, reporting progress.
///
/// The chunk loop checks the run context between writes and stops with
/// `DownloadError::Cancelled` when an interrupt has been requested. A known
/// nonzero advertised size that differs from the bytes written is reported
/// as a `SizeMismatch` warning; the file is kept and the caller decides.
pub async fn download<C: HttpClient>(
    client: &C,
    url: &str,
    temp: &Path,
    episode_title: &str,
    ctx: &RunContext,
    reporter: &SharedProgressReporter,
) -> Result<u64, DownloadError> {
    let response = client.get(url).await.map_err(|e| DownloadError::HttpFailed {
        url: url.to_string(),
        source: e,
    })?;

    if response.status >= 400 {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    reporter.report(ProgressEvent::DownloadStarting {
        episode_title: episode_title.to_string(),
        content_length: response.content_length,
    });

    let mut file = File::create(temp)
        .await
        .map_err(|e| DownloadError::FileCreateFailed {
            path: temp.to_path_buf(),
            source: e,
        })?;

    let mut bytes_downloaded: u64 = 0;
    let mut stream = response.body;

    while let Some(chunk_result) = stream.next().await {
        if ctx.is_cancelled() {
            return Err(DownloadError::Cancelled);
        }

        let chunk = chunk_result.map_err(|e| DownloadError::StreamFailed {
            url: url.to_string(),
            source: e,
        })?;

        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::FileWriteFailed {
                path: temp.to_path_buf(),
                source: e,
            })?;

        bytes_downloaded += chunk.len() as u64;

        reporter.report(ProgressEvent::DownloadProgress {
            bytes_downloaded,
            total_bytes: response.content_length,
        });
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::FileWriteFailed {
            path: temp.to_path_buf(),
            source: e,
        })?;

    if let Some(expected) = response.content_length
        && expected != 0
        && expected != bytes_downloaded
    {
        reporter.report(ProgressEvent::SizeMismatch {
            episode_title: episode_title.to_string(),
            expected,
            actual: bytes_downloaded,
        });
    }

    Ok(bytes_downloaded)
}
