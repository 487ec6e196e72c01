//! Signed URL file downloads
//!
//! Downloads are best-effort: a file that cannot be fetched is logged and
//! recorded in the [`DownloadReport`], and the remaining files are still
//! processed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use reqwest::{Client as HttpClient, StatusCode, Url};
use tokio::fs::File;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::client::FileItem;
use crate::error::{ApiError, Result};

/// Outcome of a download run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// Files written, in order
    pub downloaded: Vec<PathBuf>,

    /// Names of files without a download URL
    pub skipped: Vec<String>,

    /// Names of files whose download failed
    pub failed: Vec<String>,
}

/// Derive a filename from the last segment of a URL's path.
///
/// Returns `fallback` when the URL does not parse or its path has no
/// final segment.
pub fn safe_filename_from_url(url: &str, fallback: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Resolve the on-disk name for the file at 1-based `index`.
///
/// Explicit names are reduced to their final path component so a
/// descriptor can never write outside the destination directory.
fn resolve_filename(file: &FileItem, index: usize) -> String {
    let fallback = format!("file_{}", index);
    let explicit = file
        .filename
        .as_deref()
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty());

    match explicit {
        Some(name) => name.to_string(),
        None => safe_filename_from_url(file.url().unwrap_or_default(), &fallback),
    }
}

/// Download every file that carries a signed URL into `out_dir`.
///
/// `out_dir` is created if missing. Only that, or failing to build the HTTP
/// client, is returned as an error; per-file failures end up in the report.
pub async fn download_signed_files(
    files: &[FileItem],
    out_dir: &Path,
    timeout: Duration,
) -> Result<DownloadReport> {
    tokio::fs::create_dir_all(out_dir).await?;

    let mut report = DownloadReport::default();

    if files.is_empty() {
        log::info!("📭 No downloadable files returned.");
        return Ok(report);
    }

    let http = HttpClient::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let resolved_dir = tokio::fs::canonicalize(out_dir)
        .await
        .unwrap_or_else(|_| out_dir.to_path_buf());
    log::info!(
        "⬇️  Downloading {} file(s) to {}",
        files.len(),
        resolved_dir.display()
    );

    for (idx, file) in files.iter().enumerate() {
        let filename = resolve_filename(file, idx + 1);

        let Some(url) = file.url() else {
            log::warn!("⚠️  Skipping {} (no signed_url).", filename);
            report.skipped.push(filename);
            continue;
        };

        let destination = out_dir.join(&filename);
        log::info!("➡️  GET {}", url);

        match download_one(&http, url, &destination).await {
            Ok(DownloadOutcome::Written(bytes)) => {
                log::info!("✅ Downloaded {} ({} bytes).", filename, bytes);
                report.downloaded.push(destination);
            }
            Ok(DownloadOutcome::Status(status)) => {
                log::error!(
                    "❌ Download failed for {} (HTTP {}).",
                    filename,
                    status.as_u16()
                );
                report.failed.push(filename);
            }
            Err(err) => {
                log::error!("❌ Download exception for {}: {}", filename, err);
                report.failed.push(filename);
            }
        }
    }

    Ok(report)
}

enum DownloadOutcome {
    Written(u64),
    Status(StatusCode),
}

async fn download_one(
    http: &HttpClient,
    url: &str,
    destination: &Path,
) -> std::result::Result<DownloadOutcome, DownloadError> {
    let response = http.get(url).send().await?;
    if response.status() != StatusCode::OK {
        return Ok(DownloadOutcome::Status(response.status()));
    }

    let mut file = File::create(destination).await?;
    match stream_to_file(response, &mut file).await {
        Ok(bytes) => Ok(DownloadOutcome::Written(bytes)),
        Err(err) => {
            drop(file);
            // Leave no truncated file behind
            let _ = tokio::fs::remove_file(destination).await;
            Err(err)
        }
    }
}

async fn stream_to_file(
    response: reqwest::Response,
    file: &mut File,
) -> std::result::Result<u64, DownloadError> {
    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// Failure of a single download
#[derive(Debug, Error)]
enum DownloadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn file(filename: Option<&str>, signed_url: Option<String>) -> FileItem {
        FileItem {
            filename: filename.map(str::to_string),
            signed_url,
            ..Default::default()
        }
    }

    #[test]
    fn test_safe_filename_from_url() {
        assert_eq!(
            safe_filename_from_url("https://cdn.example.com/files/report.pdf?token=abc", "f"),
            "report.pdf"
        );
        assert_eq!(safe_filename_from_url("https://cdn.example.com/", "file_3"), "file_3");
        assert_eq!(safe_filename_from_url("", "file_1"), "file_1");
        assert_eq!(safe_filename_from_url("not a url", "file_2"), "file_2");
    }

    #[test]
    fn test_resolve_filename_prefers_explicit_name() {
        let item = file(Some("deck.pdf"), Some("https://cdn.example.com/x/y.bin".to_string()));
        assert_eq!(resolve_filename(&item, 1), "deck.pdf");
    }

    #[test]
    fn test_resolve_filename_strips_directories() {
        let item = file(Some("../../etc/passwd"), None);
        assert_eq!(resolve_filename(&item, 1), "passwd");
    }

    #[test]
    fn test_resolve_filename_falls_back_to_url_then_index() {
        let item = file(None, Some("https://cdn.example.com/x/y.bin".to_string()));
        assert_eq!(resolve_filename(&item, 1), "y.bin");

        let item = file(None, None);
        assert_eq!(resolve_filename(&item, 4), "file_4");
    }

    #[tokio::test]
    async fn test_empty_list_creates_directory() {
        let temp = tempdir().unwrap();
        let out_dir = temp.path().join("nested").join("downloads");

        let report = download_signed_files(&[], &out_dir, Duration::from_secs(5))
            .await
            .unwrap();

        assert!(out_dir.is_dir());
        assert_eq!(report, DownloadReport::default());
    }

    #[tokio::test]
    async fn test_downloads_file_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/signed/deck.pdf")
            .with_status(200)
            .with_body("%PDF-1.7 example")
            .create_async()
            .await;

        let temp = tempdir().unwrap();
        let files = vec![file(None, Some(format!("{}/signed/deck.pdf", server.url())))];

        let report = download_signed_files(&files, temp.path(), Duration::from_secs(5))
            .await
            .unwrap();

        let expected = temp.path().join("deck.pdf");
        assert_eq!(report.downloaded, vec![expected.clone()]);
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "%PDF-1.7 example");
    }

    #[tokio::test]
    async fn test_missing_url_and_http_error_do_not_abort() {
        let mut server = mockito::Server::new_async().await;
        let _gone = server
            .mock("GET", "/signed/expired.pdf")
            .with_status(403)
            .with_body("Signature expired")
            .create_async()
            .await;
        let _ok = server
            .mock("GET", "/signed/ok.txt")
            .with_status(200)
            .with_body("hello")
            .create_async()
            .await;

        let temp = tempdir().unwrap();
        let files = vec![
            file(Some("no-link.pdf"), None),
            file(
                Some("expired.pdf"),
                Some(format!("{}/signed/expired.pdf", server.url())),
            ),
            file(Some("ok.txt"), Some(format!("{}/signed/ok.txt", server.url()))),
        ];

        let report = download_signed_files(&files, temp.path(), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(report.skipped, vec!["no-link.pdf"]);
        assert_eq!(report.failed, vec!["expired.pdf"]);
        assert_eq!(report.downloaded, vec![temp.path().join("ok.txt")]);
        assert!(!temp.path().join("expired.pdf").exists());
    }

    #[tokio::test]
    async fn test_transport_failure_is_isolated() {
        let temp = tempdir().unwrap();
        let files = vec![file(
            Some("unreachable.bin"),
            Some("http://127.0.0.1:9/unreachable.bin".to_string()),
        )];

        let report = download_signed_files(&files, temp.path(), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(report.failed, vec!["unreachable.bin"]);
        assert!(report.downloaded.is_empty());
    }
}
