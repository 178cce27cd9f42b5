//! Installer artifact download with a persistent cache.
//!
//! Artifacts are large (hundreds of megabytes), so completed downloads are
//! kept in the user cache directory keyed by the download URL. Nightly
//! builds and rolling `-latest.exe` installers change upstream without
//! changing their URL and are always fetched fresh.

use futures_util::StreamExt as _;
use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt as _;

use omsetup_backend::InstallError;
use omsetup_platform::AppPaths;

const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);
const BYTES_PER_MEGABYTE: f64 = 1_048_576.0;

/// Name of the artifact at the end of a download URL.
fn artifact_name(url: &str) -> Result<&str, InstallError> {
    url.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| InstallError::MalformedDownloadUrl {
            url: url.to_string(),
        })
}

/// Whether a cached copy may be reused for this artifact.
fn cacheable(name: &str, ignore_cache: bool) -> bool {
    !ignore_cache && !name.ends_with("-latest.exe")
}

fn cache_key(url: &str) -> String {
    format!("{:x}", Sha256::digest(url.as_bytes()))
}

pub struct Downloader {
    client: reqwest::Client,
    cache_dir: Option<PathBuf>,
}

impl Downloader {
    /// Build a downloader backed by the user cache directory. Falls back to
    /// uncached operation when no cache directory is available.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        let cache_dir = AppPaths::new()
            .ok()
            .filter(|paths| paths.ensure_dirs().is_ok())
            .map(|paths| paths.installers_dir());
        Self { client, cache_dir }
    }

    #[must_use]
    pub fn with_cache_dir(client: reqwest::Client, cache_dir: Option<PathBuf>) -> Self {
        Self { client, cache_dir }
    }

    /// Download `url` into `dest_dir`, reusing the persistent cache when
    /// allowed, and return the path of the artifact inside `dest_dir`.
    ///
    /// # Errors
    /// Fails on malformed URLs, network or HTTP errors, IO errors, or when
    /// the artifact is missing after the download completed.
    pub async fn fetch_cached(
        &self,
        url: &str,
        dest_dir: &Path,
        ignore_cache: bool,
    ) -> Result<PathBuf, InstallError> {
        let name = artifact_name(url)?;
        let dest = dest_dir.join(name);
        let use_cache = cacheable(name, ignore_cache);

        if use_cache
            && let Some(cached) = self.cached_copy(url)
            && cached.is_file()
        {
            info!("Using cached installer for {url}");
            tokio::fs::copy(&cached, &dest).await?;
        } else {
            self.download(url, &dest).await?;
            if use_cache && let Some(cached) = self.cached_copy(url) {
                // Cache store is best-effort; a failure only costs the next
                // run a re-download.
                if let Err(err) = tokio::fs::copy(&dest, &cached).await {
                    warn!("Could not store installer in cache: {err}");
                } else {
                    debug!("Installer {name} cached as {}", cached.display());
                }
            }
        }

        if !dest.is_file() {
            return Err(InstallError::ArtifactNotFound {
                path: dest.display().to_string(),
            });
        }
        Ok(dest)
    }

    fn cached_copy(&self, url: &str) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join(cache_key(url)))
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), InstallError> {
        info!("Downloading installer from {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| InstallError::network("installer download", err))?;
        if !response.status().is_success() {
            return Err(InstallError::Network {
                operation: "installer download",
                details: format!("Server responded with {}", response.status()),
            });
        }

        let total_bytes = response.content_length().unwrap_or(0);
        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut received: u64 = 0;
        let mut last_progress = Instant::now();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| InstallError::network("installer download", err))?;
            file.write_all(&chunk).await?;
            received += chunk.len() as u64;

            if last_progress.elapsed() >= PROGRESS_INTERVAL {
                log_progress(dest, received, total_bytes);
                last_progress = Instant::now();
            }
        }
        file.flush().await?;

        info!("Finished download!");
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
fn log_progress(dest: &Path, received: u64, total_bytes: u64) {
    let received_mb = received as f64 / BYTES_PER_MEGABYTE;
    if total_bytes > 0 {
        let percent = 100.0 * received as f64 / total_bytes as f64;
        let total_mb = total_bytes as f64 / BYTES_PER_MEGABYTE;
        debug!(
            "Downloading {} - {percent:.2}% ({received_mb:.2} MB) of total size: {total_mb:.2} MB",
            dest.display()
        );
    } else {
        debug!("Downloading {} - {received_mb:.2} MB", dest.display());
    }
}
