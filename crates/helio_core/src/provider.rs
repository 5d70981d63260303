//! Local kernel provisioning: download once, reuse afterwards.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::SnapshotError;

/// Transfers a remote resource into a local file.
pub trait KernelFetcher {
    /// Write the body at `url` to `dest` and return the number of bytes.
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, SnapshotError>;
}

/// Blocking HTTP(S) fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// No request timeout: DE440 is over 100 MB.
    pub fn new() -> Result<Self, SnapshotError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .user_agent(concat!("helio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SnapshotError::Http {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl KernelFetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, SnapshotError> {
        let http_err = |e: reqwest::Error| SnapshotError::Http {
            url: url.to_string(),
            message: e.to_string(),
        };
        let mut response = self.client.get(url).send().map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SnapshotError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let mut file = File::create(dest).map_err(|e| SnapshotError::io(dest, &e))?;
        let bytes = response.copy_to(&mut file).map_err(http_err)?;
        file.sync_all().map_err(|e| SnapshotError::io(dest, &e))?;
        Ok(bytes)
    }
}

/// What [`ensure_kernel`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelStatus {
    AlreadyPresent,
    Downloaded { bytes: u64 },
}

/// `<path>.part`, the in-progress download location.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

/// Make sure the kernel exists at `path`, downloading it from `url` if not.
///
/// An existing file is trusted as-is and the network is never touched. The
/// download lands in a `.part` sibling that is renamed into place only
/// after the transfer finished, so a failed run leaves no file at `path`.
pub fn ensure_kernel(
    path: &Path,
    url: &str,
    fetcher: &dyn KernelFetcher,
) -> Result<KernelStatus, SnapshotError> {
    if path.exists() {
        tracing::info!(path = %path.display(), "kernel present, skipping download");
        return Ok(KernelStatus::AlreadyPresent);
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| SnapshotError::io(parent, &e))?;
    }

    let partial = partial_path(path);
    tracing::info!(url, path = %path.display(), "downloading kernel");
    let bytes = match fetcher.fetch(url, &partial) {
        Ok(bytes) => bytes,
        Err(e) => {
            // The fetch error takes precedence over cleanup failures.
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }
    };
    std::fs::rename(&partial, path).map_err(|e| SnapshotError::io(path, &e))?;
    tracing::info!(bytes, path = %path.display(), "kernel downloaded");
    Ok(KernelStatus::Downloaded { bytes })
}
