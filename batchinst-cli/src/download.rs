use std::{
    fs::File,
    io::{ErrorKind, Read, Write},
    path::{Path, PathBuf},
};

use batchinst_common::{types::AppDescriptor, Error, Result};
use tracing::instrument;

/// Size of the chunks the response body is written to disk in
const CHUNK_SIZE: usize = 8 * 1024;

/// Fetches the installer artifact of an application.
pub(crate) trait Download {
    /// Download the installer for `app`, returning its local path.
    fn download(&self, app: &AppDescriptor) -> Result<PathBuf>;
}

/// Downloads installers over HTTP(S) into a local directory.
#[derive(Debug, Clone)]
pub(crate) struct HttpDownloader {
    dir: PathBuf,
}

impl HttpDownloader {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Download for HttpDownloader {
    #[instrument(skip_all, fields(app = %app.name, url = %app.url))]
    fn download(&self, app: &AppDescriptor) -> Result<PathBuf> {
        let failed = |reason: String| Error::Download {
            name: app.name.clone(),
            url: app.url.clone(),
            reason,
        };

        let file_name = file_name(&app.url)
            .ok_or_else(|| failed("url has no file name to save the installer as".to_string()))?;
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| failed(format!("cannot create {}: {e}", self.dir.display())))?;
        let path = self.dir.join(file_name);

        tracing::info!("downloading");
        let response = ureq::get(&app.url)
            .call()
            .map_err(|e| failed(e.to_string()))?;

        let written = write_chunked(response.into_reader(), &path)
            .map_err(|e| failed(format!("writing {}: {e}", path.display())))?;
        tracing::info!(path = ?path, bytes = written, "downloaded successfully");

        Ok(path)
    }
}

/// Copy `reader` into a newly created (or truncated) file at `path`.
fn write_chunked(mut reader: impl Read, path: &Path) -> std::io::Result<u64> {
    let mut file = File::create(path)?;
    let mut buf = vec![0; CHUNK_SIZE];
    let mut written = 0;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        file.write_all(&buf[..n])?;
        written += n as u64;
    }
    file.flush()?;
    Ok(written)
}

/// Final path segment of `url`, without query string or fragment.
///
/// Returns `None` if the url has no path or ends in `/`.
pub(crate) fn file_name(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let (_host, path) = rest.split_once('/')?;
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.rsplit('/').next() {
        Some("") | Some(".") | Some("..") | None => None,
        Some(name) => Some(name),
    }
}
