use std::path::{Path, PathBuf};

use batchinst_common::{types::AppDescriptor, AppConfig, Error, InstallLog, Result};
use tempfile::TempDir;

use crate::{
    download::{file_name, Download},
    session::Session,
};

/// Writes a small shell script for every download, failing for urls containing `fail`.
pub(crate) struct FakeDownloader {
    pub(crate) dir: PathBuf,
}

impl Download for FakeDownloader {
    fn download(&self, app: &AppDescriptor) -> Result<PathBuf> {
        if app.url.contains("fail") {
            return Err(Error::Download {
                name: app.name.clone(),
                url: app.url.clone(),
                reason: "connection refused".to_string(),
            });
        }
        std::fs::create_dir_all(&self.dir).unwrap();
        let path = self.dir.join(file_name(&app.url).unwrap());
        std::fs::write(&path, "exit 0\n").unwrap();
        Ok(path)
    }
}

/// Session rooted in a scratch directory with the given config text.
pub(crate) fn session(config: &str, purge: bool) -> (TempDir, Session<FakeDownloader>) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::parse(config).unwrap();
    let log = InstallLog::new(dir.path().join("install_log.txt"));
    let downloader = FakeDownloader {
        dir: dir.path().join("downloads"),
    };
    (dir, Session::new(config, log, downloader, purge))
}

pub(crate) fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}
