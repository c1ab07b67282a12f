use std::path::PathBuf;

use batchinst_common::{types::AppDescriptor, AppConfig, InstallLog, Result};
use tracing::instrument;

use crate::{download::Download, runner};

pub(crate) struct Installer<D> {
    downloader: D,
    log: InstallLog,
}

/// Outcome of [`Installer::install_all`]
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct InstallSummary {
    pub(crate) installed: Vec<String>,
    pub(crate) failed: Vec<String>,
}

impl<D: Download> Installer<D> {
    pub(crate) fn new(downloader: D, log: InstallLog) -> Self {
        Self { downloader, log }
    }

    /// Download, run the install command and record `app` in the install log.
    ///
    /// Nothing is logged if the download or the command fails; the downloaded
    /// artifact is left in place either way.
    #[instrument(skip_all, fields(app = %app.name))]
    pub(crate) fn install(&self, app: &AppDescriptor) -> Result<PathBuf> {
        let installer = self.downloader.download(app)?;

        tracing::info!("installing");
        runner::run(&app.name, &app.install, &installer)?;
        self.log.append(&app.name, &installer)?;
        tracing::info!("installed successfully");

        Ok(installer)
    }

    /// Install every configured application in order, continuing past failures.
    ///
    /// Only fatal errors (install log i/o or parsing) stop the run.
    #[instrument(skip_all, fields(apps = config.len()))]
    pub(crate) fn install_all(&self, config: &AppConfig) -> Result<InstallSummary> {
        let mut summary = InstallSummary::default();
        for app in config.iter() {
            match self.install(app) {
                Ok(_) => summary.installed.push(app.name.clone()),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!(error = %e, "installation failed");
                    summary.failed.push(app.name.clone());
                }
            }
        }
        tracing::info!(
            installed = summary.installed.len(),
            failed = summary.failed.len(),
            failed_apps = ?summary.failed,
            "finished installing all applications"
        );
        Ok(summary)
    }
}
