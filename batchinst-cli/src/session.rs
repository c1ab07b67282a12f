use batchinst_common::{AppConfig, InstallLog};

use crate::{download::Download, installer::Installer, uninstaller::Uninstaller};

/// Everything one run of the installer operates on.
pub(crate) struct Session<D> {
    pub(crate) config: AppConfig,
    pub(crate) log: InstallLog,
    pub(crate) installer: Installer<D>,
    pub(crate) uninstaller: Uninstaller,
}

impl<D: Download> Session<D> {
    pub(crate) fn new(config: AppConfig, log: InstallLog, downloader: D, purge: bool) -> Self {
        Self {
            installer: Installer::new(downloader, log.clone()),
            uninstaller: Uninstaller::new(log.clone(), purge),
            config,
            log,
        }
    }
}
