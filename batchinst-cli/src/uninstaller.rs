use std::path::{Path, PathBuf};

use batchinst_common::{
    types::{AppDescriptor, DEFAULT_UNINSTALL},
    AppConfig, Error, InstallLog, Result,
};
use tracing::instrument;

use crate::runner;

pub(crate) struct Uninstaller {
    log: InstallLog,
    /// delete the installer artifact after a successful uninstall
    purge: bool,
}

impl Uninstaller {
    pub(crate) fn new(log: InstallLog, purge: bool) -> Self {
        Self { log, purge }
    }

    /// Run the uninstall command for `name` and drop it from the install log.
    ///
    /// The command comes from the matching descriptor in `config`, or
    /// [`DEFAULT_UNINSTALL`] if there is none. A failing command leaves the
    /// log entry in place.
    #[instrument(skip(self, config))]
    pub(crate) fn uninstall(&self, config: &AppConfig, name: &str) -> Result<PathBuf> {
        let installed = self.log.read_all()?;
        let installer = installed
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        let template = config
            .find_by_name(name)
            .map_or(DEFAULT_UNINSTALL, AppDescriptor::uninstall_template);

        tracing::info!(installer = ?installer, "uninstalling");
        runner::run(name, template, installer)?;
        self.log.remove(name)?;
        tracing::info!("uninstalled successfully");

        if self.purge {
            self.purge_installer(installer)?;
        }

        Ok(installer.clone())
    }

    /// Delete `installer` unless another logged application still uses it.
    fn purge_installer(&self, installer: &Path) -> Result<()> {
        if self
            .log
            .entries()?
            .iter()
            .any(|entry| entry.installer.as_path() == installer)
        {
            tracing::info!(installer = ?installer, "installer still in use, keeping it");
            return Ok(());
        }

        match std::fs::remove_file(installer) {
            Ok(()) => tracing::info!(installer = ?installer, "removed installer"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(installer = ?installer, error = %e, "failed to remove installer")
            }
        }
        Ok(())
    }
}
