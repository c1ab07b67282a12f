use batchinst_common::InstallLog;
use color_eyre::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::{
    args::Format,
    download::Download,
    session::Session,
    utils::{format_output, report},
};

#[derive(Debug, Serialize, Tabled)]
struct Installed {
    name: String,
    installer: String,
}

pub(crate) fn list(log: &InstallLog, format: Format) -> Result<()> {
    let installed: Vec<Installed> = log
        .installed()?
        .into_iter()
        .map(|entry| Installed {
            name: entry.name,
            installer: entry.installer.display().to_string(),
        })
        .collect();

    println!("{}", format_output(installed, format)?);
    Ok(())
}

pub(crate) fn uninstall<D: Download>(session: &Session<D>, name: &str) -> Result<()> {
    report(session.uninstaller.uninstall(&session.config, name))?;
    Ok(())
}
