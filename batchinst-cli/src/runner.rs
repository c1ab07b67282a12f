use std::{path::Path, process::Command};

use batchinst_common::{types::substitute, Error, Result};

/// Split `template` into shell words and substitute the installer path in each.
///
/// The path is inserted after splitting, so spaces or quotes in it never
/// change the number of arguments.
pub(crate) fn command_line(name: &str, template: &str, installer: &Path) -> Result<Vec<String>> {
    let words = shlex::split(template).ok_or_else(|| Error::Command {
        name: name.to_string(),
        reason: format!("cannot parse command template {template:?}"),
    })?;
    let installer = installer.to_string_lossy();
    Ok(words
        .iter()
        .map(|word| substitute(word, &installer))
        .collect())
}

/// Run the command built from `template` and wait for it to finish.
///
/// The program is spawned directly without a shell; stdio is inherited.
pub(crate) fn run(name: &str, template: &str, installer: &Path) -> Result<()> {
    let argv = command_line(name, template, installer)?;
    let Some((program, args)) = argv.split_first() else {
        return Err(Error::Command {
            name: name.to_string(),
            reason: "command template is empty".to_string(),
        });
    };

    tracing::debug!(?argv, "spawning");
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| Error::Command {
            name: name.to_string(),
            reason: format!("failed to start {program}: {e}"),
        })?;

    if !status.success() {
        let reason = match status.code() {
            Some(code) => format!("{program} exited with status code {code}"),
            None => format!("{program} was terminated by a signal"),
        };
        return Err(Error::Command {
            name: name.to_string(),
            reason,
        });
    }
    Ok(())
}
