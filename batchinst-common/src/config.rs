use std::{collections::BTreeMap, path::Path};

use crate::{
    error::{Error, Result},
    types::AppDescriptor,
};

/// Applications that can be installed, keyed by their config line number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    apps: BTreeMap<usize, AppDescriptor>,
}

impl AppConfig {
    /// Load the config file at `path`.
    ///
    /// A missing file is not an error and results in an empty config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(config = ?path, "config file not found, no applications available");
            return Ok(Self::default());
        }
        tracing::debug!(config = ?path, "loading config");
        let data = std::fs::read_to_string(path).map_err(Error::io(path))?;
        Self::parse(&data)
    }

    /// Parse config text, one `name;url;install[;uninstall]` entry per line.
    ///
    /// Blank lines and lines starting with `#` are skipped but still count
    /// towards the numbering of the following entries.
    pub fn parse(data: &str) -> Result<Self> {
        let mut apps = BTreeMap::new();
        for (idx, line) in data.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let number = idx + 1;
            apps.insert(number, parse_line(number, line)?);
        }
        Ok(Self { apps })
    }

    #[must_use]
    pub fn get(&self, number: usize) -> Option<&AppDescriptor> {
        self.apps.get(&number)
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&AppDescriptor> {
        self.apps.values().find(|app| app.name == name)
    }

    /// Descriptors in ascending number order
    pub fn iter(&self) -> impl Iterator<Item = &AppDescriptor> {
        self.apps.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

fn parse_line(number: usize, line: &str) -> Result<AppDescriptor> {
    let fields: Vec<&str> = line.split(';').map(str::trim).collect();
    let (name, url, install, uninstall) = match fields.as_slice() {
        [name, url, install] => (name, url, install, None),
        [name, url, install, uninstall] => (name, url, install, Some(uninstall)),
        _ => {
            return Err(Error::ConfigParse {
                line: number,
                reason: format!(
                    "expected `name;url;command[;uninstall]`, found {} field(s)",
                    fields.len()
                ),
            })
        }
    };
    if name.is_empty() {
        return Err(Error::ConfigParse {
            line: number,
            reason: "application name is empty".to_string(),
        });
    }

    Ok(AppDescriptor {
        number,
        name: name.to_string(),
        url: url.to_string(),
        install: install.to_string(),
        uninstall: uninstall
            .filter(|cmd| !cmd.is_empty())
            .map(|cmd| cmd.to_string()),
    })
}
