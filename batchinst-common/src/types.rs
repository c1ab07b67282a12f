use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Token in a command template that is replaced with the local installer path.
pub const PLACEHOLDER: &str = "{installer}";

/// Uninstall template used when a descriptor does not carry its own.
pub const DEFAULT_UNINSTALL: &str = "msiexec /x {installer} /quiet";

/// One configured application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// 1-based line position in the config file
    pub number: usize,
    pub name: String,
    pub url: String,
    /// install command template, usually containing [`PLACEHOLDER`]
    pub install: String,
    pub uninstall: Option<String>,
}

impl AppDescriptor {
    /// Uninstall template for this application, falling back to [`DEFAULT_UNINSTALL`]
    #[must_use]
    pub fn uninstall_template(&self) -> &str {
        self.uninstall.as_deref().unwrap_or(DEFAULT_UNINSTALL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallLogEntry {
    pub name: String,
    pub installer: PathBuf,
}

/// Replace every occurrence of [`PLACEHOLDER`] in `template` with `installer`.
#[must_use]
pub fn substitute(template: &str, installer: &str) -> String {
    template.replace(PLACEHOLDER, installer)
}

#[test]
fn substitute_all_occurrences() {
    assert_eq!(
        substitute("{installer} --copy {installer}.bak", "downloads/a.exe"),
        "downloads/a.exe --copy downloads/a.exe.bak"
    );
    assert_eq!(substitute("setup /S", "ignored"), "setup /S");
}

#[test]
fn uninstall_template_falls_back_to_msiexec() {
    let mut app = AppDescriptor {
        number: 1,
        name: "App1".to_string(),
        url: "http://example.com/a.msi".to_string(),
        install: "msiexec /i {installer}".to_string(),
        uninstall: None,
    };
    assert_eq!(app.uninstall_template(), DEFAULT_UNINSTALL);

    app.uninstall = Some("{installer} /uninstall".to_string());
    assert_eq!(app.uninstall_template(), "{installer} /uninstall");
}
