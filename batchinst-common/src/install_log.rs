use std::{
    collections::BTreeMap,
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use fs2::FileExt;

use crate::{
    error::{Error, Result},
    types::InstallLogEntry,
};

/// Text log of installed applications, one `name;installer` entry per line.
///
/// Mutations take an exclusive lock on a `<log>.lock` file next to the log,
/// so concurrent processes do not interleave their rewrites.
#[derive(Debug, Clone)]
pub struct InstallLog {
    path: PathBuf,
}

impl InstallLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record `name` as installed from `installer`.
    pub fn append(&self, name: &str, installer: &Path) -> Result<()> {
        let _lock = self.lock()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(Error::io(&self.path))?;
        writeln!(file, "{name};{}", installer.display()).map_err(Error::io(&self.path))?;
        tracing::debug!(log = ?self.path, name, "appended install log entry");
        Ok(())
    }

    /// All entries in file order. A missing log has no entries.
    pub fn entries(&self) -> Result<Vec<InstallLogEntry>> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(&self.path)(e)),
        };

        let mut entries = Vec::new();
        for (idx, line) in data.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.split(';').collect::<Vec<_>>().as_slice() {
                [name, installer] => entries.push(InstallLogEntry {
                    name: name.to_string(),
                    installer: PathBuf::from(installer),
                }),
                _ => {
                    return Err(Error::LogParse {
                        line: idx + 1,
                        content: line.to_string(),
                    })
                }
            }
        }
        Ok(entries)
    }

    /// Installed applications in the order they were first logged.
    ///
    /// A name logged more than once appears once, with its latest installer.
    pub fn installed(&self) -> Result<Vec<InstallLogEntry>> {
        let mut installed: Vec<InstallLogEntry> = Vec::new();
        for entry in self.entries()? {
            match installed.iter_mut().find(|known| known.name == entry.name) {
                Some(known) => known.installer = entry.installer,
                None => installed.push(entry),
            }
        }
        Ok(installed)
    }

    /// Map of application name to installer path; later lines win on duplicates.
    pub fn read_all(&self) -> Result<BTreeMap<String, PathBuf>> {
        Ok(self
            .entries()?
            .into_iter()
            .map(|entry| (entry.name, entry.installer))
            .collect())
    }

    /// Remove every entry named exactly `name`, returning how many were removed.
    ///
    /// The log is rewritten in place; lines of other entries are kept as is.
    pub fn remove(&self, name: &str) -> Result<usize> {
        let _lock = self.lock()?;
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(Error::io(&self.path)(e)),
        };

        let mut kept = String::with_capacity(data.len());
        let mut removed = 0;
        for line in data.split_inclusive('\n') {
            if entry_name(line) == Some(name) {
                removed += 1;
            } else {
                kept.push_str(line);
            }
        }

        if removed > 0 {
            std::fs::write(&self.path, kept).map_err(Error::io(&self.path))?;
        }
        tracing::debug!(log = ?self.path, name, removed, "removed install log entries");
        Ok(removed)
    }

    fn lock(&self) -> Result<LogLock> {
        let mut lock_path = self.path.clone().into_os_string();
        lock_path.push(".lock");
        let lock_path = PathBuf::from(lock_path);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)
            .map_err(Error::io(&lock_path))?;
        file.lock_exclusive().map_err(Error::io(&lock_path))?;
        Ok(LogLock(file))
    }
}

fn entry_name(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    line.split(';').next()
}

/// Releases the log lock when dropped
struct LogLock(File);

impl Drop for LogLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_log() -> (tempfile::TempDir, InstallLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = InstallLog::new(dir.path().join("install_log.txt"));
        (dir, log)
    }

    #[test]
    fn append_then_read() {
        let (_dir, log) = scratch_log();
        log.append("App1", Path::new("downloads/a.exe")).unwrap();

        let installed = log.read_all().unwrap();
        assert_eq!(installed.len(), 1);
        assert_eq!(installed["App1"], PathBuf::from("downloads/a.exe"));
        assert_eq!(
            std::fs::read_to_string(log.path()).unwrap(),
            "App1;downloads/a.exe\n"
        );

        // still there on the next read
        assert_eq!(log.read_all().unwrap(), installed);
    }

    #[test]
    fn missing_log_is_empty() {
        let (_dir, log) = scratch_log();
        assert!(log.read_all().unwrap().is_empty());
        assert_eq!(log.remove("App1").unwrap(), 0);
        assert!(!log.path().exists());
    }

    #[test]
    fn last_duplicate_wins() {
        let (_dir, log) = scratch_log();
        log.append("App1", Path::new("downloads/old.exe")).unwrap();
        log.append("App1", Path::new("downloads/new.exe")).unwrap();

        assert_eq!(log.entries().unwrap().len(), 2);
        assert_eq!(
            log.read_all().unwrap()["App1"],
            PathBuf::from("downloads/new.exe")
        );
    }

    #[test]
    fn remove_matches_exact_name_only() {
        let (_dir, log) = scratch_log();
        std::fs::write(
            log.path(),
            "Foo;downloads/foo.exe\nFooBar;downloads/foobar.exe\nBaz;downloads/baz.msi\nFoo;downloads/foo2.exe\n",
        )
        .unwrap();

        assert_eq!(log.remove("Foo").unwrap(), 2);
        assert_eq!(
            std::fs::read_to_string(log.path()).unwrap(),
            "FooBar;downloads/foobar.exe\nBaz;downloads/baz.msi\n"
        );
    }

    #[test]
    fn remove_unknown_leaves_file_untouched() {
        let (_dir, log) = scratch_log();
        let content = "App1;downloads/a.exe\nApp2;downloads/b.exe";
        std::fs::write(log.path(), content).unwrap();

        assert_eq!(log.remove("App").unwrap(), 0);
        assert_eq!(std::fs::read_to_string(log.path()).unwrap(), content);
    }

    #[test]
    fn malformed_line() {
        let (_dir, log) = scratch_log();
        std::fs::write(log.path(), "App1;downloads/a.exe\nApp;2;x\n").unwrap();

        let err = log.read_all().unwrap_err();
        assert!(matches!(err, Error::LogParse { line: 2, .. }), "{err}");
        assert!(err.is_fatal());
    }

    #[test]
    fn installed_keeps_log_order() {
        let (_dir, log) = scratch_log();
        log.append("Zed", Path::new("downloads/zed.exe")).unwrap();
        log.append("Alpha", Path::new("downloads/alpha.exe")).unwrap();
        log.append("Zed", Path::new("downloads/zed2.exe")).unwrap();

        assert_eq!(
            log.installed().unwrap(),
            vec![
                InstallLogEntry {
                    name: "Zed".to_string(),
                    installer: PathBuf::from("downloads/zed2.exe"),
                },
                InstallLogEntry {
                    name: "Alpha".to_string(),
                    installer: PathBuf::from("downloads/alpha.exe"),
                },
            ]
        );
    }

    #[test]
    fn append_waits_for_lock() {
        let (dir, log) = scratch_log();
        let holder = File::create(dir.path().join("install_log.txt.lock")).unwrap();
        holder.lock_exclusive().unwrap();

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let writer = {
            let log = log.clone();
            std::thread::spawn(move || {
                log.append("App1", Path::new("downloads/a.exe")).unwrap();
                done_tx.send(()).unwrap();
            })
        };

        std::thread::sleep(std::time::Duration::from_millis(200));
        assert!(done_rx.try_recv().is_err(), "append ran while the log was locked");
        assert!(!log.path().exists());

        FileExt::unlock(&holder).unwrap();
        writer.join().unwrap();
        done_rx.recv().unwrap();
        assert_eq!(
            std::fs::read_to_string(log.path()).unwrap(),
            "App1;downloads/a.exe\n"
        );
    }

    #[test]
    fn lock_file_next_to_log() {
        let (dir, log) = scratch_log();
        log.append("App1", Path::new("downloads/a.exe")).unwrap();
        assert!(dir.path().join("install_log.txt.lock").exists());
    }
}
