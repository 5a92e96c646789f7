//! Config installer: back up the live directory, then copy the bundled one.
use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::InstallError;
use crate::logging::Log;
use crate::operations::FileSystemOps;

/// Timestamp format appended to backup directories.
pub const BACKUP_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// What a successful install did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Directory that now holds the fresh copy.
    pub target: PathBuf,
    /// Where the previous configuration was moved, if there was one.
    pub backup: Option<PathBuf>,
}

/// Copies a configuration source into place.
///
/// The sequence is linear: back up, create, copy. There is no rollback; a
/// copy failure leaves a partial target and the error names the backup.
#[derive(Debug)]
pub struct ConfigInstaller<'a> {
    fs: &'a dyn FileSystemOps,
    log: &'a dyn Log,
    now: fn() -> DateTime<Local>,
}

impl<'a> ConfigInstaller<'a> {
    /// Create an installer stamping backups with the local wall clock.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystemOps, log: &'a dyn Log) -> Self {
        Self {
            fs,
            log,
            now: Local::now,
        }
    }

    /// Replace the clock used for backup names.
    #[must_use]
    pub fn with_clock(mut self, now: fn() -> DateTime<Local>) -> Self {
        self.now = now;
        self
    }

    /// Install `source` at `target`, backing up whatever was there.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::SourceMissing`] without touching anything if
    /// `source` does not exist, or the first backup, mkdir or copy failure.
    pub fn install(&self, source: &Path, target: &Path) -> Result<InstallOutcome, InstallError> {
        if !self.fs.exists(source) {
            return Err(InstallError::SourceMissing {
                path: source.to_path_buf(),
            });
        }

        let backup = if self.fs.exists_no_follow(target) {
            let backup = self.backup_path(target);
            self.fs
                .rename(target, &backup)
                .map_err(|source| InstallError::Backup {
                    target: target.to_path_buf(),
                    backup: backup.clone(),
                    source,
                })?;
            self.log.info(&format!(
                "backed up {} to {}",
                target.display(),
                backup.display()
            ));
            Some(backup)
        } else {
            None
        };

        self.fs
            .create_dir_all(target)
            .map_err(|source| InstallError::CreateDir {
                path: target.to_path_buf(),
                source,
            })?;

        self.log.debug(&format!(
            "copying {} -> {}",
            source.display(),
            target.display()
        ));
        self.fs
            .copy_dir(source, target)
            .map_err(|err| InstallError::Copy {
                target: target.to_path_buf(),
                backup: backup.clone(),
                source: err,
            })?;

        self.log.info(&format!("installed {}", target.display()));
        Ok(InstallOutcome {
            target: target.to_path_buf(),
            backup,
        })
    }

    /// `<target>.backup.<stamp>`, with `_N` appended until the name is free.
    fn backup_path(&self, target: &Path) -> PathBuf {
        let stamp = (self.now)().format(BACKUP_STAMP_FORMAT).to_string();
        let mut base = OsString::from(target.as_os_str());
        base.push(".backup.");
        base.push(&stamp);

        let mut candidate = PathBuf::from(&base);
        let mut n = 1u32;
        while self.fs.exists_no_follow(&candidate) {
            let mut name = base.clone();
            name.push(format!("_{n}"));
            candidate = PathBuf::from(name);
            n += 1;
        }
        candidate
    }
}
