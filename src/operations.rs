//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the installer and commands
//! can be unit-tested without touching the real filesystem. Production code
//! uses [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::io;
use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;

/// Abstraction over the filesystem primitives `dot` relies on.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists on the filesystem, following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if there is any entry at `path`, including a symlink
    /// whose target is missing.
    fn exists_no_follow(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Rename `from` to `to` (same filesystem).
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create `path` and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Recursively copy the contents of `src` into `dst`, skipping `.git`
    /// and recreating symlinks as links.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error encountered; entries copied before the
    /// failure are left in place.
    fn copy_dir(&self, src: &Path, dst: &Path) -> io::Result<()>;

    /// Read the full contents of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write `contents` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn exists_no_follow(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn copy_dir(&self, src: &Path, dst: &Path) -> io::Result<()> {
        copy_dir_recursive(src, dst)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// Copy every entry under `src` into `dst`, creating `dst` if needed.
///
/// Entries named `.git` are skipped. Symlinks are not followed: on Unix each
/// link is recreated with the same target, so dangling links and links back
/// into the tree are copied as they are. Other platforms copy what the link
/// points at.
///
/// # Errors
///
/// Returns the first I/O error, with the path it occurred on in the message.
/// Entries copied before the failure stay in place.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dst).map_err(at(dst))?;
    for entry in std::fs::read_dir(src).map_err(at(src))? {
        let entry = entry.map_err(at(src))?;
        let name = entry.file_name();
        if name == ".git" {
            continue;
        }
        let from = entry.path();
        let to = dst.join(&name);
        let kind = entry.file_type().map_err(at(&from))?;
        if kind.is_symlink() {
            copy_link(&from, &to)?;
        } else if kind.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(at(&from))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_link(from: &Path, to: &Path) -> io::Result<()> {
    let target = std::fs::read_link(from).map_err(at(from))?;
    std::os::unix::fs::symlink(&target, to).map_err(at(to))
}

#[cfg(not(unix))]
fn copy_link(from: &Path, to: &Path) -> io::Result<()> {
    if from.is_dir() {
        copy_dir_recursive(from, to)
    } else {
        std::fs::copy(from, to).map(|_| ()).map_err(at(from))
    }
}

/// Prefix an I/O error with `path`, keeping its kind.
fn at(path: &Path) -> impl Fn(io::Error) -> io::Error + '_ {
    move |err| io::Error::new(err.kind(), format!("{}: {err}", path.display()))
}

/// A filesystem call recorded by `MockFileSystemOps`.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsCall {
    /// `rename(from, to)`
    Rename(PathBuf, PathBuf),
    /// `create_dir_all(path)`
    CreateDirAll(PathBuf),
    /// `copy_dir(src, dst)`
    CopyDir(PathBuf, PathBuf),
    /// `write(path)`
    Write(PathBuf),
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Pre-configure existing paths and file contents with the builder-style
/// methods. Mutating calls are recorded rather than performed; `rename`
/// updates the set of existing paths so collision handling can be tested.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    existing: std::sync::Mutex<std::collections::HashSet<PathBuf>>,
    dangling: std::sync::Mutex<std::collections::HashSet<PathBuf>>,
    files: std::collections::HashMap<PathBuf, Vec<u8>>,
    fail_copy: bool,
    calls: std::sync::Mutex<Vec<FsCall>>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as existing.
    #[must_use]
    pub fn with_existing(self, path: impl Into<PathBuf>) -> Self {
        self.existing
            .lock()
            .expect("mock existing set poisoned")
            .insert(path.into());
        self
    }

    /// Place a symlink at `path` whose target does not exist.
    #[must_use]
    pub fn with_dangling_link(self, path: impl Into<PathBuf>) -> Self {
        self.dangling
            .lock()
            .expect("mock dangling set poisoned")
            .insert(path.into());
        self
    }

    /// Register a regular file at `path` with `contents`.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &[u8]) -> Self {
        let p = path.into();
        self.files.insert(p.clone(), contents.to_vec());
        self.with_existing(p)
    }

    /// Make every `copy_dir` call fail.
    #[must_use]
    pub const fn failing_copy(mut self) -> Self {
        self.fail_copy = true;
        self
    }

    /// Return every mutating call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<FsCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    fn record(&self, call: FsCall) {
        self.calls.lock().expect("mock call log poisoned").push(call);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.existing
            .lock()
            .expect("mock existing set poisoned")
            .contains(path)
    }

    fn exists_no_follow(&self, path: &Path) -> bool {
        self.exists(path)
            || self
                .dangling
                .lock()
                .expect("mock dangling set poisoned")
                .contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut dangling = self.dangling.lock().expect("mock dangling set poisoned");
        if dangling.remove(from) {
            dangling.insert(to.to_path_buf());
        } else {
            let mut existing = self.existing.lock().expect("mock existing set poisoned");
            if !existing.remove(from) {
                return Err(io::Error::from(io::ErrorKind::NotFound));
            }
            existing.insert(to.to_path_buf());
        }
        drop(dangling);
        self.record(FsCall::Rename(from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.existing
            .lock()
            .expect("mock existing set poisoned")
            .insert(path.to_path_buf());
        self.record(FsCall::CreateDirAll(path.to_path_buf()));
        Ok(())
    }

    fn copy_dir(&self, src: &Path, dst: &Path) -> io::Result<()> {
        self.record(FsCall::CopyDir(src.to_path_buf(), dst.to_path_buf()));
        if self.fail_copy {
            return Err(io::Error::other("mock: copy failed"));
        }
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn write(&self, path: &Path, _contents: &[u8]) -> io::Result<()> {
        self.existing
            .lock()
            .expect("mock existing set poisoned")
            .insert(path.to_path_buf());
        self.record(FsCall::Write(path.to_path_buf()));
        Ok(())
    }
}
