//! Dependency checker: are the required executables on `PATH`?
use std::path::PathBuf;

use crate::error::DependencyError;
use crate::exec::Executor;

/// Outcome of resolving every required tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyReport {
    /// Tools that resolved, with their paths, in check order.
    pub found: Vec<(String, PathBuf)>,
    /// Tools that did not resolve, in check order.
    pub missing: Vec<String>,
}

impl DependencyReport {
    /// Returns `true` if nothing is missing.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }

    /// Fail with one error naming every missing tool.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::Missing`] if any tool is missing.
    pub fn ensure_satisfied(&self) -> Result<(), DependencyError> {
        if self.is_satisfied() {
            Ok(())
        } else {
            Err(DependencyError::Missing {
                tools: self.missing.clone(),
            })
        }
    }
}

/// Resolve each of `required` on `PATH`. Never installs anything.
pub fn check<S: AsRef<str>>(executor: &dyn Executor, required: &[S]) -> DependencyReport {
    let mut report = DependencyReport::default();
    for tool in required {
        let tool = tool.as_ref();
        match executor.which(tool) {
            Some(path) => report.found.push((tool.to_string(), path)),
            None => report.missing.push(tool.to_string()),
        }
    }
    report
}
