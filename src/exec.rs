//! External process execution behind the [`Executor`] capability.
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// A successful result with the given stdout (used by fakes).
    #[must_use]
    pub fn ok(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            success: true,
            code: Some(0),
            ..Self::default()
        }
    }

    /// A failed result with the given stderr (used by fakes).
    #[must_use]
    pub fn failed(stderr: &str) -> Self {
        Self {
            stderr: stderr.to_string(),
            success: false,
            code: Some(1),
            ..Self::default()
        }
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over running external programs.
///
/// Every side effect `dot` has beyond the filesystem goes through this
/// trait, so command logic can be exercised with fakes instead of real
/// subprocesses. Production code uses [`SystemExecutor`].
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a program in `dir`, returning the result even on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be started.
    fn run_in_unchecked(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a program, returning the result even on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be started.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a program attached to the current terminal (inherited stdio).
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started or exits non-zero.
    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<()>;

    /// Resolve `program` on `PATH`.
    fn which(&self, program: &str) -> Option<PathBuf>;
}

/// Production [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_in_unchecked(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .with_context(|| format!("failed to execute: {program} in {}", dir.display()))?;
        Ok(ExecResult::from(output))
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;

        Ok(ExecResult::from(output))
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<()> {
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to execute: {program}"))?;
        if !status.success() {
            bail!("{program} exited with {status}");
        }
        Ok(())
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Scripted [`Executor`] for unit tests.
///
/// Programs registered with [`with_program`](Self::with_program) resolve via
/// `which`. Responses are matched against the command line
/// (`program arg1 arg2 ...`) by prefix and consumed in order; unmatched
/// commands succeed with empty output. Hooks registered with
/// [`on_run`](Self::on_run) run on every matching command line, so a fake
/// program can leave files behind. Every invocation is recorded.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FakeExecutor {
    programs: std::collections::HashMap<String, PathBuf>,
    responses: std::sync::Mutex<Vec<(String, ExecResult)>>,
    hooks: Vec<(String, fn(&[&str]))>,
    calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FakeExecutor {
    /// Create a fake with no programs on `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program` resolvable on the fake `PATH`.
    #[must_use]
    pub fn with_program(mut self, program: &str) -> Self {
        self.programs
            .insert(program.to_string(), PathBuf::from("/usr/bin").join(program));
        self
    }

    /// Queue `result` for the next command line starting with `prefix`.
    #[must_use]
    pub fn respond(self, prefix: &str, result: ExecResult) -> Self {
        self.responses
            .lock()
            .expect("fake responses poisoned")
            .push((prefix.to_string(), result));
        self
    }

    /// Call `hook` with the arguments of each command line starting with
    /// `prefix`.
    #[must_use]
    pub fn on_run(mut self, prefix: &str, hook: fn(&[&str])) -> Self {
        self.hooks.push((prefix.to_string(), hook));
        self
    }

    /// Every command line run so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("fake call log poisoned").clone()
    }

    fn dispatch(&self, program: &str, args: &[&str]) -> ExecResult {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls
            .lock()
            .expect("fake call log poisoned")
            .push(line.clone());
        for (prefix, hook) in &self.hooks {
            if line.starts_with(prefix.as_str()) {
                hook(args);
            }
        }
        let mut responses = self.responses.lock().expect("fake responses poisoned");
        let matched = responses
            .iter()
            .position(|(prefix, _)| line.starts_with(prefix.as_str()));
        match matched {
            Some(i) => responses.remove(i).1,
            None => ExecResult::ok(""),
        }
    }

}

#[cfg(test)]
impl Executor for FakeExecutor {
    fn run_in_unchecked(&self, _dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        Ok(self.dispatch(program, args))
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        Ok(self.dispatch(program, args))
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<()> {
        let result = self.dispatch(program, args);
        if !result.success {
            bail!("{program} exited with {}", result.code.unwrap_or(-1));
        }
        Ok(())
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        self.programs.get(program).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn run_unchecked_captures_stdout() {
        let result = SystemExecutor.run_unchecked("echo", &["hello"]).unwrap();
        assert!(result.success, "echo command should succeed");
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn run_unchecked_failure() {
        let result = SystemExecutor.run_unchecked("false", &[]).unwrap();
        assert!(!result.success, "non-zero exit should set success=false");
        assert_eq!(result.code, Some(1));
    }

    #[test]
    fn run_in_unchecked_uses_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemExecutor
            .run_in_unchecked(dir.path(), "pwd", &[])
            .unwrap();
        let reported = PathBuf::from(result.stdout.trim());
        assert_eq!(
            dunce::canonicalize(reported).unwrap(),
            dunce::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn run_in_unchecked_keeps_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemExecutor
            .run_in_unchecked(dir.path(), "ls", &["definitely-not-here"])
            .unwrap();
        assert!(!result.success);
        assert!(!result.stderr.is_empty());
    }

    #[test]
    fn run_interactive_reports_exit_status() {
        assert!(SystemExecutor.run_interactive("true", &[]).is_ok());
        assert!(SystemExecutor.run_interactive("false", &[]).is_err());
    }

    #[test]
    fn which_finds_known_program() {
        assert!(SystemExecutor.which("sh").is_some(), "sh should be on PATH");
    }

    #[test]
    fn which_missing_program() {
        assert!(
            SystemExecutor
                .which("this-program-does-not-exist-12345")
                .is_none(),
            "non-existent program should not be found"
        );
    }

    #[test]
    fn fake_results() {
        assert!(ExecResult::ok("x").success);
        assert!(!ExecResult::failed("y").success);
    }

    #[test]
    fn fake_executor_consumes_responses_in_order() {
        let exec = FakeExecutor::new()
            .respond("git status", ExecResult::ok(" M init.lua\n"))
            .respond("git status", ExecResult::ok(""));
        let dir = Path::new("/repo");
        let first = exec
            .run_in_unchecked(dir, "git", &["status", "--porcelain"])
            .unwrap();
        let second = exec
            .run_in_unchecked(dir, "git", &["status", "--porcelain"])
            .unwrap();
        assert_eq!(first.stdout, " M init.lua\n");
        assert_eq!(second.stdout, "");
        assert_eq!(exec.calls().len(), 2);
    }

    #[test]
    fn fake_executor_interactive_fails_on_scripted_failure() {
        let exec = FakeExecutor::new().respond("nvim init.lua", ExecResult::failed("E325"));
        assert!(exec.run_interactive("nvim", &["init.lua"]).is_err());
        assert!(
            exec.run_interactive("nvim", &["init.lua"]).is_ok(),
            "response was consumed"
        );
    }

    #[test]
    fn fake_executor_which() {
        let exec = FakeExecutor::new().with_program("git");
        assert_eq!(exec.which("git"), Some(PathBuf::from("/usr/bin/git")));
        assert_eq!(exec.which("nvim"), None);
    }
}
