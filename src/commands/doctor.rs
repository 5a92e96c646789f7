//! `dot doctor`: read-only diagnostics.
//!
//! Problems are reported as warnings; the command itself always succeeds.
use anyhow::{Context as _, Result};
use sha2::{Digest, Sha256};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::Context;
use crate::deps;
use crate::target::Target;

/// Run the doctor command.
///
/// # Errors
///
/// Returns an error only if the health report cannot be written to `out`.
pub fn run(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    check_dependencies(ctx);
    for &target in Target::ALL {
        check_target(ctx, target);
    }
    health_check(ctx, out)
}

fn check_dependencies(ctx: &Context<'_>) {
    ctx.log.stage("Dependencies");
    let report = deps::check(ctx.executor, &ctx.config.settings.required_tools());
    for (tool, path) in &report.found {
        ctx.log.info(&format!("{tool}: {}", path.display()));
    }
    for tool in &report.missing {
        match ctx.platform.install_hint(tool) {
            Some(hint) => ctx
                .log
                .warn(&format!("{tool} not found (install with: {hint})")),
            None => ctx.log.warn(&format!("{tool} not found")),
        }
    }
}

fn check_target(ctx: &Context<'_>, target: Target) {
    ctx.log.stage(&format!("Configuration: {target}"));
    let source = ctx.config.layout.source_dir(target);
    let installed = ctx.config.layout.install_dir(target);

    let have_source = ctx.fs.exists(&source);
    let have_installed = ctx.fs.exists(&installed);
    report_dir(ctx, "source", &source, have_source);
    report_dir(ctx, "installed", &installed, have_installed);

    let local = installed.join(target.local_override());
    if ctx.fs.is_file(&local) {
        ctx.log
            .info(&format!("local override: {}", local.display()));
    } else {
        ctx.log.debug(&format!("no local override at {}", local.display()));
    }

    if !(have_source && have_installed) {
        return;
    }
    let skip = [target.local_override()];
    match (tree_digest(&source, &skip), tree_digest(&installed, &skip)) {
        (Ok(a), Ok(b)) if a == b => ctx.log.info("installed copy matches source"),
        (Ok(_), Ok(_)) => ctx.log.warn(&format!(
            "installed copy differs from source; run `dot update {target}`"
        )),
        (Err(e), _) | (_, Err(e)) => ctx.log.warn(&format!("cannot compare trees: {e}")),
    }
}

fn report_dir(ctx: &Context<'_>, label: &str, path: &Path, present: bool) {
    if present {
        ctx.log.info(&format!("{label}: {}", path.display()));
    } else {
        ctx.log.warn(&format!("{label} missing: {}", path.display()));
    }
}

/// SHA-256 over every file under `root` (relative path and contents, in
/// sorted order), skipping `.git` and top-level entries named in `skip`.
///
/// # Errors
///
/// Returns the first error reading a directory or file.
pub fn tree_digest(root: &Path, skip: &[&str]) -> io::Result<[u8; 32]> {
    let mut files = Vec::new();
    collect_files(root, root, skip, &mut files)?;
    files.sort();

    let mut hasher = Sha256::new();
    for rel in &files {
        hasher.update(rel.to_string_lossy().as_bytes());
        hasher.update([0u8]);
        hasher.update(std::fs::read(root.join(rel))?);
        hasher.update([0u8]);
    }
    Ok(hasher.finalize().into())
}

fn collect_files(
    root: &Path,
    dir: &Path,
    skip: &[&str],
    files: &mut Vec<PathBuf>,
) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        if name == ".git" || (dir == root && skip.iter().any(|s| name == *s)) {
            continue;
        }
        if path.is_dir() {
            collect_files(root, &path, skip, files)?;
        } else if let Ok(rel) = path.strip_prefix(root) {
            files.push(rel.to_path_buf());
        }
    }
    Ok(())
}

fn health_check(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    ctx.log.stage("Health check");
    let editor = ctx.config.settings.editor.as_str();
    if ctx.executor.which(editor).is_none() {
        ctx.log
            .warn(&format!("{editor} not found; skipping health check"));
        return Ok(());
    }

    let scratch = match tempfile::Builder::new().prefix("dot-checkhealth").tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            ctx.log
                .warn(&format!("cannot create a directory for the health report: {e}"));
            return Ok(());
        }
    };
    let report = scratch.path().join("checkhealth.txt");
    let write_cmd = write_command(&report);
    let result = ctx.executor.run_unchecked(
        editor,
        &["--headless", "-c", "checkhealth", "-c", &write_cmd, "-c", "qall!"],
    );

    match result {
        Ok(r) if !r.success => ctx.log.warn(&format!(
            "{editor} exited with {}: {}",
            r.code.unwrap_or(-1),
            r.stderr.trim()
        )),
        Ok(_) => {}
        Err(e) => {
            ctx.log.warn(&format!("cannot run {editor}: {e:#}"));
            return Ok(());
        }
    }

    match ctx.fs.read(&report) {
        Ok(contents) => {
            out.write_all(&contents)
                .context("writing health report")?;
            out.flush()?;
        }
        Err(e) => ctx.log.warn(&format!("no health report produced: {e}")),
    }
    Ok(())
}

/// Ex command that saves the current buffer to `path`.
///
/// The path goes through `fnameescape()` inside a single-quoted Vim string,
/// where the only special character is `'` (written as `''`).
fn write_command(path: &Path) -> String {
    let quoted = path.to_string_lossy().replace('\'', "''");
    format!("execute 'write! ' . fnameescape('{quoted}')")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::test_support::{config_in, debian};
    use crate::exec::FakeExecutor;
    use crate::logging::{Level, MemoryLog};
    use crate::operations::{MockFileSystemOps, SystemFileSystemOps, copy_dir_recursive};

    fn seed_source(config: &crate::config::Config) -> PathBuf {
        let source = config.layout.source_dir(Target::Nvim);
        std::fs::create_dir_all(source.join("lua")).unwrap();
        std::fs::write(source.join("init.lua"), "require('core')\n").unwrap();
        std::fs::write(source.join("lua/core.lua"), "return {}\n").unwrap();
        source
    }

    #[test]
    fn digest_ignores_git_and_local_override() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        std::fs::write(a.path().join("init.lua"), "x").unwrap();
        std::fs::write(b.path().join("init.lua"), "x").unwrap();
        std::fs::create_dir(b.path().join(".git")).unwrap();
        std::fs::write(b.path().join(".git/HEAD"), "ref").unwrap();
        std::fs::write(b.path().join("local.lua"), "-- mine").unwrap();
        assert_eq!(
            tree_digest(a.path(), &["local.lua"]).unwrap(),
            tree_digest(b.path(), &["local.lua"]).unwrap()
        );
    }

    #[test]
    fn digest_detects_renames_and_edits() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        std::fs::write(a.path().join("one.lua"), "x").unwrap();
        std::fs::write(b.path().join("two.lua"), "x").unwrap();
        assert_ne!(
            tree_digest(a.path(), &[]).unwrap(),
            tree_digest(b.path(), &[]).unwrap()
        );
    }

    #[test]
    fn reports_missing_tools_with_hint() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let platform = debian();
        let log = MemoryLog::new();
        let exec = FakeExecutor::new().with_program("git");
        let ctx = Context {
            config: &config,
            platform: &platform,
            log: &log,
            executor: &exec,
            fs: &SystemFileSystemOps,
        };
        let mut out = Vec::new();
        run(&ctx, &mut out).unwrap();
        assert!(log.contains(Level::Info, "git: /usr/bin/git"));
        assert!(log.contains(Level::Warn, "sudo apt-get install -y curl"));
        assert!(log.contains(Level::Warn, "sudo apt-get install -y neovim"));
        assert!(log.contains(Level::Warn, "skipping health check"));
        assert!(out.is_empty());
    }

    #[test]
    fn reports_drift_after_source_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let source = seed_source(&config);
        let installed = config.layout.install_dir(Target::Nvim);
        copy_dir_recursive(&source, &installed).unwrap();
        std::fs::write(installed.join("local.lua"), "-- host only\n").unwrap();

        let platform = debian();
        let exec = FakeExecutor::new();
        let log = MemoryLog::new();
        let ctx = Context {
            config: &config,
            platform: &platform,
            log: &log,
            executor: &exec,
            fs: &SystemFileSystemOps,
        };
        check_target(&ctx, Target::Nvim);
        assert!(log.contains(Level::Info, "matches source"));
        assert!(log.contains(Level::Info, "local override"));

        std::fs::write(source.join("init.lua"), "require('changed')\n").unwrap();
        let log = MemoryLog::new();
        let ctx = Context { log: &log, ..ctx };
        check_target(&ctx, Target::Nvim);
        assert!(log.contains(Level::Warn, "dot update nvim"));
    }

    #[test]
    fn missing_directories_are_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let platform = debian();
        let exec = FakeExecutor::new();
        let log = MemoryLog::new();
        let ctx = Context {
            config: &config,
            platform: &platform,
            log: &log,
            executor: &exec,
            fs: &SystemFileSystemOps,
        };
        check_target(&ctx, Target::Nvim);
        assert!(log.contains(Level::Warn, "source missing"));
        assert!(log.contains(Level::Warn, "installed missing"));
    }

    const WRITE_PREFIX: &str = "execute 'write! ' . fnameescape('";

    /// Stand-in for `nvim --headless`: writes a report where the editor would.
    fn write_fake_report(args: &[&str]) {
        let quoted = args
            .iter()
            .find_map(|a| a.strip_prefix(WRITE_PREFIX)?.strip_suffix("')"))
            .unwrap();
        std::fs::write(quoted.replace("''", "'"), "health#nvim\n- OK ✓\n").unwrap();
    }

    #[test]
    fn write_command_escapes_quotes_for_fnameescape() {
        assert_eq!(
            write_command(Path::new("/tmp/it's here/report.txt")),
            "execute 'write! ' . fnameescape('/tmp/it''s here/report.txt')"
        );
    }

    #[test]
    fn health_report_is_copied_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let platform = debian();
        let exec = FakeExecutor::new()
            .with_program("nvim")
            .on_run("nvim --headless", write_fake_report);
        let log = MemoryLog::new();
        let ctx = Context {
            config: &config,
            platform: &platform,
            log: &log,
            executor: &exec,
            fs: &SystemFileSystemOps,
        };
        let mut out = Vec::new();
        health_check(&ctx, &mut out).unwrap();
        assert_eq!(out, "health#nvim\n- OK ✓\n".as_bytes());
        assert!(log.messages(Level::Warn).is_empty());
    }

    #[test]
    fn target_checks_go_through_filesystem_ops() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let installed = config.layout.install_dir(Target::Nvim);
        let fs = MockFileSystemOps::new()
            .with_existing(config.layout.source_dir(Target::Nvim))
            .with_existing(&installed)
            .with_file(installed.join("local.lua"), b"-- host only\n");
        let platform = debian();
        let exec = FakeExecutor::new();
        let log = MemoryLog::new();
        let ctx = Context {
            config: &config,
            platform: &platform,
            log: &log,
            executor: &exec,
            fs: &fs,
        };
        check_target(&ctx, Target::Nvim);
        assert!(!log.contains(Level::Warn, "source missing"));
        assert!(!log.contains(Level::Warn, "installed missing"));
        assert!(log.contains(Level::Info, "local override"));
    }

    #[test]
    fn health_check_invokes_headless_editor() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let platform = debian();
        let exec = FakeExecutor::new().with_program("nvim");
        let log = MemoryLog::new();
        let ctx = Context {
            config: &config,
            platform: &platform,
            log: &log,
            executor: &exec,
            fs: &SystemFileSystemOps,
        };
        let mut out = Vec::new();
        health_check(&ctx, &mut out).unwrap();
        let calls = exec.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls.iter().all(|c| {
            c.starts_with("nvim --headless -c checkhealth -c execute 'write! ' . fnameescape(")
                && c.ends_with(" -c qall!")
        }));
        // The fake editor writes nothing, so no report is printed.
        assert!(log.contains(Level::Warn, "no health report produced"));
        assert!(out.is_empty());
    }
}
