//! `dot init`: create the dotfiles skeleton.
use anyhow::{Context as _, Result};
use std::path::Path;

use super::Context;
use crate::deps;
use crate::target::Target;
use crate::vcs::{GitCli, VersionControl};

/// Starter Neovim entry point. Loads the untracked `local.lua` when present.
const STARTER_INIT_LUA: &str = r#"-- Entry point managed by `dot`. Machine-specific settings belong in
-- local.lua next to this file; it is not tracked.

vim.g.mapleader = " "

vim.opt.number = true
vim.opt.relativenumber = true
vim.opt.expandtab = true
vim.opt.shiftwidth = 2
vim.opt.tabstop = 2
vim.opt.termguicolors = true

local local_config = vim.fn.stdpath("config") .. "/local.lua"
if vim.uv.fs_stat(local_config) then
  dofile(local_config)
end
"#;

const STARTER_GITIGNORE: &str = "# Machine-local overrides\nconfig/nvim/local.lua\n";

const STARTER_SETTINGS: &str = r#"# Settings for `dot`. Every key is optional.

editor = "nvim"

[sync]
remote = "origin"
# branch = "main"

[doctor]
required = ["git", "curl"]
"#;

/// Run the init command.
///
/// # Errors
///
/// Returns an error listing every missing tool, or if a directory, file or
/// `git init` step fails.
pub fn run(ctx: &Context<'_>, minimal: bool) -> Result<()> {
    let layout = &ctx.config.layout;

    ctx.log.stage("Checking dependencies");
    deps::check(ctx.executor, &ctx.config.settings.required_tools()).ensure_satisfied()?;

    ctx.log.stage("Creating skeleton");
    for &target in Target::ALL {
        let dir = layout.source_dir(target);
        ctx.fs
            .create_dir_all(&dir)
            .with_context(|| format!("cannot create {}", dir.display()))?;
        ctx.log.info(&format!("created {}", dir.display()));
    }

    if minimal {
        ctx.log.debug("--minimal: skipping starter files");
    } else {
        let init_lua = layout
            .source_dir(Target::Nvim)
            .join(Target::Nvim.config_file());
        write_if_absent(ctx, &init_lua, STARTER_INIT_LUA)?;
        write_if_absent(ctx, &layout.root.join(".gitignore"), STARTER_GITIGNORE)?;
        write_if_absent(ctx, &layout.settings_file(), STARTER_SETTINGS)?;
    }

    ctx.log.stage("Initialising repository");
    let git = GitCli::new(ctx.executor, &layout.root);
    if git.is_repository() {
        ctx.log
            .info(&format!("{} is already a repository", layout.root.display()));
    } else {
        git.init()?;
        ctx.log
            .info(&format!("initialised repository in {}", layout.root.display()));
    }
    Ok(())
}

fn write_if_absent(ctx: &Context<'_>, path: &Path, contents: &str) -> Result<()> {
    if ctx.fs.exists(path) {
        ctx.log
            .info(&format!("{} exists, leaving it alone", path.display()));
        return Ok(());
    }
    ctx.fs
        .write(path, contents.as_bytes())
        .with_context(|| format!("cannot write {}", path.display()))?;
    ctx.log.info(&format!("wrote {}", path.display()));
    Ok(())
}
