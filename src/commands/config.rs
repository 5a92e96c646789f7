//! `dot config edit` and `dot config show`.
use anyhow::{Context as _, Result, bail};
use std::io::Write;

use super::Context;
use crate::target::Target;

/// Open the tracked entry file for `target` in the user's editor.
///
/// Edits go to the source copy under the dotfiles root so they can be
/// committed and synced; run `dot update` to install them.
///
/// # Errors
///
/// Returns an error if the source file is missing or the editor exits
/// non-zero.
pub fn edit(ctx: &Context<'_>, target: Target) -> Result<()> {
    let path = ctx
        .config
        .layout
        .source_dir(target)
        .join(target.config_file());
    if !ctx.fs.is_file(&path) {
        bail!(
            "{} does not exist; run `dot init` first",
            path.display()
        );
    }

    let command = editor_command(std::env::var("EDITOR").ok(), &ctx.config.settings.editor);
    let Some((program, args)) = command.split_first() else {
        bail!("no editor configured");
    };
    let path_arg = path.to_string_lossy();
    let mut argv: Vec<&str> = args.iter().map(String::as_str).collect();
    argv.push(&path_arg);

    ctx.log
        .debug(&format!("running {program} {}", argv.join(" ")));
    ctx.executor
        .run_interactive(program, &argv)
        .with_context(|| format!("editing {}", path.display()))
}

/// Write the installed entry file for `target` to `out`, byte for byte.
///
/// # Errors
///
/// Returns an error if the file is missing or `out` cannot be written.
pub fn show(ctx: &Context<'_>, target: Target, out: &mut dyn Write) -> Result<()> {
    let path = ctx
        .config
        .layout
        .install_dir(target)
        .join(target.config_file());
    let contents = ctx
        .fs
        .read(&path)
        .with_context(|| {
            format!(
                "cannot read {}; run `dot install {target}` first",
                path.display()
            )
        })?;
    out.write_all(&contents)?;
    out.flush()?;
    Ok(())
}

/// `$EDITOR` split on whitespace, or `fallback` when unset or blank.
fn editor_command(env_editor: Option<String>, fallback: &str) -> Vec<String> {
    let chosen = env_editor
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    chosen.split_whitespace().map(str::to_string).collect()
}
