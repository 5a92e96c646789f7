//! Command-line entry point for `dot`.
use clap::Parser;
use std::process::ExitCode;

use dot_cli::cli::Cli;
use dot_cli::commands::{self, Context};
use dot_cli::config::Config;
use dot_cli::exec::SystemExecutor;
use dot_cli::logging::{LogOptions, Logger, init_subscriber};
use dot_cli::operations::SystemFileSystemOps;
use dot_cli::platform::Platform;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let command = args.command.name();
    init_subscriber(
        LogOptions {
            debug: args.global.debug,
            color: !args.global.no_color,
        },
        command,
    );
    let log = Logger::new(command);
    if let Some(path) = log.log_path() {
        log.debug(&format!("logging to {}", path.display()));
    }

    let result = Config::load(args.global.root.as_deref()).and_then(|config| {
        let platform = Platform::detect();
        log.debug(&format!(
            "root {}, config home {}, platform {}",
            config.layout.root.display(),
            config.layout.config_home.display(),
            platform.os
        ));
        let ctx = Context {
            config: &config,
            platform: &platform,
            log: &log,
            executor: &SystemExecutor,
            fs: &SystemFileSystemOps,
        };
        commands::dispatch(&args.command, &ctx, &mut std::io::stdout().lock())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
