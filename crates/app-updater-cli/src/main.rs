//! Application updater CLI.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use app_updater::UpdateService;
use app_updater_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use app_updater_cli::commands::{run_check, run_status, run_watch};
use app_updater_cli::logging::{LogConfig, LogFormat, init_logging};
use app_updater_cli::settings::{CliSettings, Overrides};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(&cli).await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            eprintln!("error: {error:#}");
            2
        }
    };
    std::process::exit(exit_code);
}

async fn run(cli: &Cli) -> Result<bool> {
    let settings = CliSettings::load(cli.config.as_deref())?;
    let current_version = cli
        .current_version
        .clone()
        .context("--current-version is required")?;
    let (config, updates) = settings.resolve(Overrides {
        current_version,
        data_dir: cli.data_dir.clone(),
        platform: cli.platform.map(Into::into),
    })?;

    if let Command::Status = cli.command {
        run_status(&config, &updates);
        return Ok(true);
    }

    let service = UpdateService::from_config(config).context("create update service")?;
    match &cli.command {
        Command::Check(args) => run_check(&service, args).await,
        Command::Watch(args) => run_watch(&service, &updates, args).await.map(|()| true),
        Command::Status => Ok(true),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_timestamps = cli.log_timestamps || cli.log_file.is_some();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
