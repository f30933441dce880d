//! Command bodies for the updater CLI.

use std::time::Duration;

use anyhow::{Context, Result};
use app_updater::{
    ApplyOutcome, ChannelNotifier, CheckOutcome, Launcher, ReleaseFeed, UpdateAvailable,
    UpdateService, UpdateSettings, UpdaterConfig, run_periodic,
};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::cli::{CheckArgs, WatchArgs};

/// Runs one check. Returns `false` when the check failed.
pub async fn run_check<F, L>(service: &UpdateService<F, L>, args: &CheckArgs) -> Result<bool>
where
    F: ReleaseFeed,
    L: Launcher,
{
    let outcome = service
        .check_for_update(&|| info!("An update is ready to install"))
        .await;
    println!("{}", describe_check(&outcome));

    if args.apply && outcome.is_update_available() {
        let applied = service.apply_update().context("apply update")?;
        println!("{}", describe_apply(&applied));
    }

    Ok(!matches!(outcome, CheckOutcome::Failed { .. }))
}

/// Time between checks in `watch`. `--interval-hours` wins over the settings file.
#[must_use]
pub fn watch_interval(settings: &UpdateSettings, args: &WatchArgs) -> Duration {
    args.interval_hours
        .map_or_else(|| settings.check_interval(), UpdateSettings::interval_for_hours)
}

/// Checks periodically until Ctrl-C.
pub async fn run_watch<F, L>(
    service: &UpdateService<F, L>,
    settings: &UpdateSettings,
    args: &WatchArgs,
) -> Result<()>
where
    F: ReleaseFeed,
    L: Launcher,
{
    if !settings.enabled {
        warn!("Update checks are disabled in the settings file");
        return Ok(());
    }

    let every = watch_interval(settings, args);
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let notifier = ChannelNotifier::new(sender);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let periodic = run_periodic(service, &notifier, every, shutdown);
    tokio::pin!(periodic);

    loop {
        tokio::select! {
            () = &mut periodic => break,
            Some(UpdateAvailable) = receiver.recv() => {
                if let Some(version) = service.pending_version() {
                    println!("Version {version} is ready to install");
                }
                if args.apply_on_ready {
                    match service.apply_update() {
                        Ok(applied) => println!("{}", describe_apply(&applied)),
                        Err(e) => error!("Failed to apply update: {}", e.user_message()),
                    }
                }
            }
        }
    }

    Ok(())
}

/// Prints the resolved configuration.
pub fn run_status(config: &UpdaterConfig, settings: &UpdateSettings) {
    let installer = config.data_dir.join(format!(
        "{}.setup.<version>.{}",
        config.product, config.installer_extension
    ));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120)
        .set_header(vec!["Setting", "Value"]);

    table.add_row(vec!["Product".to_string(), config.product.clone()]);
    table.add_row(vec![
        "Current version".to_string(),
        config.current_version.to_string(),
    ]);
    table.add_row(vec!["Platform".to_string(), config.platform().to_string()]);
    table.add_row(vec![
        "Install mode".to_string(),
        format!("{:?}", config.install_mode()),
    ]);
    table.add_row(vec![
        "Release index".to_string(),
        config.release_index_url.clone(),
    ]);
    table.add_row(vec!["Assets".to_string(), config.asset_base_url.clone()]);
    table.add_row(vec![
        "Download page".to_string(),
        config.download_page_url.clone(),
    ]);
    table.add_row(vec![
        "Installer path".to_string(),
        installer.display().to_string(),
    ]);
    table.add_row(vec![
        "Automatic checks".to_string(),
        if settings.enabled {
            format!("every {} h", settings.check_interval().as_secs() / 3600)
        } else {
            "disabled".to_string()
        },
    ]);

    println!("{table}");
}

pub fn describe_check(outcome: &CheckOutcome) -> String {
    match outcome {
        CheckOutcome::UpToDate { current, latest } => {
            format!("Up to date (running {current}, latest {latest})")
        }
        CheckOutcome::Downloaded(version) => {
            format!("Version {version} downloaded and ready to install")
        }
        CheckOutcome::AlreadyDownloaded(version) => {
            format!("Version {version} is ready to install")
        }
        CheckOutcome::ManualUpdateAvailable(version) => {
            format!("Version {version} is available from the download page")
        }
        CheckOutcome::Failed { reason } => format!("Update check failed: {reason}"),
        CheckOutcome::AlreadyRunning => "An update check is already running".to_string(),
    }
}

pub fn describe_apply(outcome: &ApplyOutcome) -> String {
    match outcome {
        ApplyOutcome::NothingToApply => "No update to apply".to_string(),
        ApplyOutcome::InstallerLaunched { version, installer } => {
            format!("Launched installer for {version}: {}", installer.display())
        }
        ApplyOutcome::DownloadPageOpened { version } => {
            format!("Opened the download page for {version}")
        }
    }
}
