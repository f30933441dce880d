//! Integration tests for the CLI command layer.

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use app_updater::{
    ApplyOutcome, CheckOutcome, LatestRelease, Launcher, Platform, ReleaseFeed, Result,
    UpdateError, UpdateService, UpdateSettings, UpdaterConfig, Version,
};
use app_updater_cli::cli::{CheckArgs, WatchArgs};
use app_updater_cli::commands::{describe_apply, describe_check, run_check, watch_interval};

const DOWNLOAD_PAGE: &str = "https://studio.test/download";

/// Feed reporting a fixed tag, or failing when none is set.
struct StaticFeed(Option<&'static str>);

impl ReleaseFeed for StaticFeed {
    async fn latest_release(&self) -> Result<LatestRelease> {
        match self.0 {
            Some(tag) => Ok(LatestRelease {
                tag_name: tag.to_string(),
                name: None,
                html_url: None,
                prerelease: false,
            }),
            None => Err(UpdateError::Network("connection refused".to_string())),
        }
    }

    async fn download_to(&self, _url: &str, dest: &Path) -> Result<u64> {
        tokio::fs::write(dest, b"MZ").await?;
        Ok(2)
    }
}

#[derive(Default)]
struct RecordingLauncher {
    opened: Mutex<Vec<String>>,
    spawned: AtomicUsize,
    terminations: AtomicUsize,
}

impl Launcher for RecordingLauncher {
    fn spawn_detached(&self, _program: &Path, _args: &[&str]) -> Result<()> {
        self.spawned.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn terminate(&self) {
        self.terminations.fetch_add(1, Ordering::SeqCst);
    }
}

fn service(
    dir: &Path,
    platform: Platform,
    feed: StaticFeed,
) -> UpdateService<StaticFeed, RecordingLauncher> {
    let config = UpdaterConfig::github(
        "studio",
        "acme",
        "studio",
        Version::new(1, 0, 0),
        dir,
    )
    .with_platform(platform)
    .with_download_page(DOWNLOAD_PAGE);
    UpdateService::new(config, feed, RecordingLauncher::default())
}

#[tokio::test]
async fn test_check_with_apply_opens_download_page() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path(), Platform::Linux, StaticFeed(Some("v1.1.0")));

    let ok = run_check(&service, &CheckArgs { apply: true }).await.unwrap();

    assert!(ok);
    assert_eq!(
        *service.applier().launcher().opened.lock().unwrap(),
        vec![DOWNLOAD_PAGE.to_string()]
    );
}

#[tokio::test]
async fn test_check_without_apply_leaves_launcher_alone() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path(), Platform::Windows, StaticFeed(Some("v1.1.0")));

    let ok = run_check(&service, &CheckArgs { apply: false }).await.unwrap();

    assert!(ok);
    assert_eq!(service.pending_version(), Some(Version::new(1, 1, 0)));
    let launcher = service.applier().launcher();
    assert_eq!(launcher.spawned.load(Ordering::SeqCst), 0);
    assert_eq!(launcher.terminations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_check_with_apply_launches_installer() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path(), Platform::Windows, StaticFeed(Some("v1.1.0")));

    let ok = run_check(&service, &CheckArgs { apply: true }).await.unwrap();

    assert!(ok);
    let launcher = service.applier().launcher();
    assert_eq!(launcher.spawned.load(Ordering::SeqCst), 1);
    assert_eq!(launcher.terminations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_check_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path(), Platform::Linux, StaticFeed(None));

    let ok = run_check(&service, &CheckArgs { apply: true }).await.unwrap();

    assert!(!ok);
    assert!(service.applier().launcher().opened.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_up_to_date_check_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(dir.path(), Platform::Linux, StaticFeed(Some("v1.0.0")));

    assert!(run_check(&service, &CheckArgs { apply: true }).await.unwrap());
    assert!(service.applier().launcher().opened.lock().unwrap().is_empty());
}

#[test]
fn test_describe_check() {
    let v = Version::new(1, 1, 0);
    assert_eq!(
        describe_check(&CheckOutcome::UpToDate {
            current: v.clone(),
            latest: v.clone()
        }),
        "Up to date (running 1.1.0, latest 1.1.0)"
    );
    assert_eq!(
        describe_check(&CheckOutcome::Downloaded(v.clone())),
        "Version 1.1.0 downloaded and ready to install"
    );
    assert_eq!(
        describe_check(&CheckOutcome::ManualUpdateAvailable(v)),
        "Version 1.1.0 is available from the download page"
    );
    assert_eq!(
        describe_check(&CheckOutcome::Failed {
            reason: "offline".to_string()
        }),
        "Update check failed: offline"
    );
}

#[test]
fn test_describe_apply() {
    assert_eq!(
        describe_apply(&ApplyOutcome::NothingToApply),
        "No update to apply"
    );
    assert_eq!(
        describe_apply(&ApplyOutcome::DownloadPageOpened {
            version: Version::new(2, 0, 0)
        }),
        "Opened the download page for 2.0.0"
    );
}

#[test]
fn test_watch_interval() {
    let settings = UpdateSettings {
        check_interval_hours: 6,
        ..UpdateSettings::default()
    };
    let args = |interval_hours| WatchArgs {
        interval_hours,
        apply_on_ready: false,
    };

    assert_eq!(
        watch_interval(&settings, &args(None)),
        Duration::from_secs(6 * 3600)
    );
    assert_eq!(
        watch_interval(&settings, &args(Some(2))),
        Duration::from_secs(2 * 3600)
    );
    assert_eq!(
        watch_interval(&settings, &args(Some(0))),
        Duration::from_secs(3600)
    );
    assert_eq!(
        watch_interval(&settings, &args(Some(u64::MAX))),
        Duration::from_secs(u64::MAX)
    );
}
