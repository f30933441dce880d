//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use app_updater::{
    LatestRelease, Launcher, Platform, ReleaseFeed, Result, UpdateError, UpdateNotifier,
    UpdaterConfig, Version,
};

pub const DOWNLOAD_PAGE: &str = "https://studio.test/download";

/// Configuration for product "studio" released from `acme/studio`.
pub fn config(data_dir: &Path, current: &str, platform: Platform) -> UpdaterConfig {
    UpdaterConfig::github(
        "studio",
        "acme",
        "studio",
        Version::parse(current).unwrap(),
        data_dir,
    )
    .with_platform(platform)
    .with_download_page(DOWNLOAD_PAGE)
}

/// In-memory release feed recording every request.
pub struct FakeFeed {
    latest: Option<String>,
    payload: Vec<u8>,
    fail_download: AtomicBool,
    fetches: AtomicUsize,
    downloads: Mutex<Vec<String>>,
}

impl FakeFeed {
    /// Feed reporting `tag` as the latest release.
    pub fn with_tag(tag: &str) -> Self {
        Self {
            latest: Some(tag.to_string()),
            payload: b"MZ fake installer payload".to_vec(),
            fail_download: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
            downloads: Mutex::new(Vec::new()),
        }
    }

    /// Feed whose metadata request always fails.
    pub fn offline() -> Self {
        Self {
            latest: None,
            ..Self::with_tag("v0.0.0")
        }
    }

    /// Makes downloads write half the payload and then fail.
    pub fn set_fail_download(&self, fail: bool) {
        self.fail_download.store(fail, Ordering::SeqCst);
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn download_urls(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

impl ReleaseFeed for FakeFeed {
    async fn latest_release(&self) -> Result<LatestRelease> {
        tokio::task::yield_now().await;
        self.fetches.fetch_add(1, Ordering::SeqCst);

        match &self.latest {
            Some(tag) => Ok(LatestRelease {
                tag_name: tag.clone(),
                name: None,
                html_url: None,
                prerelease: false,
            }),
            None => Err(UpdateError::Network("dns error: no such host".to_string())),
        }
    }

    async fn download_to(&self, url: &str, dest: &Path) -> Result<u64> {
        self.downloads.lock().unwrap().push(url.to_string());

        if self.fail_download.load(Ordering::SeqCst) {
            tokio::fs::write(dest, &self.payload[..self.payload.len() / 2]).await?;
            return Err(UpdateError::Network("connection reset by peer".to_string()));
        }

        tokio::fs::write(dest, &self.payload).await?;
        Ok(self.payload.len() as u64)
    }
}

/// Launcher that records calls instead of touching the system.
#[derive(Default)]
pub struct RecordingLauncher {
    fail_spawn: AtomicBool,
    spawned: Mutex<Vec<(PathBuf, Vec<String>)>>,
    opened: Mutex<Vec<String>>,
    terminations: AtomicUsize,
}

impl RecordingLauncher {
    pub fn failing_spawn() -> Self {
        let launcher = Self::default();
        launcher.fail_spawn.store(true, Ordering::SeqCst);
        launcher
    }

    pub fn spawned(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn terminations(&self) -> usize {
        self.terminations.load(Ordering::SeqCst)
    }

    /// True when nothing was spawned, opened or terminated.
    pub fn untouched(&self) -> bool {
        self.spawned().is_empty() && self.opened().is_empty() && self.terminations() == 0
    }
}

impl Launcher for RecordingLauncher {
    fn spawn_detached(&self, program: &Path, args: &[&str]) -> Result<()> {
        if self.fail_spawn.load(Ordering::SeqCst) {
            return Err(UpdateError::Spawn {
                path: program.display().to_string(),
                reason: "access is denied".to_string(),
            });
        }
        self.spawned.lock().unwrap().push((
            program.to_path_buf(),
            args.iter().map(ToString::to_string).collect(),
        ));
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

/// Notifier counting signals.
#[derive(Default)]
pub struct CountingNotifier(AtomicUsize);

impl CountingNotifier {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl UpdateNotifier for CountingNotifier {
    fn update_available(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}
