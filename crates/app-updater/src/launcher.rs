//! Process and browser handoff.
//!
//! [`Launcher`] is the seam between the applier and the operating system.
//! [`SystemLauncher`] is the real implementation; hosts can provide their own
//! to shut down gracefully instead of exiting immediately.

use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::error::{Result, UpdateError};

/// Launches installers, opens URLs and ends the running application.
pub trait Launcher: Send + Sync {
    /// Starts `program` as an independent process and releases it.
    ///
    /// The child gets no inherited stdio and is never waited on or monitored.
    /// Only the outcome of the spawn call itself is reported.
    fn spawn_detached(&self, program: &Path, args: &[&str]) -> Result<()>;

    /// Opens `url` in the user's default browser.
    fn open_url(&self, url: &str) -> Result<()>;

    /// Ends the running application so the installer can replace its files.
    fn terminate(&self);
}

impl<T: Launcher> Launcher for Arc<T> {
    fn spawn_detached(&self, program: &Path, args: &[&str]) -> Result<()> {
        (**self).spawn_detached(program, args)
    }

    fn open_url(&self, url: &str) -> Result<()> {
        (**self).open_url(url)
    }

    fn terminate(&self) {
        (**self).terminate();
    }
}

/// Launcher backed by `std::process` and the `open` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn spawn_detached(&self, program: &Path, args: &[&str]) -> Result<()> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            // DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP | CREATE_BREAKAWAY_FROM_JOB
            command.creation_flags(0x0000_0008 | 0x0000_0200 | 0x0100_0000);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command.spawn().map_err(|e| UpdateError::Spawn {
            path: program.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Spawned {} (pid {})", program.display(), child.id());
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<()> {
        open::that_detached(url).map_err(|e| UpdateError::BrowserLaunch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    fn terminate(&self) {
        tracing::info!("Exiting for installer to complete update");
        std::process::exit(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_missing_program() {
        let err = SystemLauncher
            .spawn_detached(Path::new("/nonexistent/app.setup.9.9.9.exe"), &["--updated"])
            .unwrap_err();

        match err {
            UpdateError::Spawn { path, .. } => assert!(path.ends_with("app.setup.9.9.9.exe")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
