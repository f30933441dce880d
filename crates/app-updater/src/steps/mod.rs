//! Individual steps of the update process.
//!
//! `check` asks the feed and stages the installer, `download` streams it to
//! disk, `apply` hands control to the installer or the download page.

pub mod apply;
pub mod check;
pub mod download;
