//! CLI library components for the application updater.

#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;
