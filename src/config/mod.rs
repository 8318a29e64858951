//! Configuration management for the AUR client
//!
//! This module handles loading and merging settings from the config file,
//! the environment and the command line.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{Settings, SettingsOverrides};
