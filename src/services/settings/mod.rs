//! Loading calculator settings from disk.

mod service;

pub use service::SettingsService;
