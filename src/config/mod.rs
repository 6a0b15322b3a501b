//! Configuration module for Mabourse
//!
//! - XDG-compliant path resolution
//! - Settings persistence (month convention, accounts, ledger files)

pub mod paths;
pub mod settings;

pub use paths::MaboursePaths;
pub use settings::{AccountSettings, PasswordHashSettings, Settings};
