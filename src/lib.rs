pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{FileStore, HttpSheetSource, MemoryStore};
pub use config::toml_config::AppConfig;
pub use core::{checklist::ChecklistStore, engine::ChecklistEngine};
pub use utils::error::{ChecklistError, Result};
