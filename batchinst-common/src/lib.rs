pub mod config;
pub mod error;
pub mod install_log;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use install_log::InstallLog;
