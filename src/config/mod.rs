mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ApiConfig, Config, DownloadsConfig, ImageConfig, ServerConfig, StorageConfig};
