//! Configuration
//!
//! Settings come from a `ConfigProvider`:
//! - `MemoryConfigProvider`: in-memory, for tests
//! - `FileConfigProvider`: YAML file (user, workspace or explicit path)

mod file;
mod memory;
mod settings;
mod traits;

pub use file::{ConfigLevel, FileConfigProvider};
pub use memory::MemoryConfigProvider;
pub use settings::{ModelSettings, Settings, DEFAULT_MODEL};
pub use traits::{ConfigError, ConfigProvider, ConfigResult};
