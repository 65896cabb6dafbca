//! Client configuration loaded from `seedpack.toml`.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_config_toml, parse_config_toml_str, to_toml};
pub use paths::{CONFIG_FILE_NAME, config_path, default_config_dir, default_state_dir};
pub use schema::ClientConfig;
pub use store::ConfigStore;
