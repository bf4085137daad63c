pub mod data;
pub mod defaults;
pub mod io;

pub use data::{AuthMode, ChatConfig, Config, RelayConfig, Route};
pub use io::ConfigError;
