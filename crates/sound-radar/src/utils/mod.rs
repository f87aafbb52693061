mod config;
mod logging;

pub use config::{Config, DisplayConfig};
pub use logging::init_logging;
