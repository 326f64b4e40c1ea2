mod settings;
mod timing;

pub use settings::{CartConfig, GLOBAL_CONFIG_FILE, PROJECT_CONFIG_FILE};
pub use timing::Timing;
