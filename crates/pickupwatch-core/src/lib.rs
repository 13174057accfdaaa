pub mod app_config;
pub mod config;
pub mod detector;
pub mod error;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use detector::TransitionDetector;
pub use error::ConfigError;
pub use types::{AvailabilitySnapshot, AvailabilityState, StoreStatus, TransitionEvent};
