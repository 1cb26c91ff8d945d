pub mod app;
pub mod config;
pub mod display;
pub mod input;
pub mod logging;
pub mod state;

pub use config::{CalculatorConfig, ConfigError};
pub use display::DisplayOptions;
pub use input::sanitize_income;
pub use state::CalculatorState;
