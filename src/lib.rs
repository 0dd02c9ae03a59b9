// gcu-probe Library - Public API

// Re-export error types
pub mod error;
pub use error::{DetectorError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::DetectorConfig;
pub use crate::core::detector::GpuDetector;
pub use crate::core::types::DeviceRecord;
pub use crate::platform::gpu::EfsmiDetector;

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
