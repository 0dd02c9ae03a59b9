// Platform-specific code module

pub mod gpu;

// Re-exports para imports limpios
pub use gpu::{available_detectors, EfsmiDetector};
