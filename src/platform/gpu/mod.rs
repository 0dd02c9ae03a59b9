//! GPU-specific platform code.
//!
//! Vendor detectors backed by command line diagnostic tools.
//! Currently supports Enflame GCUs (via efsmi).

mod efsmi;

pub use efsmi::{assemble, EfsmiDetector};

use log::debug;

use crate::core::config::DetectorConfig;
use crate::core::detector::GpuDetector;
use crate::error::Result;

/// Build every detector whose vendor tooling is present on this machine
pub fn available_detectors(config: &DetectorConfig) -> Result<Vec<Box<dyn GpuDetector>>> {
    let mut detectors: Vec<Box<dyn GpuDetector>> = Vec::new();

    let efsmi = EfsmiDetector::new(config.clone())?;
    if efsmi.is_available() {
        detectors.push(Box::new(efsmi));
    } else {
        debug!("Skipping Enflame detector: {} not found", config.executable);
    }

    Ok(detectors)
}
