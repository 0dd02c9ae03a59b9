use anyhow::Result;
use colored::Colorize;

use crate::core::config::DetectorConfig;
use crate::core::detector::GpuDetector;
use crate::platform::gpu::EfsmiDetector;

/// Report whether the diagnostic tool can be found. Returns `false` when it cannot.
pub fn execute(config: &DetectorConfig) -> Result<bool> {
    let detector = EfsmiDetector::new(config.clone())?;

    if detector.is_available() {
        println!(
            "{} {} is available",
            "✓".green().bold(),
            config.executable.bold()
        );
        Ok(true)
    } else {
        println!(
            "{} {} was not found on PATH",
            "✗".red().bold(),
            config.executable.bold()
        );
        Ok(false)
    }
}
