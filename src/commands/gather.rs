use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use crate::core::config::DetectorConfig;
use crate::core::detector::GpuDetector;
use crate::platform::gpu::EfsmiDetector;
use crate::ui::print_devices;

pub fn execute(matches: &ArgMatches, config: &DetectorConfig) -> Result<()> {
    let detector = EfsmiDetector::new(config.clone())?;

    let records = detector
        .gather()
        .with_context(|| format!("Failed to gather {} devices", detector.vendor()))?;

    info!("Gathered {} device(s)", records.len());

    if matches.get_flag("json") {
        let json = serde_json::to_string_pretty(&records).context("Failed to serialize devices")?;
        println!("{}", json);
    } else {
        print_devices(&records);
    }

    Ok(())
}
