use super::types::{DeviceRecord, GpuVendor};
use crate::error::Result;

/// Common capability of vendor-specific device detectors
///
/// The inventory service holds a list of detectors, asks each whether its tooling
/// is present, and gathers from the ones that are. A failed gather is the caller's
/// to log and skip for the current cycle.
pub trait GpuDetector {
    /// Vendor whose devices this detector reports
    fn vendor(&self) -> GpuVendor;

    /// Check whether the vendor tooling is reachable
    fn is_available(&self) -> bool;

    /// Collect one complete record per device, or fail as a whole
    fn gather(&self) -> Result<Vec<DeviceRecord>>;
}
