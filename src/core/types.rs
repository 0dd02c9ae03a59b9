use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four metric categories queried from the diagnostic tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Device,
    Memory,
    Temperature,
    Usage,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Device => write!(f, "device"),
            Category::Memory => write!(f, "memory"),
            Category::Temperature => write!(f, "temperature"),
            Category::Usage => write!(f, "usage"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GpuVendor {
    Enflame,
}

impl fmt::Display for GpuVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuVendor::Enflame => write!(f, "Enflame"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "GPU")]
    Gpu,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Gpu => write!(f, "GPU"),
        }
    }
}

/// Compute core metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreInfo {
    pub utilization_rate: f64,
}

/// Device memory metrics, sizes in bytes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub is_unified_memory: bool,
    pub total: u64,
    pub used: u64,
    pub utilization_rate: f64,
}

/// One fully populated accelerator record, as consumed by the inventory service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub index: u32,
    pub device_index: u32,
    pub device_chip_index: u32,
    pub uuid: String,
    pub name: String,
    pub vendor: GpuVendor,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub core: CoreInfo,
    pub memory: MemoryInfo,
    pub temperature: f64,
}
