// Core detection logic module

pub mod config;
pub mod detector;
pub mod grammar;
pub mod parser;
pub mod runner;
pub mod types;

// Re-export commonly used items
pub use config::DetectorConfig;
pub use detector::GpuDetector;
pub use grammar::{Field, FieldValue, Grammar, GrammarOverrides};
pub use parser::{parse_section, CategoryMap, DeviceFields};
pub use runner::{CommandOutput, CommandRunner, Executor, RunOutcome, SystemExecutor};
pub use types::{Category, CoreInfo, DeviceRecord, DeviceType, GpuVendor, MemoryInfo};
