use log::debug;

use crate::core::config::DetectorConfig;
use crate::core::detector::GpuDetector;
use crate::core::grammar::Grammar;
use crate::core::parser::{parse_section, CategoryMap, DeviceFields};
use crate::core::runner::{CommandRunner, Executor, RunOutcome, SystemExecutor};
use crate::core::types::{Category, CoreInfo, DeviceRecord, DeviceType, GpuVendor, MemoryInfo};
use crate::error::{DetectorError, Result};

/// Enflame GCU detector driven by the `efsmi` command line tool
///
/// Each gather runs four category queries in sequence and joins them by device id.
/// Any query failure, or any device missing from one of the queries, fails the
/// whole gather: records are either complete or not produced at all.
pub struct EfsmiDetector<E = SystemExecutor> {
    config: DetectorConfig,
    grammar: Grammar,
    runner: CommandRunner<E>,
}

impl EfsmiDetector<SystemExecutor> {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        Self::with_executor(config, SystemExecutor)
    }
}

impl<E: Executor> EfsmiDetector<E> {
    pub fn with_executor(config: DetectorConfig, executor: E) -> Result<Self> {
        let grammar = config.build_grammar()?;
        let runner = CommandRunner::with_executor(config.executable.clone(), executor);
        Ok(Self {
            config,
            grammar,
            runner,
        })
    }

    /// Run and parse a single category query
    pub fn query(&self, category: Category) -> Result<CategoryMap> {
        let args = self.config.args_for(category);
        match self.runner.run(&args, &self.grammar)? {
            RunOutcome::NoDevices => {
                debug!("No devices in the {} query", category);
                Ok(CategoryMap::new())
            }
            RunOutcome::Output(text) => {
                parse_section(&text, &self.grammar).map_err(|e| e.in_category(category))
            }
        }
    }
}

impl<E: Executor> GpuDetector for EfsmiDetector<E> {
    fn vendor(&self) -> GpuVendor {
        GpuVendor::Enflame
    }

    fn is_available(&self) -> bool {
        self.runner.is_available()
    }

    fn gather(&self) -> Result<Vec<DeviceRecord>> {
        let device = self.query(Category::Device)?;
        let memory = self.query(Category::Memory)?;
        let temperature = self.query(Category::Temperature)?;
        let usage = self.query(Category::Usage)?;

        debug!(
            "DEVICE: {:?}\nMEMORY: {:?}\nTEMP: {:?}\nUSAGE: {:?}",
            device, memory, temperature, usage
        );

        assemble(&device, &memory, &temperature, &usage)
    }
}

/// Join the four category maps into records, in device-query order
pub fn assemble(
    device: &CategoryMap,
    memory: &CategoryMap,
    temperature: &CategoryMap,
    usage: &CategoryMap,
) -> Result<Vec<DeviceRecord>> {
    device
        .iter()
        .map(|identity| {
            let id = identity.id;
            let mem = lookup(memory, id, Category::Memory)?;
            let temp = lookup(temperature, id, Category::Temperature)?;
            let util = lookup(usage, id, Category::Usage)?;

            let utilization_rate = require(util.utilization, id, Category::Usage, "GCU_Usage")?;

            Ok(DeviceRecord {
                index: id,
                device_index: id,
                device_chip_index: id,
                uuid: require(identity.uuid.clone(), id, Category::Device, "Dev_UUID")?,
                name: require(identity.name.clone(), id, Category::Device, "Dev_Name")?,
                vendor: GpuVendor::Enflame,
                device_type: DeviceType::Gpu,
                core: CoreInfo { utilization_rate },
                memory: MemoryInfo {
                    is_unified_memory: false,
                    total: require(mem.memory_total, id, Category::Memory, "Total_Size")?,
                    used: require(mem.memory_used, id, Category::Memory, "Used_Size")?,
                    utilization_rate,
                },
                temperature: require(temp.temperature, id, Category::Temperature, "GCU_Temp")?,
            })
        })
        .collect()
}

fn lookup(map: &CategoryMap, device_id: u32, category: Category) -> Result<&DeviceFields> {
    map.get(device_id)
        .ok_or(DetectorError::Consistency {
            device_id,
            category,
        })
}

fn require<T>(value: Option<T>, device_id: u32, category: Category, field: &'static str) -> Result<T> {
    value.ok_or(DetectorError::MissingField {
        device_id,
        category,
        field,
    })
}
