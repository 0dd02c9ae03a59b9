use gcu_probe::core::config::DetectorConfig;
use gcu_probe::core::detector::GpuDetector;
use gcu_probe::core::runner::{CommandOutput, Executor};
use gcu_probe::core::types::{Category, GpuVendor};
use gcu_probe::{DetectorError, EfsmiDetector};
use std::io;

/// Answers each category query from fixed text, keyed by the last argument
struct FakeEfsmi {
    device: CommandOutput,
    memory: CommandOutput,
    temp: CommandOutput,
    usage: CommandOutput,
}

fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        success: true,
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

impl Executor for FakeEfsmi {
    fn execute(&self, _program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        match args {
            ["-q", "-d", "DEVICE"] => Ok(self.device.clone()),
            ["-q", "-d", "MEMORY"] => Ok(self.memory.clone()),
            ["-q", "-d", "TEMP"] => Ok(self.temp.clone()),
            ["-q", "-d", "USAGE"] => Ok(self.usage.clone()),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unexpected args {:?}", other),
            )),
        }
    }
}

const TWO_DEVICES: &str = "\
--------------- Enflame System Management Interface ---------------
DEV ID 0
    Dev Name            : T20
    Dev UUID            : 0b2c-0000
    PCIe Bus            : 0000:3b:00.0
DEV ID 1
    Dev Name            : T20
    Dev UUID            : 0b2c-0001
    PCIe Bus            : 0000:86:00.0
";

const TWO_MEMORY: &str = "\
DEV ID 0
    Total Size          : 32768 MiB
    Used Size           : 0 MiB
DEV ID 1
    Total Size          : 32768 MiB
    Used Size           : 16384 MiB
";

const TWO_TEMP: &str = "DEV ID 0\n    GCU Temp : 38 C\nDEV ID 1\n    GCU Temp : 61 C\n";
const TWO_USAGE: &str = "DEV ID 0\n    GCU Usage : 0.0 %\nDEV ID 1\n    GCU Usage : 97.5 %\n";

fn two_device_fake() -> FakeEfsmi {
    FakeEfsmi {
        device: ok(TWO_DEVICES),
        memory: ok(TWO_MEMORY),
        temp: ok(TWO_TEMP),
        usage: ok(TWO_USAGE),
    }
}

#[test]
fn test_gather_two_devices() {
    let detector = EfsmiDetector::with_executor(DetectorConfig::default(), two_device_fake()).unwrap();

    let records = detector.gather().unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].uuid, "0b2c-0000");
    assert_eq!(records[1].index, 1);
    assert_eq!(records[1].memory.used, 16384 * 1024 * 1024);
    assert_eq!(records[1].memory.utilization_rate, 97.5);
    assert_eq!(records[1].temperature, 61.0);
    assert!(records.iter().all(|r| r.vendor == GpuVendor::Enflame));
    assert!(records.iter().all(|r| !r.memory.is_unified_memory));
}

#[test]
fn test_gather_json_shape() {
    let detector = EfsmiDetector::with_executor(DetectorConfig::default(), two_device_fake()).unwrap();
    let records = detector.gather().unwrap();

    let json = serde_json::to_value(&records).unwrap();
    assert_eq!(json[0]["deviceIndex"], 0);
    assert_eq!(json[0]["type"], "GPU");
    assert_eq!(json[1]["memory"]["total"], 34_359_738_368u64);
    assert_eq!(json[1]["core"]["utilizationRate"], 97.5);
}

#[test]
fn test_failed_usage_query_aborts_gather() {
    let mut fake = two_device_fake();
    fake.usage = CommandOutput {
        success: false,
        exit_code: Some(255),
        stdout: "DEV ID 0\n".to_string(),
        stderr: "ioctl failed".to_string(),
    };
    let detector = EfsmiDetector::with_executor(DetectorConfig::default(), fake).unwrap();

    let err = detector.gather().unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, DetectorError::Execution { exit_code: Some(255), .. }));
    assert!(msg.contains("efsmi -q -d USAGE"));
    assert!(msg.contains("ioctl failed"));
}

#[test]
fn test_device_missing_from_one_category() {
    let mut fake = two_device_fake();
    fake.temp = ok("DEV ID 0\n    GCU Temp : 38 C\n");
    let detector = EfsmiDetector::with_executor(DetectorConfig::default(), fake).unwrap();

    match detector.gather() {
        Err(DetectorError::Consistency {
            device_id,
            category,
        }) => {
            assert_eq!(device_id, 1);
            assert_eq!(category, Category::Temperature);
        }
        other => panic!("expected consistency failure, got {:?}", other),
    }
}

#[test]
fn test_extra_devices_in_other_categories_are_ignored() {
    let mut fake = two_device_fake();
    fake.device = ok("DEV ID 1\n    Dev Name : T20\n    Dev UUID : only-one\n");
    let detector = EfsmiDetector::with_executor(DetectorConfig::default(), fake).unwrap();

    let records = detector.gather().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].uuid, "only-one");
}

#[test]
fn test_query_single_category() {
    let detector = EfsmiDetector::with_executor(DetectorConfig::default(), two_device_fake()).unwrap();

    let memory = detector.query(Category::Memory).unwrap();
    assert_eq!(memory.len(), 2);
    assert_eq!(memory.get(0).unwrap().memory_total, Some(34_359_738_368));
}

#[test]
fn test_empty_output_aborts_gather() {
    let mut fake = two_device_fake();
    fake.device = ok("");
    let detector = EfsmiDetector::with_executor(DetectorConfig::default(), fake).unwrap();

    assert!(matches!(
        detector.gather(),
        Err(DetectorError::Execution { .. })
    ));
}
