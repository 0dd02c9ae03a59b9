// Drives the real process runner against a stand-in efsmi shell script
#![cfg(unix)]

use gcu_probe::core::config::DetectorConfig;
use gcu_probe::core::detector::GpuDetector;
use gcu_probe::platform::available_detectors;
use gcu_probe::{DetectorError, EfsmiDetector};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("efsmi");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn config_for(path: &Path) -> DetectorConfig {
    DetectorConfig {
        executable: path.to_string_lossy().into_owned(),
        ..Default::default()
    }
}

const FAKE_EFSMI: &str = r#"
case "$3" in
  DEVICE) printf 'DEV ID 0\n  Dev Name : GCU0\n  Dev UUID : abc\n' ;;
  MEMORY) printf 'DEV ID 0\n  Total Size : 32768 MiB\n  Used Size : 1024 MiB\n' ;;
  TEMP)   printf 'DEV ID 0\n  GCU Temp : 45 C\n' ;;
  USAGE)  printf 'DEV ID 0\n  GCU Usage : 12 %%\n' ;;
  *) echo "unknown selector $3" >&2; exit 2 ;;
esac
"#;

#[test]
fn test_gather_through_real_process() {
    let temp_dir = TempDir::new().unwrap();
    let script = write_script(temp_dir.path(), FAKE_EFSMI);
    let detector = EfsmiDetector::new(config_for(&script)).unwrap();

    assert!(detector.is_available());
    let records = detector.gather().unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.index, 0);
    assert_eq!(record.name, "GCU0");
    assert_eq!(record.uuid, "abc");
    assert_eq!(record.memory.total, 34_359_738_368);
    assert_eq!(record.memory.used, 1_073_741_824);
    assert_eq!(record.memory.utilization_rate, 12.0);
    assert_eq!(record.core.utilization_rate, 12.0);
    assert_eq!(record.temperature, 45.0);
    assert!(!record.memory.is_unified_memory);
}

#[test]
fn test_nonzero_exit_reports_streams() {
    let temp_dir = TempDir::new().unwrap();
    let script = write_script(
        temp_dir.path(),
        "echo 'DEV ID 0'\necho 'driver mismatch' >&2\nexit 3",
    );
    let detector = EfsmiDetector::new(config_for(&script)).unwrap();

    let err = detector.gather().unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, DetectorError::Execution { exit_code: Some(3), .. }));
    assert!(msg.contains("exit code: 3"));
    assert!(msg.contains("DEV ID 0"));
    assert!(msg.contains("driver mismatch"));
}

#[test]
fn test_no_devices_everywhere() {
    let temp_dir = TempDir::new().unwrap();
    let script = write_script(temp_dir.path(), "echo 'Error: no devices detected'\nexit 1");
    let detector = EfsmiDetector::new(config_for(&script)).unwrap();

    assert!(detector.gather().unwrap().is_empty());
}

#[test]
fn test_missing_binary_is_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir.path().join("efsmi"));

    let detector = EfsmiDetector::new(config.clone()).unwrap();
    assert!(!detector.is_available());
    assert!(matches!(
        detector.gather(),
        Err(DetectorError::Execution { exit_code: None, .. })
    ));
    assert!(available_detectors(&config).unwrap().is_empty());
}

#[test]
fn test_available_detectors_finds_script() {
    let temp_dir = TempDir::new().unwrap();
    let script = write_script(temp_dir.path(), FAKE_EFSMI);

    let detectors = available_detectors(&config_for(&script)).unwrap();
    assert_eq!(detectors.len(), 1);
    assert_eq!(detectors[0].gather().unwrap().len(), 1);
}
