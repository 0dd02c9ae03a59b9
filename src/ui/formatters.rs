use colored::*;
use humansize::{format_size, BINARY};

use crate::core::types::DeviceRecord;

/// Format a byte count in binary units (KiB, MiB, GiB)
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

/// Color a temperature reading by how hot it runs
pub fn format_temperature(celsius: f64) -> ColoredString {
    let text = format!("{:.1}°C", celsius);
    if celsius > 85.0 {
        text.red()
    } else if celsius > 70.0 {
        text.yellow()
    } else {
        text.green()
    }
}

pub fn format_percent(rate: f64) -> ColoredString {
    let text = format!("{:.1}%", rate);
    if rate >= 95.0 {
        text.red()
    } else if rate >= 80.0 {
        text.yellow()
    } else {
        text.normal()
    }
}

fn print_section_header(title: &str) {
    println!("\n{}", title.bold().bright_cyan());
    println!("{}", "-".repeat(60));
}

/// Print gathered devices as readable text
pub fn print_devices(records: &[DeviceRecord]) {
    print_section_header("GCU DEVICES");

    if records.is_empty() {
        println!("  No GCU detected");
        return;
    }

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            println!();
        }

        println!(
            "  [{}] {} ({} {})",
            record.index,
            record.name.bold(),
            record.vendor,
            record.device_type
        );
        println!("  UUID: {}", record.uuid.dimmed());
        println!(
            "  Memory: {} / {}",
            format_bytes(record.memory.used),
            format_bytes(record.memory.total)
        );
        println!("  Utilization: {}", format_percent(record.core.utilization_rate));
        println!("  Temperature: {}", format_temperature(record.temperature));
    }
}
