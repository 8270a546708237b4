//! Console presentation: the banner, the device report, and the scan echo.
//!
//! These are operator-facing lines printed to stdout, separate from the
//! `tracing` diagnostics on stderr.  Line builders return `String`s so they
//! can be tested without capturing stdout.

use piscan_core::DeviceInfo;

use crate::infrastructure::storage::config::ScanConfig;

/// Terminal width used when stdout is not a terminal.
pub const FALLBACK_COLUMNS: u16 = 80;

/// `<name> started.` followed by one `  <Key>: <value>` line per setting.
pub fn banner_lines(config: &ScanConfig) -> Vec<String> {
    let mut lines = vec![format!("{} started.", config.name), String::new()];
    lines.push("Running with:".to_string());
    lines.extend(
        config
            .entries()
            .into_iter()
            .map(|(key, value)| format!("  {key}: {value}")),
    );
    lines.push(String::new());
    lines
}

/// One `Found ...` line per device, then the `initialized` line.
pub fn device_report_lines(devices: &[DeviceInfo]) -> Vec<String> {
    let mut lines: Vec<String> = devices
        .iter()
        .map(|d| {
            format!(
                "Found {} ({}), grabbing for exclusive use...",
                d.name,
                d.address()
            )
        })
        .collect();
    let noun = if devices.len() > 1 { "Scanners" } else { "Scanner" };
    lines.push(format!("{noun} initialized. Listening...."));
    lines
}

/// A horizontal rule of `=` `columns` wide.
pub fn rule(columns: u16) -> String {
    "=".repeat(usize::from(columns))
}

/// Current terminal width, or [`FALLBACK_COLUMNS`].
pub fn terminal_columns() -> u16 {
    crossterm::terminal::size()
        .map(|(cols, _)| cols)
        .ok()
        .filter(|&cols| cols > 0)
        .unwrap_or(FALLBACK_COLUMNS)
}

/// The line echoed for each scan by the default handler.
pub fn scanned_line(scan: &str) -> String {
    format!("Scanned --> {scan:?}")
}

pub fn print_banner(config: &ScanConfig) {
    for line in banner_lines(config) {
        println!("{line}");
    }
}

pub fn print_device_report(devices: &[DeviceInfo]) {
    for line in device_report_lines(devices) {
        println!("{line}");
    }
    println!("{}", rule(terminal_columns()));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner(name: &str) -> DeviceInfo {
        DeviceInfo {
            name: name.to_string(),
            vendor_id: 0x05E0,
            product_id: 0x1200,
        }
    }

    #[test]
    fn test_banner_starts_with_name_and_lists_settings() {
        // Arrange
        let config = ScanConfig {
            name: "Dock 3".to_string(),
            ..ScanConfig::default()
        };

        // Act
        let lines = banner_lines(&config);

        // Assert
        assert_eq!(lines[0], "Dock 3 started.");
        assert!(lines.contains(&"Running with:".to_string()));
        assert!(lines.contains(&"  Name: Dock 3".to_string()));
        assert!(lines.contains(&"  Separators: enter, tab".to_string()));
    }

    #[test]
    fn test_device_report_single_scanner() {
        let lines = device_report_lines(&[scanner("Symbol Bar Code Scanner")]);
        assert_eq!(
            lines,
            vec![
                "Found Symbol Bar Code Scanner (5e0:1200), grabbing for exclusive use...".to_string(),
                "Scanner initialized. Listening....".to_string(),
            ]
        );
    }

    #[test]
    fn test_device_report_pluralises_for_several_scanners() {
        let lines = device_report_lines(&[scanner("a"), scanner("b")]);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "Scanners initialized. Listening....");
    }

    #[test]
    fn test_rule_is_requested_width() {
        assert_eq!(rule(5), "=====");
        assert_eq!(rule(FALLBACK_COLUMNS).len(), 80);
    }

    #[test]
    fn test_terminal_columns_is_never_zero() {
        assert!(terminal_columns() > 0);
    }

    #[test]
    fn test_scanned_line_quotes_scan() {
        assert_eq!(scanned_line("4006381333931"), "Scanned --> \"4006381333931\"");
    }
}
