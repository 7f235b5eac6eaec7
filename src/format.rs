// src/format.rs
//
// Pure display formatters shared by the view composer and the CLI.

const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Scale a byte count through B/KB/MB/GB. Two decimal places when the scaled
/// value is below 10 outside the base unit, otherwise one.
pub fn format_bytes(value: u64) -> String {
    let mut current = value as f64;
    let mut unit_index = 0;
    while current >= 1024.0 && unit_index < BYTE_UNITS.len() - 1 {
        current /= 1024.0;
        unit_index += 1;
    }
    let precision = if current < 10.0 && unit_index > 0 { 2 } else { 1 };
    format!("{current:.precision$} {}", BYTE_UNITS[unit_index])
}

/// Hex-render an address; a missing address renders as "-".
pub fn format_addr(value: Option<u64>) -> String {
    match value {
        Some(addr) => format!("0x{addr:x}"),
        None => "-".to_string(),
    }
}

/// Milliseconds verbatim below one second, otherwise seconds to 2 dp.
pub fn format_duration_ms(value: i64) -> String {
    if value < 1000 {
        return format!("{value} ms");
    }
    format!("{:.2} s", value as f64 / 1000.0)
}

fn abbreviate(value: f64, suffix: char) -> String {
    let mut text = format!("{value:.1}");
    if let Some(stripped) = text.strip_suffix(".0") {
        text = stripped.to_string();
    }
    format!("{text}{suffix}")
}

/// Abbreviate a count with k/m/b suffixes, one decimal place with a trailing
/// `.0` stripped. Threshold checks are on the absolute value, so large
/// negative counts abbreviate too.
pub fn format_count(value: i64) -> String {
    let abs = value.unsigned_abs();
    if abs >= 1_000_000_000 {
        return abbreviate(value as f64 / 1_000_000_000.0, 'b');
    }
    if abs >= 1_000_000 {
        return abbreviate(value as f64 / 1_000_000.0, 'm');
    }
    if abs >= 1000 {
        return abbreviate(value as f64 / 1000.0, 'k');
    }
    value.to_string()
}
