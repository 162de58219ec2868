//! Human-readable byte counts for reports.

/// Formats `bytes` with binary units: `512 B`, `1.5 KiB`, `3.0 GiB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    let unit = b"KMGTPE"[exp] as char;
    format!("{:.1} {unit}iB", bytes as f64 / div as f64)
}
