use time::macros::format_description;
use time::OffsetDateTime;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable byte count, two decimals in the largest fitting 1024-based unit.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// `MM/DD/YYYY`, the date shown next to each entry.
pub fn format_date(at: OffsetDateTime) -> String {
    at.format(format_description!("[month]/[day]/[year]"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn sizes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(2048 * 1024 * 1024 * 1024 * 1024), "2048.00 TB");
    }

    #[test]
    fn dates() {
        assert_eq!(format_date(datetime!(2024-03-07 23:59:00 UTC)), "03/07/2024");
    }
}
