//! Value formatting shared by the module members.

use crate::config::UptimeConfig;

const IEC_UNITS: [&str; 9] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];
const SI_UNITS: [&str; 9] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// An amount of bytes scaled to a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ByteAmount {
    /// Scaled value.
    pub value: f64,
    /// Unit name (`GiB`, `MB`...).
    pub unit: &'static str,
}

impl std::fmt::Display for ByteAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit)
    }
}

/// Scale `bytes` to the largest unit that keeps the value at or above 1.
#[allow(clippy::cast_precision_loss)]
pub fn auto_divide_bytes(bytes: u64, si: bool) -> ByteAmount {
    let (units, base) = if si { (&SI_UNITS, 1000.0) } else { (&IEC_UNITS, 1024.0) };
    let mut value = bytes as f64;
    let mut index = 0;
    while index + 1 < units.len() && value >= base {
        value /= base;
        index += 1;
    }
    ByteAmount {
        value,
        unit: units[index],
    }
}

/// Scale `bytes` to a named unit. Units with an `i` (`GiB`) are powers of
/// 1024, the rest powers of 1000. `None` for an unknown unit.
#[allow(clippy::cast_precision_loss)]
pub fn divide_bytes(bytes: u64, unit: &str) -> Option<f64> {
    let (position, base) = if let Some(pos) = IEC_UNITS.iter().position(|u| *u == unit) {
        (pos, 1024.0_f64)
    } else {
        (SI_UNITS.iter().position(|u| *u == unit)?, 1000.0_f64)
    };
    let exponent = i32::try_from(position).ok()?;
    Some(bytes as f64 / base.powi(exponent))
}

/// Split seconds of uptime into `(days, hours, mins, secs)`, each member
/// within its natural range.
pub const fn split_uptime(total_secs: u64) -> (u64, u64, u64, u64) {
    (
        total_secs / 86_400,
        (total_secs / 3_600) % 24,
        (total_secs / 60) % 60,
        total_secs % 60,
    )
}

/// `1 days, 2 hours, 5 mins`. Zero parts are left out; seconds only show
/// when every larger part is zero.
pub fn format_uptime(total_secs: u64, suffixes: &UptimeConfig) -> String {
    let (days, hours, mins, secs) = split_uptime(total_secs);
    let parts: Vec<String> = [
        (days, &suffixes.days),
        (hours, &suffixes.hours),
        (mins, &suffixes.mins),
    ]
    .into_iter()
    .filter(|(amount, _)| *amount > 0)
    .map(|(amount, suffix)| format!("{amount}{suffix}"))
    .collect();

    if parts.is_empty() {
        format!("{secs}{}", suffixes.secs)
    } else {
        parts.join(", ")
    }
}

/// Index into the percentage colors: low, medium, high.
pub fn percentage_color_index(percent: f64, inverted: bool) -> usize {
    let index = if percent <= 45.0 {
        0
    } else if percent <= 80.0 {
        1
    } else {
        2
    };
    if inverted {
        2 - index
    } else {
        index
    }
}

/// `part / total` as a percentage, 0 when `total` is 0.
#[allow(clippy::cast_precision_loss)]
pub fn percentage_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_divide_iec() {
        assert_eq!(auto_divide_bytes(512, false).to_string(), "512.00 B");
        assert_eq!(auto_divide_bytes(1536, false).to_string(), "1.50 KiB");
        assert_eq!(
            auto_divide_bytes(8 * 1024 * 1024 * 1024, false).to_string(),
            "8.00 GiB"
        );
    }

    #[test]
    fn test_auto_divide_si() {
        assert_eq!(auto_divide_bytes(1_500_000, true).to_string(), "1.50 MB");
        assert_eq!(auto_divide_bytes(999, true).unit, "B");
    }

    #[test]
    fn test_auto_divide_caps_at_largest_unit() {
        assert_eq!(auto_divide_bytes(u64::MAX, true).unit, "EB");
        assert_eq!(auto_divide_bytes(u64::MAX, false).unit, "EiB");
    }

    #[test]
    fn test_divide_bytes_named_unit() {
        assert_eq!(divide_bytes(2 * 1024 * 1024, "MiB"), Some(2.0));
        assert_eq!(divide_bytes(3_000_000, "MB"), Some(3.0));
        assert_eq!(divide_bytes(42, "B"), Some(42.0));
        assert_eq!(divide_bytes(42, "parsecs"), None);
    }

    #[test]
    fn test_split_uptime() {
        let secs = 2 * 86_400 + 3 * 3_600 + 4 * 60 + 5;
        assert_eq!(split_uptime(secs), (2, 3, 4, 5));
    }

    #[test]
    fn test_format_uptime() {
        let suffixes = UptimeConfig::default();
        assert_eq!(format_uptime(42, &suffixes), "42 secs");
        assert_eq!(format_uptime(3_600 + 120 + 7, &suffixes), "1 hours, 2 mins");
        assert_eq!(format_uptime(86_400, &suffixes), "1 days");
    }

    #[test]
    fn test_percentage_color_index() {
        assert_eq!(percentage_color_index(45.0, false), 0);
        assert_eq!(percentage_color_index(80.0, false), 1);
        assert_eq!(percentage_color_index(80.01, false), 2);
        assert_eq!(percentage_color_index(45.0, true), 2);
    }

    #[test]
    fn test_percentage_of_zero_total() {
        assert!((percentage_of(5, 0)).abs() < f64::EPSILON);
        assert!((percentage_of(1, 4) - 25.0).abs() < f64::EPSILON);
    }
}
