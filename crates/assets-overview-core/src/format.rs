//! Human-readable renderings used for group headers and report titles.

const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count with 1024-based units, e.g. `human_file_size(2048, 0) == "2 KB"`.
pub fn human_file_size(bytes: u64, decimals: usize) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut factor = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && factor < SIZE_UNITS.len() - 1 {
        scaled /= 1024;
        factor += 1;
    }
    let value = bytes as f64 / 1024f64.powi(factor as i32);
    format!("{:.*} {}", decimals, value, SIZE_UNITS[factor])
}

/// Thousands-separated integer, e.g. `12,345`.
pub fn number_format(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_file_size() {
        assert_eq!(human_file_size(0, 0), "0 B");
        assert_eq!(human_file_size(1023, 2), "1023 B");
        assert_eq!(human_file_size(2048, 0), "2 KB");
        assert_eq!(human_file_size(1536, 1), "1.5 KB");
        assert_eq!(human_file_size(5 * 1024 * 1024, 0), "5 MB");
    }

    #[test]
    fn test_number_format() {
        assert_eq!(number_format(0), "0");
        assert_eq!(number_format(999), "999");
        assert_eq!(number_format(1000), "1,000");
        assert_eq!(number_format(1234567), "1,234,567");
    }
}
