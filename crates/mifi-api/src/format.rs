// Human-readable renderings of device counters
//
// Binary (1024) units throughout, matching the router's own web UI.

use std::time::Duration;

const UNIT: f64 = 1024.0;
const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// `512 B`, `1.50 KB`, `3.00 GB`.
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let (value, prefix) = scale(bytes as f64);
    format!("{value:.2} {prefix}B")
}

/// `512.00 B/s`, `2.00 MB/s`. Negative or non-finite rates render as zero.
pub fn format_rate(bytes_per_sec: f64) -> String {
    let rate = if bytes_per_sec.is_finite() && bytes_per_sec > 0.0 {
        bytes_per_sec
    } else {
        0.0
    };
    if rate < UNIT {
        return format!("{rate:.2} B/s");
    }
    let (value, prefix) = scale(rate);
    format!("{value:.2} {prefix}B/s")
}

/// `42s`, `5m 3s`, `2h 7m`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0..60 => format!("{secs}s"),
        60..3600 => format!("{}m {}s", secs / 60, secs % 60),
        _ => format!("{}h {}m", secs / 3600, (secs % 3600) / 60),
    }
}

/// Divide down to the largest prefix that keeps the value at or above 1.
/// Callers guarantee `value >= UNIT`.
fn scale(value: f64) -> (f64, char) {
    let mut scaled = value / UNIT;
    let mut idx = 0;
    while scaled >= UNIT && idx + 1 < PREFIXES.len() {
        scaled /= UNIT;
        idx += 1;
    }
    (scaled, PREFIXES[idx])
}
