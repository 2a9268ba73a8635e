//! Human-readable duration rendering.

use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Render a duration in the compact form used in reports, e.g. `10.5s`,
/// `1m0s`, `2h3m4.25s`, `1.5ms`, `750ns`.
///
/// Sub-second values use the largest unit that keeps the integer part
/// non-zero. From one second upwards the value is split into hours,
/// minutes and seconds; minutes are always printed once hours are.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{nanos}ns");
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}µs", decimal(nanos, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", decimal(nanos, 6));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let secs = u128::from(total_secs % 60) * NANOS_PER_SEC + u128::from(duration.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&decimal(secs, 9));
    out.push('s');
    out
}

/// Format `value / 10^scale` with trailing fractional zeros trimmed.
fn decimal(value: u128, scale: u32) -> String {
    let unit = 10u128.pow(scale);
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }

    let digits = format!("{:0width$}", frac, width = scale as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
