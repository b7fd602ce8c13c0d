//! Duration formatting for step timings.

use std::time::Duration;

/// Format a duration the way step timings are shown (`850ms`, `12.4s`, `2.1m`).
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}
