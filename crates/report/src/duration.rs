use std::time::Duration;

/// Format a duration as `HH:MM:SS`, the fixed width the trailing summary
/// records use. Sub-second spans collapse to `00:00:00`.
pub fn format_duration(d: Duration) -> String {
    let total = d.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
