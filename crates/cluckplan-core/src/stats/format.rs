/// `"1h 5m"` or `"5m"`.
pub fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// `"MM:SS"`, minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(59), "0m");
        assert_eq!(format_duration(3900), "1h 5m");
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(65), "01:05");
    }
}
