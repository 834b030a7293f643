/// Formats seconds as `Hh Mm Ss`, dropping leading fields that are zero.
///
/// `0` → `0s`, `65` → `1m 5s`, `3661` → `1h 1m 1s`.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
