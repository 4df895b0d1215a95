use chrono::{DateTime, Local, Utc};

/// Human-readable age of a timestamp, e.g. "2 hours and 5 minutes ago".
/// Future timestamps (clock skew) clamp to "just now".
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let total_mins = (now - then).num_minutes().max(0);
    let hours = total_mins / 60;
    let mins = total_mins % 60;

    if hours > 0 && mins > 0 {
        format!("{} and {} ago", plural(hours, "hour"), plural(mins, "minute"))
    } else if hours > 0 {
        format!("{} ago", plural(hours, "hour"))
    } else if mins > 0 {
        format!("{} ago", plural(mins, "minute"))
    } else {
        "just now".to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Footer line for the last-updated timestamp, local time with a relative
/// suffix: "Last updated: Monday, August 25, 2026, 3:05 PM (5 minutes ago)".
pub fn last_updated_line(then: DateTime<Utc>) -> String {
    let local = then.with_timezone(&Local);
    let date_str = local.format("%A, %B %-d, %Y, %-I:%M %p");
    format!("Last updated: {} ({})", date_str, relative_age(then, Utc::now()))
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
