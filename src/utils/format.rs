//! Formatting utilities for sizes, labels and user-facing alerts.

const SIZE_UNITS: [&str; 6] = ["bytes", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// Describe a byte count (e.g., "empty", "120 bytes", "1.5 KiB").
pub fn bytes_to_size(bytes: u64) -> String {
    if bytes == 0 {
        return "empty".to_string();
    }
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} {}", SIZE_UNITS[0])
    } else {
        format!("{scaled:.1} {}", SIZE_UNITS[unit])
    }
}

/// Truncate `text` to `limit` characters, marking the cut with "..".
pub fn elide(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}..", &text[..cut]),
        None => text.to_string(),
    }
}

/// Alert text for a failed request with HTTP `status` (0 if none arrived).
pub fn error_alert_message(purpose: &str, status: u16) -> String {
    let msg = match status {
        401 => "Unauthorized.",
        403 => "Incorrect username or password.",
        404 => "Incorrect ShareID or RoomKey.",
        _ => "Temporary server failure. Please try again later.",
    };
    format!("{purpose}: {msg} ({status})")
}

/// Alert text for a failure described in words rather than by status.
pub fn error_detail_message(purpose: &str, detail: &str) -> String {
    format!("{purpose}: {detail}")
}
