// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Countdown display formatting
//!
//! The compact form shows the coarsest non-zero unit only; a wall of
//! per-second "doomsday timers" is distracting, so seconds appear only
//! below one minute or in the precise form.

/// Compact display: `"0s"`, `"45s"`, `"2m"`, `"1h 02m"`.
///
/// Hour-plus values always zero-pad the minutes.
pub fn format_time(seconds: u32) -> String {
    let (h, m, s) = seconds_to_hms(seconds);
    if h > 0 {
        format!("{}h {:02}m", h, m)
    } else if m > 0 {
        format!("{}m", m)
    } else {
        format!("{}s", s)
    }
}

/// Precise `h:mm:ss` display, used when the "show seconds" preference
/// is set
pub fn format_time_precise(seconds: u32) -> String {
    let (h, m, s) = seconds_to_hms(seconds);
    format!("{}:{:02}:{:02}", h, m, s)
}

/// Total seconds from an hour/minute/second split
pub fn time_to_seconds(hours: u32, minutes: u32, seconds: u32) -> u32 {
    hours * 3600 + minutes * 60 + seconds
}

/// Hour/minute/second split of a total second count
pub fn seconds_to_hms(seconds: u32) -> (u32, u32, u32) {
    (seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}

#[cfg(test)]
#[path = "timefmt_tests.rs"]
mod tests;
