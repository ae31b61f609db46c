//! Wall-clock timestamps for log records.

use chrono::Utc;

/// Current wall-clock time in milliseconds since the Unix epoch.
#[inline]
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_is_recent_and_monotone_enough() {
        let a = now_ms();
        let b = now_ms();
        // 2020-01-01T00:00:00Z
        assert!(a > 1_577_836_800_000);
        assert!(b >= a);
    }
}
