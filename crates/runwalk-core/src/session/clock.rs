use chrono::{DateTime, Utc};

/// Whole seconds between `start` and `now`.
///
/// The core never reads a clock itself; `now` comes from whatever event
/// triggered evaluation. A `now` earlier than `start` means the clocks
/// disagree and is clamped to zero.
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let secs = (now - start).num_seconds();
    if secs < 0 {
        tracing::warn!(%start, %now, "sample timestamp precedes session start, clamping elapsed time");
        return 0;
    }
    secs as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap()
    }

    #[test]
    fn floors_partial_seconds() {
        let now = t0() + Duration::milliseconds(61_999);
        assert_eq!(elapsed_seconds(t0(), now), 61);
    }

    #[test]
    fn same_instant_is_zero() {
        assert_eq!(elapsed_seconds(t0(), t0()), 0);
    }

    #[test]
    fn clock_skew_clamps_to_zero() {
        let now = t0() - Duration::seconds(5);
        assert_eq!(elapsed_seconds(t0(), now), 0);
    }
}
