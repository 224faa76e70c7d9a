/// Relay for upload progress percentages.
///
/// Transport layers report raw byte-derived percentages; the tracker turns
/// them into the sequence observers actually see. Two rules:
/// - values are non-decreasing within one task;
/// - 100 is reserved for confirmed success. Raw progress hits 100 as soon as
///   the body is fully streamed, before the server has answered, so in-flight
///   values are capped at 99 and [`complete`](ProgressTracker::complete) emits
///   the final 100.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last: u8,
}

const IN_FLIGHT_CAP: u8 = 99;

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw percent. Returns the value to publish, or `None` if it
    /// would not advance the sequence.
    pub fn update(&mut self, percent: u8) -> Option<u8> {
        let capped = percent.min(IN_FLIGHT_CAP);
        if capped > self.last {
            self.last = capped;
            Some(capped)
        } else {
            None
        }
    }

    /// Mark the task confirmed successful. Always returns 100.
    pub fn complete(&mut self) -> u8 {
        self.last = 100;
        100
    }

    /// Last published value.
    pub fn last(&self) -> u8 {
        self.last
    }
}

/// Percent of `sent` over `total`, rounded to the nearest integer.
pub fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((sent as f64 * 100.0 / total as f64).round() as u64).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(ProgressTracker::new().last(), 0);
    }

    #[test]
    fn test_monotonic() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(tracker.update(10), Some(10));
        assert_eq!(tracker.update(5), None);
        assert_eq!(tracker.update(10), None);
        assert_eq!(tracker.update(60), Some(60));
        assert_eq!(tracker.last(), 60);
    }

    #[test]
    fn test_caps_in_flight_at_99() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(tracker.update(100), Some(99));
        assert_eq!(tracker.update(100), None);
    }

    #[test]
    fn test_complete_emits_100() {
        let mut tracker = ProgressTracker::new();
        tracker.update(100);
        assert_eq!(tracker.complete(), 100);
        assert_eq!(tracker.last(), 100);
    }

    #[test]
    fn test_percent_rounds() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(3, 3), 100);
    }

    #[test]
    fn test_percent_zero_total() {
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn test_percent_overshoot_clamped() {
        // sent can exceed total if a transport counts framing bytes
        assert_eq!(percent(120, 100), 100);
    }
}
