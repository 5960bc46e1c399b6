use crate::kernel::ConfigError;
use alloc::vec::Vec;
use num_traits::Float;

const NANOSECONDS_PER_SECOND: i64 = 1_000_000_000;

/// Integer epoch of one record: seconds plus nanoseconds since the GPS
/// reference, kept as integers so segment start times never drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch {
    /// Whole seconds.
    pub gps_seconds: i64,
    /// Nanosecond remainder in `[0, 1e9)`.
    pub gps_nanoseconds: i32,
}

impl Epoch {
    /// Build an epoch from seconds and a nanosecond remainder, normalizing
    /// the remainder into `[0, 1e9)`.
    pub fn new(gps_seconds: i64, gps_nanoseconds: i64) -> Self {
        let seconds = gps_seconds + gps_nanoseconds.div_euclid(NANOSECONDS_PER_SECOND);
        let nanos = gps_nanoseconds.rem_euclid(NANOSECONDS_PER_SECOND);
        Self {
            gps_seconds: seconds,
            gps_nanoseconds: nanos as i32,
        }
    }

    /// Add a floating-point interval, rounded to whole nanoseconds.
    ///
    /// The interval is rounded once per addition rather than scaled by an
    /// index, so repeatedly stepping an epoch forward stays ns-exact over
    /// arbitrarily long stretches.
    pub fn add_seconds(self, interval: f64) -> Self {
        let delta_ns = Float::round(interval * 1e9) as i64;
        Self::new(
            self.gps_seconds,
            self.gps_nanoseconds as i64 + delta_ns,
        )
    }

    /// The epoch as a floating-point second count. Lossy for large epochs;
    /// intended for diagnostics, not arithmetic.
    pub fn as_seconds_f64(self) -> f64 {
        self.gps_seconds as f64 + self.gps_nanoseconds as f64 * 1e-9
    }
}

/// Ordered collection of record epochs.
pub type TimestampVector = Vec<Epoch>;

/// Synthesize the timestamps covering `duration` seconds from `start` in
/// steps of `step` seconds: `ceil(duration / step)` epochs, the first at
/// `start`, each subsequent one a ns-rounded `step` later.
///
/// ```
/// use sft_rs::series::{make_timestamps, Epoch};
///
/// let start = Epoch::new(800_000_000, 0);
/// let ts = make_timestamps(start, 4500.0, 1800.0).unwrap();
/// assert_eq!(ts.len(), 3);
/// assert_eq!(ts[0], start);
/// assert_eq!(ts[1], Epoch::new(800_001_800, 0));
/// ```
pub fn make_timestamps(
    start: Epoch,
    duration: f64,
    step: f64,
) -> Result<TimestampVector, ConfigError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(ConfigError::InvalidArgument {
            arg: "step",
            reason: "step must be finite and > 0",
        });
    }
    if !duration.is_finite() || duration < 0.0 {
        return Err(ConfigError::InvalidArgument {
            arg: "duration",
            reason: "duration must be finite and >= 0",
        });
    }

    let count = Float::ceil(duration / step) as usize;
    let mut timestamps = Vec::with_capacity(count);
    let mut tt = start;
    for _ in 0..count {
        timestamps.push(tt);
        tt = tt.add_seconds(step);
    }
    Ok(timestamps)
}

#[cfg(test)]
mod tests {
    use super::{make_timestamps, Epoch};
    use crate::kernel::ConfigError;

    #[test]
    fn epoch_normalizes_nanosecond_overflow() {
        let e = Epoch::new(100, 2_500_000_000);
        assert_eq!(e.gps_seconds, 102);
        assert_eq!(e.gps_nanoseconds, 500_000_000);

        let e = Epoch::new(100, -1);
        assert_eq!(e.gps_seconds, 99);
        assert_eq!(e.gps_nanoseconds, 999_999_999);
    }

    #[test]
    fn add_seconds_rounds_to_whole_nanoseconds() {
        let e = Epoch::new(0, 0).add_seconds(1800.5);
        assert_eq!(e, Epoch::new(1800, 500_000_000));

        // 0.1 s is not representable exactly; the step must still land on a
        // whole nanosecond every time.
        let mut tt = Epoch::new(0, 0);
        for _ in 0..10 {
            tt = tt.add_seconds(0.1);
        }
        assert_eq!(tt, Epoch::new(1, 0));
    }

    #[test]
    fn make_timestamps_covers_partial_final_step() {
        // 4500 / 1800 = 2.5 segments, so three timestamps are needed.
        let ts = make_timestamps(Epoch::new(0, 0), 4500.0, 1800.0).expect("timestamps");
        assert_eq!(ts.len(), 3);
        assert_eq!(ts[2], Epoch::new(3600, 0));
    }

    #[test]
    fn make_timestamps_zero_duration_is_degenerate_not_an_error() {
        let ts = make_timestamps(Epoch::new(0, 0), 0.0, 1800.0).expect("timestamps");
        assert!(ts.is_empty());
    }

    #[test]
    fn make_timestamps_rejects_bad_step() {
        let err = make_timestamps(Epoch::new(0, 0), 100.0, 0.0).expect_err("zero step");
        assert!(matches!(err, ConfigError::InvalidArgument { arg: "step", .. }));
    }
}
