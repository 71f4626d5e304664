//! Timestamps for the `T` directive
//!
//! The wire carries whole seconds since the epoch plus a microsecond field,
//! so every time is rounded to the nearest microsecond before it is split.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{Result, ScpError};

const NANOS_PER_MICRO: i128 = 1_000;
const MICROS_PER_SEC: i128 = 1_000_000;

/// A point in time as the protocol transmits it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileTime {
    /// Seconds since the Unix epoch (negative before it)
    pub seconds: i64,

    /// Always in `0..1_000_000`
    pub micros: u32,
}

impl FileTime {
    /// The Unix epoch
    pub const EPOCH: FileTime = FileTime { seconds: 0, micros: 0 };

    /// Build from already-split parts
    pub fn new(seconds: i64, micros: u32) -> Result<Self> {
        if i128::from(micros) >= MICROS_PER_SEC {
            return Err(ScpError::Logic(format!(
                "microseconds out of range: {} (max 999999)",
                micros
            )));
        }
        Ok(Self { seconds, micros })
    }

    /// Build from nanoseconds since the epoch, rounding half up to the
    /// nearest microsecond
    pub fn from_unix_nanos(nanos: i128) -> Self {
        let total_micros = (nanos + NANOS_PER_MICRO / 2).div_euclid(NANOS_PER_MICRO);
        let seconds = total_micros.div_euclid(MICROS_PER_SEC);
        let micros = total_micros.rem_euclid(MICROS_PER_SEC);

        Self {
            seconds: seconds.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
            micros: micros as u32,
        }
    }

    /// Build from seconds plus a sub-second nanosecond remainder
    pub fn from_parts_nanos(seconds: i64, nanos: u32) -> Self {
        Self::from_unix_nanos(i128::from(seconds) * 1_000_000_000 + i128::from(nanos))
    }

    /// Build from a `SystemTime`, which may lie before the epoch
    pub fn from_system_time(time: SystemTime) -> Self {
        let nanos = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_nanos() as i128,
            Err(before) => -(before.duration().as_nanos() as i128),
        };
        Self::from_unix_nanos(nanos)
    }

    /// Convert back to a `SystemTime`
    ///
    /// `None` when the platform clock cannot represent the time.
    pub fn to_system_time(self) -> Option<SystemTime> {
        let seconds = Duration::from_secs(self.seconds.unsigned_abs());
        let whole = if self.seconds >= 0 {
            UNIX_EPOCH.checked_add(seconds)?
        } else {
            UNIX_EPOCH.checked_sub(seconds)?
        };
        whole.checked_add(Duration::from_micros(u64::from(self.micros)))
    }
}

impl From<SystemTime> for FileTime {
    fn from(time: SystemTime) -> Self {
        Self::from_system_time(time)
    }
}
