use chrono::Utc;

use crate::error::Error;

pub const SECS_PER_HOUR: i64 = 3600;

/// A requested retention period, validated against the range the drop
/// form offers (one hour to one week).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ttl(u32);

impl Ttl {
    pub const MIN_HOURS: u32 = 1;
    pub const MAX_HOURS: u32 = 168;

    pub fn from_hours(hours: u32) -> Result<Self, Error> {
        if (Self::MIN_HOURS..=Self::MAX_HOURS).contains(&hours) {
            Ok(Self(hours))
        } else {
            Err(Error::InvalidTtl(hours))
        }
    }

    #[must_use]
    pub const fn hours(self) -> u32 {
        self.0
    }

    /// Absolute expiry for an entry created at `created_at` epoch seconds.
    #[must_use]
    pub const fn expires_at(self, created_at: i64) -> i64 {
        created_at + self.0 as i64 * SECS_PER_HOUR
    }
}

/// Current wall-clock time as epoch seconds. Every expiry decision is a
/// comparison against this; nothing is scheduled.
#[must_use]
pub fn now_ts() -> i64 {
    Utc::now().timestamp()
}

/// Remaining lifetime in hours, rounded to one decimal, floored at zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn remaining_hours(expires_at: i64, now: i64) -> f64 {
    let remaining = (expires_at - now).max(0) as f64;
    (remaining / SECS_PER_HOUR as f64 * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::{remaining_hours, Ttl};
    use crate::error::Error;

    #[test]
    fn ttl_bounds() {
        assert!(matches!(Ttl::from_hours(0), Err(Error::InvalidTtl(0))));
        assert!(Ttl::from_hours(1).is_ok());
        assert!(Ttl::from_hours(168).is_ok());
        assert!(matches!(Ttl::from_hours(169), Err(Error::InvalidTtl(169))));
    }

    #[test]
    fn expiry_is_created_plus_ttl() {
        let ttl = Ttl::from_hours(24).unwrap();
        assert_eq!(ttl.expires_at(1000), 1000 + 24 * 3600);
    }

    #[test]
    fn remaining_rounds_to_one_decimal() {
        assert_eq!(remaining_hours(1800, 0), 0.5);
        assert_eq!(remaining_hours(3600, 0), 1.0);
        // 540s is 0.15h; rounds half away from zero
        assert_eq!(remaining_hours(540, 0), 0.2);
    }

    #[test]
    fn remaining_floors_at_zero() {
        assert_eq!(remaining_hours(100, 100), 0.0);
        assert_eq!(remaining_hours(100, 5000), 0.0);
    }
}
