use crate::audit::domain::CacheRecord;
use crate::shared::Result;
use chrono::{Duration, NaiveDateTime};

/// Default maximum age of a cached clean result
pub const DEFAULT_STALENESS_HOURS: u64 = 24;

/// Upper bound accepted for the window (one year)
const MAX_STALENESS_HOURS: u64 = 24 * 365;

/// StalenessPolicy - Decides whether a cached scan result can be trusted
///
/// A record is fresh when it was CHECKED less than `window` before `now`.
/// The current time is always passed in so the decision is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    window: Duration,
}

impl StalenessPolicy {
    /// # Errors
    /// Returns an error for a zero window or one longer than a year
    pub fn from_hours(hours: u64) -> Result<Self> {
        if hours == 0 || hours > MAX_STALENESS_HOURS {
            anyhow::bail!(
                "Staleness window must be between 1 and {} hours, got {}",
                MAX_STALENESS_HOURS,
                hours
            );
        }
        Ok(Self {
            window: Duration::hours(hours as i64),
        })
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_fresh(&self, record: &CacheRecord, now: NaiveDateTime) -> bool {
        record.is_fresh(now, self.window)
    }
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self {
            window: Duration::hours(DEFAULT_STALENESS_HOURS as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::domain::{CacheKey, Dependency, FetchProtocol, InternalIdentity};

    fn record() -> CacheRecord {
        let dep = Dependency::new("github.com/acme/foo", "v1.0.0");
        let identity = InternalIdentity::from_dependency(&dep, FetchProtocol::Ssh).unwrap();
        CacheRecord::new(CacheKey::new(&identity, "v1.0.0").unwrap())
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_default_window_is_one_day() {
        assert_eq!(StalenessPolicy::default().window(), Duration::hours(24));
    }

    #[test]
    fn test_custom_window() {
        let policy = StalenessPolicy::from_hours(1).unwrap();
        let mut record = record();
        record.mark_checked(at("2025-01-01 00:00:00"), vec![]);

        assert!(policy.is_fresh(&record, at("2025-01-01 00:59:59")));
        assert!(!policy.is_fresh(&record, at("2025-01-01 01:00:00")));
    }

    #[test]
    fn test_never_checked_record_is_stale() {
        let policy = StalenessPolicy::default();
        assert!(!policy.is_fresh(&record(), at("2025-01-01 00:00:00")));
    }

    #[test]
    fn test_rejects_out_of_range_window() {
        assert!(StalenessPolicy::from_hours(0).is_err());
        assert!(StalenessPolicy::from_hours(24 * 365 + 1).is_err());
        assert!(StalenessPolicy::from_hours(24 * 365).is_ok());
    }
}
