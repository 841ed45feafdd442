//! Explicit care periods and calendar-aware date arithmetic.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

/// A fixed care interval.
///
/// Month-based periods follow the calendar, clamping to the last day of
/// shorter months (Jan 31 + 1 month = Feb 28/29).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "count", rename_all = "lowercase")]
pub enum CarePeriod {
    Days(u32),
    Weeks(u32),
    Months(u32),
}

impl CarePeriod {
    /// The timestamp one period after `from`, saturating at the representable maximum.
    pub fn after(self, from: DateTime<Utc>) -> DateTime<Utc> {
        let next = match self {
            CarePeriod::Days(n) => from.checked_add_signed(Duration::days(i64::from(n))),
            CarePeriod::Weeks(n) => from.checked_add_signed(Duration::weeks(i64::from(n))),
            CarePeriod::Months(n) => from.checked_add_months(Months::new(n)),
        };
        next.unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// This period repeated `k` times.
    pub fn times(self, k: u32) -> Self {
        match self {
            CarePeriod::Days(n) => CarePeriod::Days(n.saturating_mul(k)),
            CarePeriod::Weeks(n) => CarePeriod::Weeks(n.saturating_mul(k)),
            CarePeriod::Months(n) => CarePeriod::Months(n.saturating_mul(k)),
        }
    }
}

impl std::fmt::Display for CarePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CarePeriod::Days(1) => write!(f, "every day"),
            CarePeriod::Weeks(1) => write!(f, "every week"),
            CarePeriod::Months(1) => write!(f, "every month"),
            CarePeriod::Days(n) => write!(f, "every {} days", n),
            CarePeriod::Weeks(n) => write!(f, "every {} weeks", n),
            CarePeriod::Months(n) => write!(f, "every {} months", n),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_days_and_weeks() {
        assert_eq!(CarePeriod::Days(3).after(at(2024, 2, 27)), at(2024, 3, 1));
        assert_eq!(CarePeriod::Weeks(1).after(at(2024, 3, 1)), at(2024, 3, 8));
    }

    #[test]
    fn test_months_clamp_to_month_end() {
        assert_eq!(CarePeriod::Months(1).after(at(2024, 1, 31)), at(2024, 2, 29));
        assert_eq!(CarePeriod::Months(3).after(at(2024, 11, 30)), at(2025, 2, 28));
    }

    #[test]
    fn test_times_scales_count() {
        assert_eq!(CarePeriod::Weeks(2).times(3), CarePeriod::Weeks(6));
        assert_eq!(CarePeriod::Months(1).times(2).after(at(2024, 1, 31)), at(2024, 3, 31));
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        let far = DateTime::<Utc>::MAX_UTC;
        assert_eq!(CarePeriod::Days(1).after(far), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&CarePeriod::Days(3)).unwrap();
        assert_eq!(json, r#"{"unit":"days","count":3}"#);
        let back: CarePeriod = serde_json::from_str(r#"{"unit":"months","count":6}"#).unwrap();
        assert_eq!(back, CarePeriod::Months(6));
    }

    #[test]
    fn test_display() {
        assert_eq!(CarePeriod::Days(1).to_string(), "every day");
        assert_eq!(CarePeriod::Weeks(2).to_string(), "every 2 weeks");
    }
}
