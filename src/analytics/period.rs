use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::records::BudgetPeriod;

/// Caller-selected reporting window, distinct from a budget's native period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingPeriod {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl ReportingPeriod {
    /// Parses a period token. Unrecognized values fall back to `month`;
    /// that is deliberate default policy, not an error.
    pub fn parse(token: &str) -> Self {
        match token {
            "week" => ReportingPeriod::Week,
            "quarter" => ReportingPeriod::Quarter,
            "year" => ReportingPeriod::Year,
            _ => ReportingPeriod::Month,
        }
    }

    /// Fixed-day lookback window. Not calendar-aware: "month" is always 30
    /// days, matching the behavior the figures were defined against.
    pub fn lookback_days(self) -> i64 {
        match self {
            ReportingPeriod::Week => 7,
            ReportingPeriod::Month => 30,
            ReportingPeriod::Quarter => 90,
            ReportingPeriod::Year => 365,
        }
    }

    /// Start of the lookback window measured back from `now`.
    pub fn window_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.lookback_days())
    }
}

/// Multiplier rescaling a budget's `limit_amount` from its native period to
/// the requested reporting period. Fixed approximations (4 weeks/month,
/// 13 weeks/quarter); exact calendar arithmetic is out of scope.
pub fn limit_multiplier(native: BudgetPeriod, reporting: ReportingPeriod) -> f64 {
    use BudgetPeriod::*;
    use ReportingPeriod::*;

    match (native, reporting) {
        (Weekly, Week) => 1.0,
        (Weekly, Month) => 4.0,
        (Weekly, Quarter) => 13.0,
        (Weekly, Year) => 52.0,
        (Monthly, Week) => 1.0 / 4.0,
        (Monthly, Month) => 1.0,
        (Monthly, Quarter) => 3.0,
        (Monthly, Year) => 12.0,
        (Quarterly, Week) => 1.0 / 13.0,
        (Quarterly, Month) => 1.0 / 3.0,
        (Quarterly, Quarter) => 1.0,
        (Quarterly, Year) => 4.0,
    }
}

/// Palette cycled through (by budget iteration index) when coloring
/// spending-breakdown slices.
pub const SLICE_PALETTE: [&str; 8] = [
    "#3B82F6", "#F59E0B", "#EF4444", "#10B981", "#8B5CF6", "#EC4899", "#06B6D4", "#84CC16",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tokens_fall_back_to_month() {
        assert_eq!(ReportingPeriod::parse("fortnight"), ReportingPeriod::Month);
        assert_eq!(ReportingPeriod::parse(""), ReportingPeriod::Month);
        assert_eq!(ReportingPeriod::parse("week"), ReportingPeriod::Week);
        assert_eq!(ReportingPeriod::parse("year"), ReportingPeriod::Year);
    }

    #[test]
    fn same_period_multiplier_is_identity() {
        assert_eq!(limit_multiplier(BudgetPeriod::Weekly, ReportingPeriod::Week), 1.0);
        assert_eq!(limit_multiplier(BudgetPeriod::Monthly, ReportingPeriod::Month), 1.0);
        assert_eq!(
            limit_multiplier(BudgetPeriod::Quarterly, ReportingPeriod::Quarter),
            1.0
        );
    }

    #[test]
    fn rescaling_follows_the_fixed_table() {
        assert_eq!(limit_multiplier(BudgetPeriod::Weekly, ReportingPeriod::Month), 4.0);
        assert_eq!(limit_multiplier(BudgetPeriod::Weekly, ReportingPeriod::Year), 52.0);
        assert_eq!(limit_multiplier(BudgetPeriod::Monthly, ReportingPeriod::Year), 12.0);
        assert_eq!(
            limit_multiplier(BudgetPeriod::Quarterly, ReportingPeriod::Week),
            1.0 / 13.0
        );
    }

    #[test]
    fn lookback_windows_use_fixed_day_counts() {
        assert_eq!(ReportingPeriod::Week.lookback_days(), 7);
        assert_eq!(ReportingPeriod::Month.lookback_days(), 30);
        assert_eq!(ReportingPeriod::Quarter.lookback_days(), 90);
        assert_eq!(ReportingPeriod::Year.lookback_days(), 365);
    }
}
