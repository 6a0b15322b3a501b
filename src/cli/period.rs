//! Period CLI command
//!
//! Prints the period window containing a date, or the window keyed by a
//! month, under the configured (or overridden) month convention.

use chrono::NaiveDate;

use super::balance::BalanceSelection;
use super::CliContext;
use crate::display::format_period;
use crate::error::BalanceResult;
use crate::models::{parse_date, MonthKey, Period};
use crate::services::PeriodResolver;

/// Resolve the first period named by `target` (a date or a `YYYY-MM` key)
pub fn resolve_target(resolver: &PeriodResolver, target: &str) -> BalanceResult<Period> {
    match MonthKey::parse(target) {
        Ok(key) => resolver.period_for_month(key),
        Err(_) => resolver.period_for(parse_date(target)?),
    }
}

/// Handle the `period` command, printing `count` consecutive periods
pub fn handle_period_command(
    ctx: &CliContext,
    target: &str,
    count: usize,
    selection: &BalanceSelection,
) -> BalanceResult<()> {
    let resolver = selection.resolver(ctx)?;
    let first = resolve_target(&resolver, target)?;

    for period in resolver.periods(first.start, NaiveDate::MAX).take(count.max(1)) {
        let period = period?;
        let key = resolver.month_key_for(period.start);
        println!("{}", format_period(&key, &period, resolver.mode()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_date_target() {
        let resolver = PeriodResolver::financial(15).unwrap();
        let period = resolve_target(&resolver, "2024-01-05").unwrap();
        assert_eq!(period.start, date(2023, 12, 15));
    }

    #[test]
    fn test_resolve_month_target() {
        let resolver = PeriodResolver::financial(15).unwrap();
        let period = resolve_target(&resolver, "2024-01").unwrap();
        assert_eq!(period.start, date(2024, 1, 15));
        assert_eq!(period.end, date(2024, 2, 14));
    }

    #[test]
    fn test_resolve_bad_target() {
        let resolver = PeriodResolver::calendar();
        assert!(resolve_target(&resolver, "next tuesday").unwrap_err().is_invalid_argument());
        assert!(resolve_target(&resolver, "2024-13").is_err());
    }
}
