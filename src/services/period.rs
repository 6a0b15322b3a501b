//! Period boundary resolution
//!
//! Maps dates to the period (calendar or financial month) that contains them
//! and walks consecutive periods. Financial months start on a fixed
//! day-of-month; when that day does not exist in a month (the 31st in April)
//! the boundary is clamped to the month's last day.

use chrono::{Datelike, NaiveDate};

use crate::error::{BalanceError, BalanceResult};
use crate::models::period::shift_month;
use crate::models::{days_in_month, MonthKey, MonthMode, Period};

/// Resolves period windows for one month convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodResolver {
    mode: MonthMode,
    financial_start_day: u32,
}

impl PeriodResolver {
    /// Create a resolver; `financial_start_day` must be within 1-31
    pub fn new(mode: MonthMode, financial_start_day: u32) -> BalanceResult<Self> {
        if !(1..=31).contains(&financial_start_day) {
            return Err(BalanceError::InvalidArgument(format!(
                "financial month start day must be between 1 and 31, got {}",
                financial_start_day
            )));
        }

        Ok(Self {
            mode,
            financial_start_day,
        })
    }

    /// Resolver for standard calendar months
    pub fn calendar() -> Self {
        Self {
            mode: MonthMode::Calendar,
            financial_start_day: 1,
        }
    }

    /// Resolver for financial months starting on `start_day`
    pub fn financial(start_day: u32) -> BalanceResult<Self> {
        Self::new(MonthMode::Financial, start_day)
    }

    pub fn mode(&self) -> MonthMode {
        self.mode
    }

    pub fn financial_start_day(&self) -> u32 {
        self.financial_start_day
    }

    /// Get the period containing a date
    pub fn period_for(&self, date: NaiveDate) -> BalanceResult<Period> {
        match self.mode {
            MonthMode::Calendar => self.calendar_month(date.year(), date.month()),
            MonthMode::Financial => {
                let (year, month) = (date.year(), date.month());
                let boundary = self.boundary(year, month)?;

                if date < boundary {
                    let (prev_year, prev_month) = shift_month(year, month, -1);
                    Period::new(self.boundary(prev_year, prev_month)?, day_before(boundary)?)
                } else {
                    let (next_year, next_month) = shift_month(year, month, 1);
                    Period::new(boundary, day_before(self.boundary(next_year, next_month)?)?)
                }
            }
        }
    }

    /// Get the start of the period following the one ending on `period_end`
    pub fn next_period_start(&self, period_end: NaiveDate) -> BalanceResult<NaiveDate> {
        let (year, month) = (period_end.year(), period_end.month());
        let (next_year, next_month) = shift_month(year, month, 1);

        match self.mode {
            MonthMode::Calendar => first_of(next_year, next_month),
            MonthMode::Financial => {
                let boundary = self.boundary(year, month)?;
                if period_end < boundary {
                    Ok(boundary)
                } else {
                    self.boundary(next_year, next_month)
                }
            }
        }
    }

    /// Canonical key of the period starting on `period_start`
    pub fn month_key_for(&self, period_start: NaiveDate) -> MonthKey {
        MonthKey::from_date(period_start)
    }

    /// Get the period identified by a month key
    ///
    /// Calendar: the keyed month. Financial: the period starting on the
    /// boundary day of the keyed month.
    pub fn period_for_month(&self, key: MonthKey) -> BalanceResult<Period> {
        match self.mode {
            MonthMode::Calendar => self.calendar_month(key.year(), key.month()),
            MonthMode::Financial => self.period_for(self.boundary(key.year(), key.month())?),
        }
    }

    /// Get the period for a (month, year) pair, validating the month number
    ///
    /// The pair names the period that starts in that month. With financial
    /// months starting on the 15th, `(1, 2025)` is 2025-01-15..2025-02-14,
    /// not the period ending in January.
    pub fn period_dates(&self, month: u32, year: i32) -> BalanceResult<Period> {
        self.period_for_month(MonthKey::new(year, month)?)
    }

    /// Iterate the periods from the one containing `from` while their
    /// starting cursor is not after `to`
    pub fn periods(&self, from: NaiveDate, to: NaiveDate) -> PeriodIter {
        PeriodIter {
            resolver: *self,
            cursor: Some(from),
            end: to,
        }
    }

    /// Financial boundary day of a month, clamped to the month length
    fn boundary(&self, year: i32, month: u32) -> BalanceResult<NaiveDate> {
        let day = self.financial_start_day.min(days_in_month(year, month));
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| out_of_range(year, month))
    }

    fn calendar_month(&self, year: i32, month: u32) -> BalanceResult<Period> {
        let start = first_of(year, month)?;
        let end = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
            .ok_or_else(|| out_of_range(year, month))?;
        Period::new(start, end)
    }
}

impl Default for PeriodResolver {
    fn default() -> Self {
        Self::calendar()
    }
}

/// Iterator over consecutive periods
///
/// The cursor starts at an arbitrary date (an account's creation date) and
/// then moves to each following period start, so the sequence is strictly
/// increasing and always terminates.
#[derive(Debug, Clone)]
pub struct PeriodIter {
    resolver: PeriodResolver,
    cursor: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for PeriodIter {
    type Item = BalanceResult<Period>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.take()?;
        if cursor > self.end {
            return None;
        }

        match self.resolver.period_for(cursor) {
            Ok(period) => {
                // No following period exists past the last representable date
                self.cursor = self.resolver.next_period_start(period.end).ok();
                debug_assert!(self.cursor.map_or(true, |next| next > cursor));
                Some(Ok(period))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Get the period containing `date` under `mode`
pub fn period_for(date: NaiveDate, mode: MonthMode, financial_start_day: u32) -> BalanceResult<Period> {
    PeriodResolver::new(mode, financial_start_day)?.period_for(date)
}

/// Get the start of the period following the one ending on `period_end`
pub fn next_period_start(
    period_end: NaiveDate,
    mode: MonthMode,
    financial_start_day: u32,
) -> BalanceResult<NaiveDate> {
    PeriodResolver::new(mode, financial_start_day)?.next_period_start(period_end)
}

/// Canonical "YYYY-MM" key of the period starting on `period_start`
pub fn month_key_for(period_start: NaiveDate) -> MonthKey {
    MonthKey::from_date(period_start)
}

fn first_of(year: i32, month: u32) -> BalanceResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| out_of_range(year, month))
}

fn day_before(date: NaiveDate) -> BalanceResult<NaiveDate> {
    date.pred_opt()
        .ok_or_else(|| BalanceError::InvalidArgument(format!("no day before {}", date)))
}

fn out_of_range(year: i32, month: u32) -> BalanceError {
    BalanceError::InvalidArgument(format!(
        "{:04}-{:02} is outside the supported date range",
        year, month
    ))
}
