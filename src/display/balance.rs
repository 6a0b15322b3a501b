//! Balance display formatting
//!
//! Formats monthly balances, statements, periods and forecasts as aligned
//! terminal tables.

use crate::models::{Money, MonthKey, MonthMode, MonthlyBalances, Period, PeriodBalance};
use crate::services::Forecast;

const AMOUNT_WIDTH: usize = 14;

fn amount(value: Money, symbol: &str) -> String {
    value.format_with_symbol(symbol)
}

/// Format final balances as a two-column table
pub fn format_monthly_balances(balances: &MonthlyBalances, symbol: &str) -> String {
    if balances.is_empty() {
        return "No periods in range.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{:<7}  {:>AMOUNT_WIDTH$}\n", "Month", "Balance"));
    output.push_str(&format!("{:-<7}  {:->AMOUNT_WIDTH$}\n", "", ""));

    for (key, balance) in balances.iter() {
        output.push_str(&format!(
            "{:<7}  {:>AMOUNT_WIDTH$}\n",
            key.to_string(),
            amount(*balance, symbol)
        ));
    }

    output
}

/// Format the per-period breakdown of a running balance
pub fn format_statement(rows: &[PeriodBalance], symbol: &str) -> String {
    if rows.is_empty() {
        return "No periods in range.".to_string();
    }

    let period_width = rows
        .iter()
        .map(|r| r.period.to_string().len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<7}  {:<period_width$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}\n",
        "Month", "Period", "Opening", "Income", "Expense", "Transfers", "Closing",
    ));
    output.push_str(&format!(
        "{:-<7}  {:-<period_width$}  {:->AMOUNT_WIDTH$}  {:->AMOUNT_WIDTH$}  {:->AMOUNT_WIDTH$}  {:->AMOUNT_WIDTH$}  {:->AMOUNT_WIDTH$}\n",
        "", "", "", "", "", "", "",
    ));

    for row in rows {
        output.push_str(&format!(
            "{:<7}  {:<period_width$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}\n",
            row.key.to_string(),
            row.period.to_string(),
            amount(row.opening, symbol),
            amount(row.income, symbol),
            amount(-row.expense, symbol),
            amount(row.transfers_in - row.transfers_out, symbol),
            closing(row, symbol),
        ));
    }

    if rows.iter().any(|row| row.is_adjusted) {
        output.push_str("\n* adjusted balance\n");
    }

    output
}

fn closing(row: &PeriodBalance, symbol: &str) -> String {
    if row.is_adjusted {
        format!("{}*", amount(row.closing, symbol))
    } else {
        amount(row.closing, symbol)
    }
}

/// Format one period window
pub fn format_period(key: &MonthKey, period: &Period, mode: MonthMode) -> String {
    format!(
        "{}  {} to {} ({} days, {} month)",
        key,
        period.start,
        period.end,
        period.len_days(),
        mode
    )
}

/// Format a month forecast
pub fn format_forecast(forecast: &Forecast, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Forecast for {} ({} month)\n", forecast.key, forecast.mode));
    output.push_str(&format!(
        "  Period:           {} to {}\n",
        forecast.period.start, forecast.period.end
    ));
    output.push_str(&format!("  Opening Balance:  {}\n", amount(forecast.initial_balance, symbol)));
    output.push_str(&format!("  Incomes:          {}\n", amount(forecast.incomes, symbol)));
    output.push_str(&format!("  Expenses:         {}\n", amount(forecast.expenses, symbol)));
    if !forecast.transfers_net.is_zero() {
        output.push_str(&format!("  Transfers:        {}\n", amount(forecast.transfers_net, symbol)));
    }
    output.push_str(&format!("  Final Balance:    {}", amount(forecast.final_balance, symbol)));
    if forecast.is_adjusted {
        output.push_str(" (adjusted)");
    }
    output.push('\n');

    output
}
