//! Settings display formatting

use crate::config::Settings;

/// Format the settings and configured accounts
pub fn format_settings(settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str("Settings\n");
    output.push_str(&format!("  Month Mode:       {}\n", settings.month_mode));
    output.push_str(&format!("  Start Day:        {}\n", settings.financial_start_day));
    output.push_str(&format!("  Currency:         {}\n", settings.currency_symbol));
    output.push_str(&format!("  Log Level:        {}\n", settings.log_level));
    output.push_str(&format!("  Max Log Entries:  {}\n", settings.max_log_entries));
    if let Some(file) = &settings.transactions_file {
        output.push_str(&format!("  Transactions:     {}\n", file.display()));
    }
    if let Some(file) = &settings.adjustments_file {
        output.push_str(&format!("  Adjustments:      {}\n", file.display()));
    }
    output.push_str(&format!(
        "  Password:         {}\n",
        if settings.has_password() { "Set" } else { "Not set" }
    ));

    output.push('\n');
    if settings.accounts.is_empty() {
        output.push_str("No accounts configured.\n");
        return output;
    }

    let id_width = settings
        .accounts
        .iter()
        .map(|a| a.id.as_str().len())
        .max()
        .unwrap_or(2)
        .max(2);
    let name_width = settings
        .accounts
        .iter()
        .map(|a| a.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    output.push_str(&format!(
        "{:<id_width$}  {:<name_width$}  {:<10}  {:>14}\n",
        "ID", "Name", "Created", "Initial"
    ));
    output.push_str(&format!(
        "{:-<id_width$}  {:-<name_width$}  {:-<10}  {:->14}\n",
        "", "", "", ""
    ));
    for account in &settings.accounts {
        output.push_str(&format!(
            "{:<id_width$}  {:<name_width$}  {:<10}  {:>14}\n",
            account.id.as_str(),
            account.name,
            account.created_on.to_string(),
            account.initial_balance.format_with_symbol(&settings.currency_symbol),
        ));
    }

    output
}
