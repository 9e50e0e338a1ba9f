//! Balance display formatting
//!
//! Renders a balance report as a table followed by the SUM line.

use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::error::WimmResult;
use crate::models::Money;
use crate::reports::BalanceReport;

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

/// Format a balance report as a table
pub fn format_balance_report(report: &BalanceReport) -> String {
    if report.balances.is_empty() {
        return format!("No balances.\nSUM: {}\n", report.total);
    }

    let rows: Vec<BalanceRow> = report
        .balances
        .iter()
        .map(|(account, amount)| BalanceRow {
            account: account.to_string(),
            balance: amount.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::single(1), Alignment::right());

    format!("{}\nSUM: {}\n", table, report.total)
}

#[derive(Serialize)]
struct BalanceJson<'a> {
    balances: Vec<BalanceEntry<'a>>,
    total: Money,
}

#[derive(Serialize)]
struct BalanceEntry<'a> {
    account: &'a crate::models::AccountName,
    balance: Money,
}

/// Format a balance report as pretty JSON
pub fn format_balance_json(report: &BalanceReport) -> WimmResult<String> {
    let json = BalanceJson {
        balances: report
            .balances
            .iter()
            .map(|(account, balance)| BalanceEntry {
                account,
                balance: *balance,
            })
            .collect(),
        total: report.total,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountName, Balances};
    use crate::reports::BalanceOptions;

    fn report() -> BalanceReport {
        let balances: Balances = [
            ("Assets.Bank", 110050),
            ("Liabilities", -110050),
        ]
        .iter()
        .map(|(a, c)| (AccountName::parse(a).unwrap(), Money::from_cents(*c)))
        .collect();
        let total = balances.total();
        BalanceReport {
            balances,
            total,
            options: BalanceOptions::default(),
        }
    }

    #[test]
    fn test_table_contains_rows_and_sum() {
        let output = format_balance_report(&report());
        assert!(output.contains("Account"));
        assert!(output.contains("Assets.Bank"));
        assert!(output.contains("1100.50"));
        assert!(output.contains("-1100.50"));
        assert!(output.ends_with("SUM: 0.00\n"));
    }

    #[test]
    fn test_empty_report() {
        let empty = BalanceReport {
            balances: Balances::new(),
            total: Money::zero(),
            options: BalanceOptions::default(),
        };
        assert_eq!(format_balance_report(&empty), "No balances.\nSUM: 0.00\n");
    }

    #[test]
    fn test_json_output() {
        let json = format_balance_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["balances"][0]["account"], "Assets.Bank");
        assert_eq!(value["balances"][0]["balance"], 1100.5);
        assert_eq!(value["total"], 0.0);
    }
}
